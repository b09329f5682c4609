// Character entity: turns player intents into controller requests

use crate::engine::animation::{ClipLibrary, Pose, SkinnedMesh};
use crate::engine::input::Intent;

use super::clips::ClipId;
use super::controller::AnimationController;
use super::rig::RigDefinition;
use super::state::CoarseState;
use super::ControllerError;

/// Unique identifier for a character
pub type CharacterId = u32;

/// Gameplay tuning of a character
#[derive(Debug, Clone)]
pub struct CharacterConfig {
    /// Seconds between the jump request and the landed signal
    pub jump_airtime: f32,
}

/// Tuning used by the dummy runner
pub const BASE_CONFIG: CharacterConfig = CharacterConfig { jump_airtime: 0.9 };

impl Default for CharacterConfig {
    fn default() -> Self {
        BASE_CONFIG
    }
}

/// A player-controlled character
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Character name (for display)
    pub name: String,
    pub config: CharacterConfig,
    controller: AnimationController,
    /// Airtime left before landing, while a jump is in progress
    airtime_remaining: Option<f32>,
}

impl Character {
    /// Create a new character and bind its animations
    pub fn new(
        id: CharacterId,
        name: &str,
        mesh: SkinnedMesh,
        library: &ClipLibrary<ClipId>,
        rig: RigDefinition,
        config: CharacterConfig,
    ) -> Result<Self, ControllerError> {
        let controller = AnimationController::new(&format!("{name}#{id}"), mesh, library, rig)?;
        Ok(Self {
            id,
            name: name.to_string(),
            config,
            controller,
            airtime_remaining: None,
        })
    }

    /// React to a discrete player intent
    pub fn handle_intent(&mut self, intent: Intent) -> Result<(), ControllerError> {
        match intent {
            Intent::Run => {
                self.controller.request_state(CoarseState::Run)?;
            }
            Intent::Idle => {
                self.controller.request_state(CoarseState::Idle)?;
            }
            Intent::Jump => {
                if self.controller.request_state(CoarseState::Jump)? {
                    self.airtime_remaining = Some(self.config.jump_airtime);
                }
            }
            Intent::Land => self.on_land()?,
            Intent::Slide => self.controller.play_clip(ClipId::Slide)?,
            // Pausing is the frame clock's business
            Intent::Pause => {}
        }
        Ok(())
    }

    /// Update the character (called every frame)
    pub fn update(&mut self, dt: f32) -> Result<(), ControllerError> {
        self.controller.advance(dt)?;

        // Check for landing
        let landed = match self.airtime_remaining.as_mut() {
            Some(remaining) => {
                *remaining -= dt.max(0.0);
                *remaining <= 0.0
            }
            None => false,
        };
        if landed {
            self.on_land()?;
        }
        Ok(())
    }

    /// Called when the character touches ground again
    fn on_land(&mut self) -> Result<(), ControllerError> {
        self.airtime_remaining = None;
        self.controller.land()?;
        Ok(())
    }

    /// Get the current coarse state
    pub fn state(&self) -> CoarseState {
        self.controller.state()
    }

    /// Check if a jump is in the air
    pub fn is_airborne(&self) -> bool {
        self.airtime_remaining.is_some()
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    /// Pose for the renderer this frame
    pub fn pose(&self) -> Pose {
        self.controller.sample_pose()
    }
}
