// Character system
//
// This module contains everything related to playable characters:
// - Clip identifiers and the stock dummy rig assets
// - Coarse locomotion states
// - Per-character rig configuration
// - The animation controller tying states to clip sequences
// - The character entity fed by player intents

pub mod character;
pub mod clips;
pub mod controller;
pub mod rig;
pub mod state;

// Re-export commonly used types
pub use character::{Character, CharacterConfig, CharacterId};
pub use clips::{dummy_clip_library, dummy_mesh, ClipId};
pub use controller::{AnimationController, ControllerSnapshot};
pub use rig::{Blend, ClipSettings, ExitRule, FinishRule, RetargetPolicy, RigDefinition};
pub use state::CoarseState;

use crate::engine::animation::AnimationError;

/// Animation controller errors
///
/// Both clip variants mean the rig and the asset library disagree; they are
/// not recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Could not find action for clip {clip} on character {character}")]
    UnboundClip { clip: ClipId, character: String },

    #[error("Character {character} needs clip {clip}, which is missing from the clip library")]
    MissingClip { clip: ClipId, character: String },

    #[error(transparent)]
    Animation(#[from] AnimationError),
}
