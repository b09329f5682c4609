// Character animation controller
//
// Ties coarse locomotion states to clip sequences. State changes happen
// synchronously; the visible transition plays out through the pending queue
// and the mixer's finish events, which are handled inside `advance` before
// it returns.

use std::collections::VecDeque;

use crate::engine::animation::{AnimationMixer, ClipLibrary, MixerEvent, Pose, SkinnedMesh};

use super::clips::ClipId;
use super::rig::{Blend, RetargetPolicy, RigDefinition};
use super::state::CoarseState;
use super::ControllerError;

/// A crossfade that has not finished yet
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlendInFlight {
    from: ClipId,
    to: ClipId,
    remaining: f32,
}

/// Read-only view of the controller for renderers, HUDs and tests
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub state: CoarseState,
    pub active: ClipId,
    pub pending: Vec<ClipId>,
    pub weights: Vec<(ClipId, f32)>,
}

/// Drives one character's clips from coarse state requests
#[derive(Debug)]
pub struct AnimationController {
    /// Identity used in logs and errors
    character: String,
    mesh: SkinnedMesh,
    rig: RigDefinition,
    mixer: AnimationMixer<ClipId>,

    state: CoarseState,
    previous_state: CoarseState,
    state_time: f32,

    /// Clip currently blended to full weight
    active: ClipId,
    /// Clips still owed by the sequence in flight. Pushed only by state
    /// changes and the exit signal, popped only by finish events.
    pending: VecDeque<ClipId>,
    blend: Option<BlendInFlight>,
}

impl AnimationController {
    /// Bind one action per library clip and start the rig's initial clip
    pub fn new(
        character: &str,
        mesh: SkinnedMesh,
        library: &ClipLibrary<ClipId>,
        rig: RigDefinition,
    ) -> Result<Self, ControllerError> {
        let mut mixer = AnimationMixer::new();

        for clip in ClipId::ALL {
            let Some(resource) = library.get(clip) else {
                continue;
            };
            let action = mixer.clip_action(clip, resource)?;
            if let Some(settings) = rig.clip_settings(clip) {
                action
                    .set_loop(settings.loop_mode)
                    .set_clamp_when_finished(settings.clamp_when_finished);
            }
        }

        let mut referenced: Vec<_> = rig.referenced_clips().into_iter().collect();
        referenced.sort();
        if let Some(&clip) = referenced.iter().find(|clip| !mixer.contains(**clip)) {
            log::error!(
                "Rig '{}' of character {} needs clip {} which the library lacks",
                rig.name(),
                character,
                clip
            );
            return Err(ControllerError::MissingClip {
                clip,
                character: character.to_string(),
            });
        }

        let initial_clip = rig.initial_clip();
        if let Some(action) = mixer.action_mut(initial_clip) {
            action
                .reset()
                .set_effective_time_scale(1.0)
                .set_effective_weight(1.0)
                .play();
        }

        log::info!(
            "Character {} bound {} clips on mesh '{}', starting {} ({})",
            character,
            library.len(),
            mesh.name,
            rig.initial_state(),
            initial_clip
        );

        Ok(Self {
            character: character.to_string(),
            mesh,
            state: rig.initial_state(),
            previous_state: rig.initial_state(),
            state_time: 0.0,
            active: initial_clip,
            pending: VecDeque::new(),
            blend: None,
            mixer,
            rig,
        })
    }

    /// Request a coarse state change
    ///
    /// Returns whether a transition rule fired. Requests for the current
    /// state, or without a rule from the current state, are ignored.
    pub fn request_state(&mut self, target: CoarseState) -> Result<bool, ControllerError> {
        if target == self.state {
            return Ok(false);
        }

        if self.state.is_transient() {
            log::debug!(
                "{}: {} is only left through its sequence, ignoring {}",
                self.character,
                self.state,
                target
            );
            return Ok(false);
        }

        if self.rig.retarget_policy() == RetargetPolicy::IgnoreWhileTransient
            && self.is_transitioning()
        {
            log::debug!(
                "{}: ignoring {} -> {} while a transition is in flight",
                self.character,
                self.state,
                target
            );
            return Ok(false);
        }

        let Some(sequence) = self.rig.entry_sequence(self.state, target) else {
            log::debug!(
                "{}: no transition from {} to {}",
                self.character,
                self.state,
                target
            );
            return Ok(false);
        };
        let sequence = sequence.to_vec();
        let Some(&first) = sequence.first() else {
            return Ok(false);
        };

        self.start_clip(first)?;
        self.enter_state(target);

        self.pending.clear();
        self.pending.extend(sequence);
        log::debug!("{}: queued {:?}", self.character, self.pending);
        self.settle_tail();

        Ok(true)
    }

    /// Play a clip directly, bypassing the state machine
    ///
    /// Fails with `UnboundClip` if no action is bound for `clip`; nothing is
    /// changed in that case. The pending queue is never touched here.
    pub fn play_clip(&mut self, clip: ClipId) -> Result<(), ControllerError> {
        self.start_clip(clip)
    }

    /// External signal that ends a transient state (e.g. the character landed)
    ///
    /// Replaces the state's hold clip with its end clip. Returns false when
    /// the current state has no exit rule or the end is already queued.
    pub fn land(&mut self) -> Result<bool, ControllerError> {
        let Some(exit) = self.rig.exit_rule(self.state) else {
            return Ok(false);
        };
        if self.pending.contains(&exit.end) {
            return Ok(false);
        }
        if !self.mixer.contains(exit.end) {
            return Err(self.unbound(exit.end));
        }

        self.pending.retain(|clip| *clip != exit.hold);
        self.pending.push_back(exit.end);
        log::debug!("{}: exit signal, queued {:?}", self.character, self.pending);

        if self.pending.front() == Some(&exit.end) {
            self.start_clip(exit.end)?;
        } else {
            self.resume_stalled_queue()?;
        }
        Ok(true)
    }

    /// Advance playback by `dt` seconds and handle every finish event raised
    ///
    /// A zero delta is a valid paused frame and changes nothing. Negative,
    /// infinite or NaN deltas are treated as zero.
    pub fn advance(&mut self, dt: f32) -> Result<(), ControllerError> {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("{}: ignoring invalid frame delta {}", self.character, dt);
            0.0
        };
        if dt == 0.0 {
            return Ok(());
        }

        let events = self.mixer.update(dt);
        self.state_time += dt;
        if let Some(blend) = self.blend.as_mut() {
            blend.remaining -= dt;
            if blend.remaining <= 0.0 {
                self.blend = None;
            }
        }

        for event in events {
            match event {
                MixerEvent::Finished(clip) => self.on_finished(clip)?,
            }
        }
        self.resume_stalled_queue()
    }

    /// Consume queued clips that were stopped before they could finish
    ///
    /// A direct `play_clip` can cut or fade out the clip at the front of the
    /// queue; a stopped action never raises its finish event, so it is
    /// handled as finished here instead.
    fn resume_stalled_queue(&mut self) -> Result<(), ControllerError> {
        while let Some(&front) = self.pending.front() {
            if self.mixer.action(front).is_some_and(|a| a.is_running()) {
                break;
            }
            log::debug!(
                "{}: queued {} was stopped early, moving on",
                self.character,
                front
            );
            self.on_finished(front)?;
        }
        Ok(())
    }

    fn on_finished(&mut self, clip: ClipId) -> Result<(), ControllerError> {
        log::debug!("{}: finished {}", self.character, clip);

        if self.pending.front() == Some(&clip) {
            self.pending.pop_front();
            if let Some(&next) = self.pending.front() {
                self.start_clip(next)?;
                self.settle_tail();
                return Ok(());
            }
        } else if clip != self.active {
            log::warn!(
                "{}: stale finish event for {} (active {})",
                self.character,
                clip,
                self.active
            );
        }

        if let Some(rule) = self.rig.finish_rule(clip) {
            self.start_clip(rule.play)?;
            if let Some(state) = rule.enter {
                self.enter_state(state);
            }
        }
        Ok(())
    }

    /// Drop the last queued clip once it is playing as a steady clip of the
    /// current state: nothing is owed after that.
    fn settle_tail(&mut self) {
        if self.pending.len() == 1
            && self.pending.front() == Some(&self.active)
            && self.rig.is_steady(self.state, self.active)
        {
            self.pending.pop_front();
        }
    }

    fn enter_state(&mut self, state: CoarseState) {
        if state == self.state {
            return;
        }
        log::info!("{}: {} -> {}", self.character, self.state, state);
        self.previous_state = self.state;
        self.state = state;
        self.state_time = 0.0;
    }

    fn unbound(&self, clip: ClipId) -> ControllerError {
        log::error!(
            "Could not find action for clip {} on character {}",
            clip,
            self.character
        );
        ControllerError::UnboundClip {
            clip,
            character: self.character.clone(),
        }
    }

    /// Reset `target`, then blend or cut to it from whatever is playing
    fn start_clip(&mut self, target: ClipId) -> Result<(), ControllerError> {
        if !self.mixer.contains(target) {
            return Err(self.unbound(target));
        }

        let previous = self.active;
        let blend = self.rig.blend_for(previous, target);

        if let Some(action) = self.mixer.action_mut(target) {
            action
                .reset()
                .set_effective_time_scale(1.0)
                .set_effective_weight(1.0);
        }

        match blend {
            Blend::HardCut => {
                let others: Vec<_> = self.mixer.running().filter(|c| *c != target).collect();
                for clip in others {
                    self.mixer.stop(clip)?;
                }
                if let Some(action) = self.mixer.action_mut(target) {
                    action.play();
                }
                self.blend = None;
                log::debug!("{}: cut {} -> {}", self.character, previous, target);
            }
            Blend::Crossfade(_) if previous == target => {
                if let Some(action) = self.mixer.action_mut(target) {
                    action.play();
                }
                self.blend = None;
                log::debug!("{}: restarted {}", self.character, target);
            }
            Blend::Crossfade(duration) => {
                // A blend still in flight keeps its source; only the destination moves
                let source = match self.blend {
                    Some(in_flight) if in_flight.from != target => in_flight.from,
                    _ => previous,
                };

                self.mixer.cross_fade(source, target, duration)?;
                if previous != source {
                    self.mixer.fade_out(previous, duration)?;
                }

                self.blend = (duration > 0.0).then_some(BlendInFlight {
                    from: source,
                    to: target,
                    remaining: duration,
                });
            }
        }

        self.active = target;
        Ok(())
    }

    /// Whether a crossfade or clip sequence is still in flight
    pub fn is_transitioning(&self) -> bool {
        self.blend.is_some() || !self.pending.is_empty()
    }

    pub fn state(&self) -> CoarseState {
        self.state
    }

    pub fn previous_state(&self) -> CoarseState {
        self.previous_state
    }

    /// Seconds spent in the current coarse state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn active_clip(&self) -> ClipId {
        self.active
    }

    /// Destination of the blend in flight, if any
    pub fn blend_target(&self) -> Option<ClipId> {
        self.blend.map(|b| b.to)
    }

    pub fn pending(&self) -> impl Iterator<Item = ClipId> + '_ {
        self.pending.iter().copied()
    }

    /// Blended weight of a clip's action (0 if unbound or stopped)
    pub fn weight(&self, clip: ClipId) -> f32 {
        self.mixer.weight(clip)
    }

    pub fn is_bound(&self, clip: ClipId) -> bool {
        self.mixer.contains(clip)
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn mesh(&self) -> &SkinnedMesh {
        &self.mesh
    }

    pub fn rig(&self) -> &RigDefinition {
        &self.rig
    }

    pub fn mixer(&self) -> &AnimationMixer<ClipId> {
        &self.mixer
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state,
            active: self.active,
            pending: self.pending.iter().copied().collect(),
            weights: self.mixer.weights(),
        }
    }

    /// Blend the current pose of the bound skeleton
    pub fn sample_pose(&self) -> Pose {
        self.mixer.sample_pose(&self.mesh.skeleton)
    }
}
