// Per-character animation rig definition
//
// Everything the controller needs to know about a specific character:
// how each clip loops, which clip sequence a coarse state change plays,
// what happens when a chained clip finishes, and how clips blend.

use std::collections::{HashMap, HashSet};

use crate::engine::animation::LoopMode;

use super::clips::ClipId;
use super::state::CoarseState;

/// Crossfade length used when no override applies (seconds)
pub const DEFAULT_CROSSFADE: f32 = 0.25;

/// Per-clip playback overrides applied when actions are bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipSettings {
    pub loop_mode: LoopMode,
    /// Freeze on the last frame when a `Once` clip finishes
    pub clamp_when_finished: bool,
}

impl ClipSettings {
    /// Play once and hold the last frame
    pub const fn once_clamped() -> Self {
        Self {
            loop_mode: LoopMode::Once,
            clamp_when_finished: true,
        }
    }

    /// Repeat indefinitely
    pub const fn repeat() -> Self {
        Self {
            loop_mode: LoopMode::forever(),
            clamp_when_finished: false,
        }
    }
}

/// How the incoming clip replaces the outgoing one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blend {
    /// Blend weights linearly over the given number of seconds
    Crossfade(f32),
    /// Stop the outgoing clip outright and start at full weight
    HardCut,
}

/// What to do after a chained clip finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishRule {
    pub play: ClipId,
    /// Coarse state to enter once `play` starts
    pub enter: Option<CoarseState>,
}

/// How a transient state ends when the external terminating signal arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRule {
    /// Looping clip the state holds on until the signal
    pub hold: ClipId,
    /// Clip that replaces the hold
    pub end: ClipId,
}

/// Handling of state-change requests while a transition is still in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetargetPolicy {
    /// The latest request wins; the blend keeps its source and changes destination
    #[default]
    Overwrite,
    /// Requests are dropped until the blend and pending sequence have settled
    IgnoreWhileTransient,
}

/// Complete animation setup of one character
#[derive(Debug, Clone)]
pub struct RigDefinition {
    name: String,
    initial_state: CoarseState,
    initial_clip: ClipId,
    clip_settings: HashMap<ClipId, ClipSettings>,
    transitions: HashMap<(CoarseState, CoarseState), Vec<ClipId>>,
    steady: HashMap<CoarseState, Vec<ClipId>>,
    exits: HashMap<CoarseState, ExitRule>,
    finish: HashMap<ClipId, FinishRule>,
    default_blend: Blend,
    target_blends: HashMap<ClipId, Blend>,
    pair_blends: HashMap<(ClipId, ClipId), Blend>,
    retarget: RetargetPolicy,
}

impl RigDefinition {
    /// Create an empty rig that starts in `initial_state` playing `initial_clip`
    pub fn new(name: &str, initial_state: CoarseState, initial_clip: ClipId) -> Self {
        Self {
            name: name.to_string(),
            initial_state,
            initial_clip,
            clip_settings: HashMap::new(),
            transitions: HashMap::new(),
            steady: HashMap::new(),
            exits: HashMap::new(),
            finish: HashMap::new(),
            default_blend: Blend::Crossfade(DEFAULT_CROSSFADE),
            target_blends: HashMap::new(),
            pair_blends: HashMap::new(),
            retarget: RetargetPolicy::default(),
        }
    }

    /// The dummy runner: idle, a wind-up into running, sprinting and a
    /// three-part jump that lands back into a sprint
    pub fn dummy() -> Self {
        Self::new("dummy", CoarseState::Idle, ClipId::Idle)
            .clip(ClipId::Idle, ClipSettings::repeat())
            .clip(ClipId::IdleToRun, ClipSettings::once_clamped())
            .clip(ClipId::Run, ClipSettings::repeat())
            .clip(ClipId::Sprint, ClipSettings::repeat())
            .clip(ClipId::JumpStart, ClipSettings::once_clamped())
            .clip(ClipId::JumpLoop, ClipSettings::repeat())
            .clip(ClipId::JumpEnd, ClipSettings::once_clamped())
            .clip(ClipId::Slide, ClipSettings::once_clamped())
            .steady(CoarseState::Idle, &[ClipId::Idle])
            .steady(CoarseState::Run, &[ClipId::Run, ClipId::Sprint])
            .transition(
                CoarseState::Idle,
                CoarseState::Run,
                &[ClipId::IdleToRun, ClipId::Run],
            )
            .transition(CoarseState::Run, CoarseState::Idle, &[ClipId::Idle])
            .transition(
                CoarseState::Run,
                CoarseState::Jump,
                &[ClipId::JumpStart, ClipId::JumpLoop],
            )
            .exit(
                CoarseState::Jump,
                ExitRule {
                    hold: ClipId::JumpLoop,
                    end: ClipId::JumpEnd,
                },
            )
            .on_finish(
                ClipId::JumpStart,
                FinishRule {
                    play: ClipId::JumpLoop,
                    enter: None,
                },
            )
            .on_finish(
                ClipId::JumpEnd,
                FinishRule {
                    play: ClipId::Sprint,
                    enter: Some(CoarseState::Run),
                },
            )
            .blend_into(ClipId::Sprint, Blend::HardCut)
    }

    /// Start in a different state/clip
    pub fn starting_in(mut self, state: CoarseState, clip: ClipId) -> Self {
        self.initial_state = state;
        self.initial_clip = clip;
        self
    }

    /// Override loop/clamp behaviour of a clip
    pub fn clip(mut self, clip: ClipId, settings: ClipSettings) -> Self {
        self.clip_settings.insert(clip, settings);
        self
    }

    /// Declare the clip sequence played when going from `from` to `to`.
    /// Empty sequences are ignored.
    pub fn transition(mut self, from: CoarseState, to: CoarseState, sequence: &[ClipId]) -> Self {
        if !sequence.is_empty() && from != to {
            self.transitions.insert((from, to), sequence.to_vec());
        }
        self
    }

    /// Declare the clips a state can rest on
    pub fn steady(mut self, state: CoarseState, clips: &[ClipId]) -> Self {
        self.steady.insert(state, clips.to_vec());
        self
    }

    pub fn exit(mut self, state: CoarseState, rule: ExitRule) -> Self {
        self.exits.insert(state, rule);
        self
    }

    pub fn on_finish(mut self, clip: ClipId, rule: FinishRule) -> Self {
        self.finish.insert(clip, rule);
        self
    }

    /// Blend used whenever `clip` is the incoming clip
    pub fn blend_into(mut self, clip: ClipId, blend: Blend) -> Self {
        self.target_blends.insert(clip, blend);
        self
    }

    /// Blend used for one specific outgoing/incoming pair
    pub fn blend_between(mut self, from: ClipId, to: ClipId, blend: Blend) -> Self {
        self.pair_blends.insert((from, to), blend);
        self
    }

    pub fn retarget(mut self, policy: RetargetPolicy) -> Self {
        self.retarget = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_state(&self) -> CoarseState {
        self.initial_state
    }

    pub fn initial_clip(&self) -> ClipId {
        self.initial_clip
    }

    pub fn clip_settings(&self, clip: ClipId) -> Option<ClipSettings> {
        self.clip_settings.get(&clip).copied()
    }

    pub fn entry_sequence(&self, from: CoarseState, to: CoarseState) -> Option<&[ClipId]> {
        self.transitions.get(&(from, to)).map(Vec::as_slice)
    }

    pub fn is_steady(&self, state: CoarseState, clip: ClipId) -> bool {
        self.steady
            .get(&state)
            .is_some_and(|clips| clips.contains(&clip))
    }

    pub fn exit_rule(&self, state: CoarseState) -> Option<ExitRule> {
        self.exits.get(&state).copied()
    }

    pub fn finish_rule(&self, clip: ClipId) -> Option<FinishRule> {
        self.finish.get(&clip).copied()
    }

    /// Blend to use when `to` replaces `from` (pair override, then target override, then default)
    pub fn blend_for(&self, from: ClipId, to: ClipId) -> Blend {
        self.pair_blends
            .get(&(from, to))
            .or_else(|| self.target_blends.get(&to))
            .copied()
            .unwrap_or(self.default_blend)
    }

    pub fn retarget_policy(&self) -> RetargetPolicy {
        self.retarget
    }

    /// Every clip the state machine can reach on its own
    pub fn referenced_clips(&self) -> HashSet<ClipId> {
        let mut clips = HashSet::new();
        clips.insert(self.initial_clip);
        clips.extend(self.transitions.values().flatten().copied());
        clips.extend(self.steady.values().flatten().copied());
        for rule in self.exits.values() {
            clips.insert(rule.hold);
            clips.insert(rule.end);
        }
        for (clip, rule) in &self.finish {
            clips.insert(*clip);
            clips.insert(rule.play);
        }
        clips
    }
}

impl Default for RigDefinition {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_transitions() {
        let rig = RigDefinition::dummy();
        assert_eq!(
            rig.entry_sequence(CoarseState::Idle, CoarseState::Run),
            Some(&[ClipId::IdleToRun, ClipId::Run][..])
        );
        assert_eq!(
            rig.entry_sequence(CoarseState::Run, CoarseState::Jump),
            Some(&[ClipId::JumpStart, ClipId::JumpLoop][..])
        );
        // Jump is only left through its sequence
        assert_eq!(rig.entry_sequence(CoarseState::Jump, CoarseState::Run), None);
        assert_eq!(rig.entry_sequence(CoarseState::Idle, CoarseState::Jump), None);
    }

    #[test]
    fn test_dummy_clip_settings() {
        let rig = RigDefinition::dummy();
        assert_eq!(
            rig.clip_settings(ClipId::JumpStart),
            Some(ClipSettings::once_clamped())
        );
        assert_eq!(
            rig.clip_settings(ClipId::JumpLoop),
            Some(ClipSettings::repeat())
        );
    }

    #[test]
    fn test_blend_lookup_precedence() {
        let rig = RigDefinition::dummy().blend_between(
            ClipId::JumpEnd,
            ClipId::Sprint,
            Blend::Crossfade(0.1),
        );

        assert_eq!(
            rig.blend_for(ClipId::Run, ClipId::JumpStart),
            Blend::Crossfade(DEFAULT_CROSSFADE)
        );
        assert_eq!(rig.blend_for(ClipId::Idle, ClipId::Sprint), Blend::HardCut);
        assert_eq!(
            rig.blend_for(ClipId::JumpEnd, ClipId::Sprint),
            Blend::Crossfade(0.1)
        );
    }

    #[test]
    fn test_steady_clips() {
        let rig = RigDefinition::dummy();
        assert!(rig.is_steady(CoarseState::Run, ClipId::Sprint));
        assert!(rig.is_steady(CoarseState::Run, ClipId::Run));
        assert!(!rig.is_steady(CoarseState::Jump, ClipId::JumpLoop));
    }

    #[test]
    fn test_empty_transition_ignored() {
        let rig = RigDefinition::new("empty", CoarseState::Idle, ClipId::Idle).transition(
            CoarseState::Idle,
            CoarseState::Run,
            &[],
        );
        assert_eq!(rig.entry_sequence(CoarseState::Idle, CoarseState::Run), None);
    }

    #[test]
    fn test_referenced_clips_skip_unchained_one_shots() {
        let rig = RigDefinition::dummy();
        let clips = rig.referenced_clips();
        assert!(clips.contains(&ClipId::JumpEnd));
        assert!(clips.contains(&ClipId::Sprint));
        assert!(!clips.contains(&ClipId::Slide));
    }
}
