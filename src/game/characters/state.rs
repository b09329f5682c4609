// Coarse locomotion states

use std::fmt;

/// Gameplay-level locomotion mode of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoarseState {
    /// Standing still
    #[default]
    Idle,
    /// Running or sprinting on the ground
    Run,
    /// Airborne; left automatically once the jump sequence completes
    Jump,
}

impl CoarseState {
    pub const ALL: [CoarseState; 3] = [Self::Idle, Self::Run, Self::Jump];

    /// Transient states are only left through their clip sequence, never
    /// by an external request
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Jump)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
        }
    }
}

impl fmt::Display for CoarseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(CoarseState::default(), CoarseState::Idle);
    }

    #[test]
    fn test_only_jump_is_transient() {
        let transient: Vec<_> = CoarseState::ALL
            .into_iter()
            .filter(CoarseState::is_transient)
            .collect();
        assert_eq!(transient, vec![CoarseState::Jump]);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(CoarseState::Run.to_string(), "run");
    }
}
