// Skeletal animation runtime
//
// Clips come from the asset layer as `ClipResource`s collected in a
// `ClipLibrary`. An `AnimationMixer` binds one `ClipAction` per clip for a
// character, advances them once per frame and reports finish events back to
// whoever drives it. Renderers sample the blended result with `sample_pose`.

mod action;
mod clip;
mod mixer;
mod pose;

pub use action::{ActionEvent, ClipAction};
pub use clip::{BoneTrack, ClipLibrary, ClipResource, Keyframe, LoopMode};
pub use mixer::{AnimationMixer, MixerEvent};
pub use pose::{Bone, BoneTransform, Pose, Skeleton, SkinnedMesh};

/// Animation runtime errors
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("No action bound for clip: {0}")]
    UnknownAction(String),

    #[error("Action already bound for clip: {0}")]
    DuplicateAction(String),

    #[error("Invalid clip {name}: {reason}")]
    InvalidClip { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_error_display() {
        let err = AnimationError::UnknownAction("Sprint".to_string());
        assert_eq!(err.to_string(), "No action bound for clip: Sprint");
    }
}
