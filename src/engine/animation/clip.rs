// Clip resources and the immutable clip library

use std::collections::HashMap;
use std::hash::Hash;

use glam::{Quat, Vec3};

use super::AnimationError;

/// How an action behaves when playback reaches the end of its clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once, then finish
    Once,
    /// Restart from the beginning; `None` repeats forever
    Repeat { repetitions: Option<u32> },
}

impl LoopMode {
    /// Repeat without end
    pub const fn forever() -> Self {
        Self::Repeat { repetitions: None }
    }

    pub fn is_once(&self) -> bool {
        matches!(self, Self::Once)
    }
}

/// A single keyframe of a bone track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Keyframes driving a single bone
#[derive(Debug, Clone)]
pub struct BoneTrack {
    /// Index into the skeleton's bone list
    pub bone: usize,
    /// Keyframes sorted by time
    pub keyframes: Vec<Keyframe>,
}

impl BoneTrack {
    pub fn new(bone: usize, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { bone, keyframes }
    }

    /// Sample the track at `time`, holding the first/last key outside the keyed range
    pub fn sample(&self, time: f32) -> Option<(Vec3, Quat)> {
        let first = self.keyframes.first()?;
        if time <= first.time {
            return Some((first.translation, first.rotation));
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                let t = if span > 0.0 { (time - a.time) / span } else { 1.0 };
                return Some((
                    a.translation.lerp(b.translation, t),
                    a.rotation.slerp(b.rotation, t),
                ));
            }
        }

        self.keyframes
            .last()
            .map(|last| (last.translation, last.rotation))
    }
}

/// A pre-authored animation clip as supplied by the asset layer
#[derive(Debug, Clone)]
pub struct ClipResource {
    /// Name of the clip in the source asset (e.g., "sprint")
    pub name: String,
    /// Length of one playback cycle in seconds
    pub duration: f32,
    /// Loop behaviour the clip was authored with
    pub default_loop: LoopMode,
    /// Per-bone keyframe tracks (may be empty for timing-only clips)
    pub tracks: Vec<BoneTrack>,
}

impl ClipResource {
    /// Create a new clip resource
    pub fn new(name: &str, duration: f32, default_loop: LoopMode) -> Self {
        Self {
            name: name.to_string(),
            duration,
            default_loop,
            tracks: Vec::new(),
        }
    }

    /// Create a clip that loops forever
    pub fn looping(name: &str, duration: f32) -> Self {
        Self::new(name, duration, LoopMode::forever())
    }

    /// Create a one-shot clip
    pub fn one_shot(name: &str, duration: f32) -> Self {
        Self::new(name, duration, LoopMode::Once)
    }

    /// Attach a bone track
    pub fn with_track(mut self, track: BoneTrack) -> Self {
        self.tracks.push(track);
        self
    }

    /// Check the clip can be bound to an action
    pub fn validate(&self) -> Result<(), AnimationError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(AnimationError::InvalidClip {
                name: self.name.clone(),
                reason: format!("duration must be finite and non-negative, got {}", self.duration),
            });
        }
        Ok(())
    }
}

/// Immutable mapping from clip identifier to clip resource
#[derive(Debug, Clone)]
pub struct ClipLibrary<K> {
    clips: HashMap<K, ClipResource>,
}

impl<K: Copy + Eq + Hash> ClipLibrary<K> {
    /// Build a library from `(identifier, resource)` pairs
    pub fn from_clips(clips: impl IntoIterator<Item = (K, ClipResource)>) -> Self {
        Self {
            clips: clips.into_iter().collect(),
        }
    }

    pub fn get(&self, key: K) -> Option<&ClipResource> {
        self.clips.get(&key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.clips.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.clips.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clip_constructors() {
        let sprint = ClipResource::looping("sprint", 0.8);
        assert_eq!(sprint.name, "sprint");
        assert_eq!(sprint.default_loop, LoopMode::forever());

        let jump = ClipResource::one_shot("jumpStart", 0.4);
        assert!(jump.default_loop.is_once());
    }

    #[test]
    fn test_validate_rejects_negative_duration() {
        let clip = ClipResource::one_shot("broken", -1.0);
        assert!(clip.validate().is_err());
        assert!(ClipResource::one_shot("ok", 0.0).validate().is_ok());
    }

    #[test]
    fn test_track_sampling_interpolates() {
        let track = BoneTrack::new(
            0,
            vec![
                Keyframe {
                    time: 1.0,
                    translation: Vec3::new(2.0, 0.0, 0.0),
                    rotation: Quat::IDENTITY,
                },
                Keyframe {
                    time: 0.0,
                    translation: Vec3::ZERO,
                    rotation: Quat::IDENTITY,
                },
            ],
        );

        let (translation, _) = track.sample(0.5).unwrap();
        assert_relative_eq!(translation.x, 1.0);

        // Holds the last key past the end
        let (translation, _) = track.sample(3.0).unwrap();
        assert_relative_eq!(translation.x, 2.0);
    }

    #[test]
    fn test_empty_track_samples_nothing() {
        let track = BoneTrack::new(0, Vec::new());
        assert!(track.sample(0.0).is_none());
    }

    #[test]
    fn test_library_lookup() {
        let library = ClipLibrary::from_clips([
            (1u8, ClipResource::looping("idle", 1.0)),
            (2u8, ClipResource::one_shot("jump", 0.5)),
        ]);
        assert_eq!(library.len(), 2);
        assert!(library.contains(1));
        assert!(!library.contains(3));
        assert_eq!(library.get(2).map(|c| c.name.as_str()), Some("jump"));
    }
}
