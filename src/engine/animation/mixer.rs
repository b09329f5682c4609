// Animation mixer - owns every action of one character and advances them

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::action::{ActionEvent, ClipAction};
use super::clip::ClipResource;
use super::pose::{BoneTransform, Pose, PoseBlender, Skeleton};
use super::AnimationError;

/// Event raised by the mixer during `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerEvent<K> {
    /// The action bound to this key finished naturally
    Finished(K),
}

/// Owns one action per clip key and blends them
///
/// Actions are advanced in the order they were bound, so events produced in
/// the same tick are reported in a stable order.
#[derive(Debug)]
pub struct AnimationMixer<K> {
    actions: HashMap<K, ClipAction>,
    order: Vec<K>,
    elapsed: f32,
}

impl<K> Default for AnimationMixer<K> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            order: Vec::new(),
            elapsed: 0.0,
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> AnimationMixer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new action for `clip` under `key`
    pub fn clip_action(
        &mut self,
        key: K,
        clip: &ClipResource,
    ) -> Result<&mut ClipAction, AnimationError> {
        clip.validate()?;
        if self.actions.contains_key(&key) {
            return Err(AnimationError::DuplicateAction(format!("{key:?}")));
        }

        self.order.push(key);
        Ok(self
            .actions
            .entry(key)
            .or_insert_with(|| ClipAction::new(clip.clone())))
    }

    pub fn contains(&self, key: K) -> bool {
        self.actions.contains_key(&key)
    }

    pub fn action(&self, key: K) -> Option<&ClipAction> {
        self.actions.get(&key)
    }

    pub fn action_mut(&mut self, key: K) -> Option<&mut ClipAction> {
        self.actions.get_mut(&key)
    }

    fn require(&mut self, key: K) -> Result<&mut ClipAction, AnimationError> {
        self.actions
            .get_mut(&key)
            .ok_or_else(|| AnimationError::UnknownAction(format!("{key:?}")))
    }

    /// Fade `to` in while fading `from` out, both over `duration` seconds
    pub fn cross_fade(&mut self, from: K, to: K, duration: f32) -> Result<(), AnimationError> {
        if !self.contains(from) {
            return Err(AnimationError::UnknownAction(format!("{from:?}")));
        }
        self.require(to)?.fade_in(duration).play();
        if from != to {
            self.require(from)?.fade_out(duration);
        }
        log::debug!("Cross-fading {:?} -> {:?} over {:.2}s", from, to, duration);
        Ok(())
    }

    /// Fade an action out over `duration` seconds (stops it at the end)
    pub fn fade_out(&mut self, key: K, duration: f32) -> Result<(), AnimationError> {
        self.require(key)?.fade_out(duration);
        Ok(())
    }

    /// Stop an action immediately
    pub fn stop(&mut self, key: K) -> Result<(), AnimationError> {
        self.require(key)?.stop();
        Ok(())
    }

    /// Advance every running action by `dt` seconds
    ///
    /// Returns the finish events raised during this tick, in binding order.
    /// A zero (or invalid) delta advances nothing and raises nothing.
    pub fn update(&mut self, dt: f32) -> Vec<MixerEvent<K>> {
        let mut events = Vec::new();
        if !(dt > 0.0) {
            return events;
        }

        self.elapsed += dt;
        for key in &self.order {
            let Some(action) = self.actions.get_mut(key) else {
                continue;
            };
            if let Some(ActionEvent::Finished) = action.tick(dt) {
                events.push(MixerEvent::Finished(*key));
            }
        }

        log::trace!(
            "Mixer tick dt={:.4}s, {} running, {} events",
            dt,
            self.running().count(),
            events.len()
        );
        events
    }

    /// Keys of actions currently scheduled for playback
    pub fn running(&self) -> impl Iterator<Item = K> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|key| self.actions.get(key).is_some_and(|a| a.is_running()))
    }

    /// Blended weight of the action bound to `key` (0 if unbound or stopped)
    pub fn weight(&self, key: K) -> f32 {
        self.actions.get(&key).map_or(0.0, |a| a.weight())
    }

    /// Weights of all running actions
    pub fn weights(&self) -> Vec<(K, f32)> {
        self.running().map(|key| (key, self.weight(key))).collect()
    }

    /// Total time advanced since creation
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Sample and blend every contributing action into a pose for `skeleton`
    pub fn sample_pose(&self, skeleton: &Skeleton) -> Pose {
        let mut blender = PoseBlender::new(skeleton.bone_count());

        for key in &self.order {
            let Some(action) = self.actions.get(key) else {
                continue;
            };
            let weight = action.weight();
            if weight <= 0.0 {
                continue;
            }

            for track in &action.clip().tracks {
                if let Some((translation, rotation)) = track.sample(action.time()) {
                    blender.add(
                        track.bone,
                        BoneTransform::new(translation, rotation),
                        weight,
                    );
                }
            }
        }

        blender.finish(skeleton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::clip::{BoneTrack, Keyframe};
    use approx::assert_relative_eq;
    use glam::{Quat, Vec3};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Walk,
        Wave,
        Nod,
    }

    fn mixer() -> AnimationMixer<Key> {
        let mut mixer = AnimationMixer::new();
        mixer
            .clip_action(Key::Walk, &ClipResource::looping("walk", 1.0))
            .unwrap();
        mixer
            .clip_action(Key::Wave, &ClipResource::one_shot("wave", 0.5))
            .unwrap();
        mixer
            .clip_action(Key::Nod, &ClipResource::one_shot("nod", 0.5))
            .unwrap();
        mixer
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mut mixer = mixer();
        let result = mixer.clip_action(Key::Walk, &ClipResource::looping("walk", 1.0));
        assert!(matches!(result, Err(AnimationError::DuplicateAction(_))));
    }

    #[test]
    fn test_unknown_action_errors() {
        let mut mixer: AnimationMixer<Key> = AnimationMixer::new();
        assert!(matches!(
            mixer.stop(Key::Walk),
            Err(AnimationError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_zero_delta_raises_nothing() {
        let mut mixer = mixer();
        mixer.action_mut(Key::Wave).unwrap().play();
        assert!(mixer.update(0.0).is_empty());
        assert!(mixer.update(-1.0).is_empty());
        assert!(mixer.update(f32::NAN).is_empty());
        assert_eq!(mixer.action(Key::Wave).unwrap().time(), 0.0);
    }

    #[test]
    fn test_finish_events_in_binding_order() {
        let mut mixer = mixer();
        mixer.action_mut(Key::Nod).unwrap().play();
        mixer.action_mut(Key::Wave).unwrap().play();

        let events = mixer.update(1.0);
        assert_eq!(
            events,
            vec![MixerEvent::Finished(Key::Wave), MixerEvent::Finished(Key::Nod)]
        );
        assert!(mixer.update(1.0).is_empty());
    }

    #[test]
    fn test_cross_fade_blends_then_settles() {
        let mut mixer = mixer();
        mixer.action_mut(Key::Walk).unwrap().play();
        mixer.cross_fade(Key::Walk, Key::Wave, 0.25).unwrap();

        mixer.update(0.1);
        assert!(mixer.weight(Key::Walk) > 0.0);
        assert!(mixer.weight(Key::Wave) > 0.0);

        mixer.update(0.2);
        assert_eq!(mixer.weight(Key::Walk), 0.0);
        assert_relative_eq!(mixer.weight(Key::Wave), 1.0);
        assert_eq!(mixer.running().collect::<Vec<_>>(), vec![Key::Wave]);
    }

    #[test]
    fn test_sample_pose_follows_weights() {
        let mut mixer = AnimationMixer::new();
        let clip = ClipResource::looping("slide", 1.0).with_track(BoneTrack::new(
            0,
            vec![Keyframe {
                time: 0.0,
                translation: Vec3::new(4.0, 0.0, 0.0),
                rotation: Quat::IDENTITY,
            }],
        ));
        mixer.clip_action(Key::Walk, &clip).unwrap().play();

        let mut skeleton = Skeleton::default();
        skeleton.add_bone("root", None, BoneTransform::IDENTITY);

        let pose = mixer.sample_pose(&skeleton);
        assert_relative_eq!(pose.bones[0].translation.x, 4.0);

        mixer.action_mut(Key::Walk).unwrap().set_effective_weight(0.25);
        let pose = mixer.sample_pose(&skeleton);
        assert_relative_eq!(pose.bones[0].translation.x, 1.0);
    }
}
