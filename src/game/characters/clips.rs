// Clip identifiers of the runner rig and its stock clip set

use std::fmt;

use glam::{Quat, Vec3};

use crate::engine::animation::{
    BoneTrack, BoneTransform, ClipLibrary, ClipResource, Keyframe, Skeleton, SkinnedMesh,
};

/// Symbolic name of every clip a runner character can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClipId {
    Idle,
    IdleToRun,
    Run,
    Sprint,
    JumpStart,
    JumpLoop,
    JumpEnd,
    Slide,
}

impl ClipId {
    pub const ALL: [ClipId; 8] = [
        Self::Idle,
        Self::IdleToRun,
        Self::Run,
        Self::Sprint,
        Self::JumpStart,
        Self::JumpLoop,
        Self::JumpEnd,
        Self::Slide,
    ];

    /// Clip name as authored in the source asset
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::IdleToRun => "idleToRun",
            Self::Run => "run",
            Self::Sprint => "sprint",
            Self::JumpStart => "jumpStart",
            Self::JumpLoop => "jumpLoop",
            Self::JumpEnd => "jumpEnd",
            Self::Slide => "slide",
        }
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Height the root bone reaches at the top of a jump
const JUMP_HEIGHT: f32 = 0.5;

fn root_key(time: f32, height: f32) -> Keyframe {
    Keyframe {
        time,
        translation: Vec3::new(0.0, height, 0.0),
        rotation: Quat::IDENTITY,
    }
}

/// Stock clips of the dummy runner, as the asset layer delivers them
///
/// Loop modes here are the authored defaults; the rig overrides them where
/// the controller needs different behaviour.
pub fn dummy_clip_library() -> ClipLibrary<ClipId> {
    ClipLibrary::from_clips([
        (ClipId::Idle, ClipResource::looping("idle", 2.0)),
        (ClipId::IdleToRun, ClipResource::looping("idleToRun", 0.5)),
        (ClipId::Run, ClipResource::looping("run", 0.8)),
        (ClipId::Sprint, ClipResource::looping("sprint", 0.6)),
        (
            ClipId::JumpStart,
            ClipResource::looping("jumpStart", 0.4).with_track(BoneTrack::new(
                0,
                vec![root_key(0.0, 0.0), root_key(0.4, JUMP_HEIGHT)],
            )),
        ),
        (
            ClipId::JumpLoop,
            ClipResource::looping("jumpLoop", 0.5)
                .with_track(BoneTrack::new(0, vec![root_key(0.0, JUMP_HEIGHT)])),
        ),
        (
            ClipId::JumpEnd,
            ClipResource::looping("jumpEnd", 0.4).with_track(BoneTrack::new(
                0,
                vec![root_key(0.0, JUMP_HEIGHT), root_key(0.4, 0.0)],
            )),
        ),
        (ClipId::Slide, ClipResource::looping("slide", 0.9)),
    ])
}

/// Minimal skinned mesh for the dummy runner
pub fn dummy_mesh() -> SkinnedMesh {
    let mut skeleton = Skeleton::default();
    let root = skeleton.add_bone("root", None, BoneTransform::IDENTITY);
    let hips = skeleton.add_bone(
        "hips",
        Some(root),
        BoneTransform::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
    );
    skeleton.add_bone(
        "spine",
        Some(hips),
        BoneTransform::new(Vec3::new(0.0, 0.25, 0.0), Quat::IDENTITY),
    );
    SkinnedMesh::new("DummyCharacter", skeleton)
}
