// Skeleton handles and weighted pose blending

use glam::{Quat, Vec3};

/// Local transform of a single bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A bone in a skeleton hierarchy
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Rest pose used where no clip drives the bone
    pub bind: BoneTransform,
}

/// Bone hierarchy bound to a mesh
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    /// Append a bone and return its index
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>, bind: BoneTransform) -> usize {
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            bind,
        });
        self.bones.len() - 1
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Bind pose of every bone
    pub fn bind_pose(&self) -> Pose {
        Pose {
            bones: self.bones.iter().map(|b| b.bind).collect(),
        }
    }
}

/// Handle to a mesh with a bound skeleton, supplied by the asset layer
#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    pub name: String,
    pub skeleton: Skeleton,
}

impl SkinnedMesh {
    pub fn new(name: &str, skeleton: Skeleton) -> Self {
        Self {
            name: name.to_string(),
            skeleton,
        }
    }
}

/// Local bone transforms for one frame, indexed like the skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub bones: Vec<BoneTransform>,
}

/// Accumulates weighted bone samples into a pose
///
/// Rotations are blended with normalized lerp, flipping samples into the
/// hemisphere of the first contribution. Bones whose total weight is below 1
/// are completed with the bind pose.
#[derive(Debug)]
pub(crate) struct PoseBlender {
    translation: Vec<Vec3>,
    rotation: Vec<Quat>,
    weight: Vec<f32>,
}

impl PoseBlender {
    pub(crate) fn new(bone_count: usize) -> Self {
        Self {
            translation: vec![Vec3::ZERO; bone_count],
            rotation: vec![Quat::from_xyzw(0.0, 0.0, 0.0, 0.0); bone_count],
            weight: vec![0.0; bone_count],
        }
    }

    pub(crate) fn add(&mut self, bone: usize, sample: BoneTransform, weight: f32) {
        if bone >= self.weight.len() || weight <= 0.0 {
            return;
        }

        let mut rotation = sample.rotation;
        if self.weight[bone] > 0.0 && self.rotation[bone].dot(rotation) < 0.0 {
            rotation = -rotation;
        }

        self.translation[bone] += sample.translation * weight;
        self.rotation[bone] = self.rotation[bone] + rotation * weight;
        self.weight[bone] += weight;
    }

    pub(crate) fn finish(mut self, skeleton: &Skeleton) -> Pose {
        let bones = skeleton
            .bones()
            .iter()
            .enumerate()
            .map(|(i, bone)| {
                let remaining = 1.0 - self.weight[i];
                if remaining > 0.0 {
                    self.add(i, bone.bind, remaining);
                }

                let total = self.weight[i];
                BoneTransform {
                    translation: self.translation[i] / total,
                    rotation: self.rotation[i].normalize(),
                }
            })
            .collect();

        Pose { bones }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_bone_skeleton() -> Skeleton {
        let mut skeleton = Skeleton::default();
        let root = skeleton.add_bone("root", None, BoneTransform::IDENTITY);
        skeleton.add_bone(
            "spine",
            Some(root),
            BoneTransform::new(Vec3::Y, Quat::IDENTITY),
        );
        skeleton
    }

    #[test]
    fn test_find_bone() {
        let skeleton = two_bone_skeleton();
        assert_eq!(skeleton.bone_count(), 2);
        assert_eq!(skeleton.find_bone("spine"), Some(1));
        assert_eq!(skeleton.find_bone("tail"), None);
    }

    #[test]
    fn test_empty_blend_is_bind_pose() {
        let skeleton = two_bone_skeleton();
        let pose = PoseBlender::new(skeleton.bone_count()).finish(&skeleton);
        assert_eq!(pose, skeleton.bind_pose());
    }

    #[test]
    fn test_partial_weight_blends_toward_bind() {
        let skeleton = two_bone_skeleton();
        let mut blender = PoseBlender::new(skeleton.bone_count());
        blender.add(
            0,
            BoneTransform::new(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY),
            0.5,
        );

        let pose = blender.finish(&skeleton);
        assert_relative_eq!(pose.bones[0].translation.x, 1.0);
    }

    #[test]
    fn test_overweight_is_normalized() {
        let skeleton = two_bone_skeleton();
        let mut blender = PoseBlender::new(skeleton.bone_count());
        blender.add(0, BoneTransform::new(Vec3::X, Quat::IDENTITY), 1.0);
        blender.add(0, BoneTransform::new(Vec3::NEG_X, Quat::IDENTITY), 1.0);

        let pose = blender.finish(&skeleton);
        assert_relative_eq!(pose.bones[0].translation.x, 0.0);
    }

    #[test]
    fn test_rotation_blend_uses_shortest_path() {
        let skeleton = two_bone_skeleton();
        let mut blender = PoseBlender::new(skeleton.bone_count());
        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        blender.add(0, BoneTransform::new(Vec3::ZERO, quarter), 0.5);
        // Same rotation, opposite sign
        blender.add(0, BoneTransform::new(Vec3::ZERO, -quarter), 0.5);

        let pose = blender.finish(&skeleton);
        assert_relative_eq!(pose.bones[0].rotation.dot(quarter).abs(), 1.0, epsilon = 1e-5);
    }
}
