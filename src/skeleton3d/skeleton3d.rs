use nalgebra::base::*;

use crate::error::{AvatarError, Result};

#[derive(Clone, Debug)]
/// Skeleton bone
pub struct Bone {
    /// Bone name
    pub name: String,
    /// Parent bone index, None for the root
    pub parent: Option<usize>,
    /// Rest position, in mesh space
    pub position: Vector3<f32>,
}

#[derive(Clone, Debug, Default)]
/// 3D Skeleton structure: bones ordered parent before child
pub struct Skeleton3D {
    pub(super) bones: Vec<Bone>,
}

impl Skeleton3D {
    /// Skeleton 3D constructor
    pub fn new() -> Skeleton3D {
        Skeleton3D { bones: Vec::new() }
    }

    /// Adds a bone to the skeleton, its parent must already exist
    pub fn add_bone(
        &mut self,
        name: &str,
        parent: Option<usize>,
        position: &Vector3<f32>,
    ) -> Result<usize> {
        if let Some(ind_parent) = parent {
            if ind_parent >= self.bones.len() {
                return Err(AvatarError::InvalidSkeleton(format!(
                    "add_bone(): parent {} of {} does not exist yet",
                    ind_parent, name
                )));
            }
        } else if self.root().is_some() {
            return Err(AvatarError::InvalidSkeleton(format!(
                "add_bone(): {} would be a second root",
                name
            )));
        }
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            position: *position,
        });
        Ok(self.bones.len() - 1)
    }

    /// Bone getter
    pub fn get_bone(&self, ind_bone: usize) -> Result<&Bone> {
        self.bones.get(ind_bone).ok_or_else(|| {
            AvatarError::InvalidSkeleton(format!("get_bone(): Index {} out of bounds", ind_bone))
        })
    }

    /// Gets number of bones
    pub fn get_nb_bones(&self) -> usize {
        self.bones.len()
    }

    /// Bones, parents first
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Index of the parentless bone
    pub fn root(&self) -> Option<usize> {
        self.bones.iter().position(|bone| bone.parent.is_none())
    }

    /// Direct children of a bone
    pub fn children(&self, ind_bone: usize) -> Vec<usize> {
        self.bones
            .iter()
            .enumerate()
            .filter_map(|(ind, bone)| {
                if bone.parent == Some(ind_bone) {
                    Some(ind)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Bone names, in bone order
    pub fn bone_names(&self) -> Vec<String> {
        self.bones.iter().map(|bone| bone.name.clone()).collect()
    }

    /// Index of a bone given its name
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Bone rest position relative to its parent (absolute for the root)
    pub fn local_translation(&self, ind_bone: usize) -> Result<Vector3<f32>> {
        let bone = self.get_bone(ind_bone)?;
        match bone.parent {
            Some(ind_parent) => Ok(bone.position - self.get_bone(ind_parent)?.position),
            None => Ok(bone.position),
        }
    }

    /// Checks the hierarchy: one root, every parent stored before its children
    pub fn check(&self) -> Result<()> {
        let nb_roots = self.bones.iter().filter(|bone| bone.parent.is_none()).count();
        if nb_roots != 1 {
            return Err(AvatarError::InvalidSkeleton(format!(
                "check(): {} root bones",
                nb_roots
            )));
        }
        for (ind_bone, bone) in self.bones.iter().enumerate() {
            if let Some(ind_parent) = bone.parent {
                if ind_parent >= ind_bone {
                    return Err(AvatarError::InvalidSkeleton(format!(
                        "check(): bone {} ({}) has parent {}",
                        ind_bone, bone.name, ind_parent
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_skeleton() -> Skeleton3D {
        let mut skeleton = Skeleton3D::new();
        let hips = skeleton
            .add_bone("Hips", None, &Vector3::new(0.0, 1.0, 0.0))
            .unwrap();
        let spine = skeleton
            .add_bone("Spine", Some(hips), &Vector3::new(0.0, 1.5, 0.0))
            .unwrap();
        skeleton
            .add_bone("Head", Some(spine), &Vector3::new(0.0, 2.0, 0.5))
            .unwrap();
        skeleton
            .add_bone("Leg", Some(hips), &Vector3::new(0.5, 0.0, 0.0))
            .unwrap();
        skeleton
    }

    #[test]
    fn test_hierarchy_queries() {
        let skeleton = small_skeleton();
        assert!(skeleton.check().is_ok());
        assert_eq!(skeleton.root(), Some(0));
        assert_eq!(skeleton.children(0), vec![1, 3]);
        assert_eq!(skeleton.find_bone("Head"), Some(2));
        assert_eq!(
            skeleton.local_translation(2).unwrap(),
            Vector3::new(0.0, 0.5, 0.5)
        );
        assert_eq!(
            skeleton.local_translation(0).unwrap(),
            Vector3::new(0.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_forward_parent_rejected() {
        let mut skeleton = small_skeleton();
        assert!(skeleton
            .add_bone("Foot", Some(7), &Vector3::zeros())
            .is_err());
        assert!(skeleton.add_bone("Root2", None, &Vector3::zeros()).is_err());

        skeleton.bones[1].parent = Some(2);
        assert!(matches!(
            skeleton.check(),
            Err(AvatarError::InvalidSkeleton(_))
        ));
    }
}
