use log::debug;

use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::Vertex;
use crate::skeleton3d::{SkeletonPreset, Skeleton3D};

/// Places the bones of a preset inside the mesh bounding box
///
/// Each bone sits at `bbox_min + ratio * bbox_size`. The mesh is assumed upright
/// (y up) and facing +z.
pub fn estimate_skeleton(vertices: &[Vertex], preset: SkeletonPreset) -> Result<Skeleton3D> {
    let (bmin, bmax) = geometry_operations::bounding_box(vertices).ok_or_else(|| {
        AvatarError::InvalidMesh("estimate_skeleton(): empty mesh".to_string())
    })?;
    let size = bmax - bmin;

    let mut skeleton = Skeleton3D::new();
    for def in preset.bones().iter() {
        let ratio = Vertex::new(def.ratio[0], def.ratio[1], def.ratio[2]);
        let position = bmin + size.component_mul(&ratio);
        skeleton.add_bone(def.name, def.parent, &position)?;
    }
    skeleton.check()?;
    debug!(
        "Skeleton {}: {} bones in box {:?} - {:?}",
        preset,
        skeleton.get_nb_bones(),
        bmin.as_slice(),
        bmax.as_slice()
    );

    Ok(skeleton)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::base::*;

    fn box_vertices() -> Vec<Vertex> {
        vec![Vector3::new(-1.0, 0.0, -0.5), Vector3::new(1.0, 2.0, 0.5)]
    }

    #[test]
    fn test_humanoid_placement() {
        let skeleton = estimate_skeleton(&box_vertices(), SkeletonPreset::Humanoid).unwrap();
        assert_eq!(skeleton.get_nb_bones(), 20);
        assert_eq!(skeleton.root(), Some(0));

        let hips = skeleton.get_bone(0).unwrap();
        assert_eq!(hips.name, "Hips");
        assert!((hips.position - Vector3::new(0.0, 0.9, 0.0)).norm() < 1e-6);

        let head_top = skeleton.find_bone("HeadTop_End").unwrap();
        assert!((skeleton.get_bone(head_top).unwrap().position[1] - 1.96).abs() < 1e-6);

        let left = skeleton.get_bone(skeleton.find_bone("LeftHand").unwrap()).unwrap();
        let right = skeleton.get_bone(skeleton.find_bone("RightHand").unwrap()).unwrap();
        assert!((left.position[0] + right.position[0]).abs() < 1e-6);
    }

    #[test]
    fn test_mixamo_has_toes() {
        let skeleton = estimate_skeleton(&box_vertices(), SkeletonPreset::Mixamo).unwrap();
        assert_eq!(skeleton.get_nb_bones(), 23);
        let toe = skeleton.find_bone("LeftToeBase").unwrap();
        let foot = skeleton.find_bone("LeftFoot").unwrap();
        assert_eq!(skeleton.get_bone(toe).unwrap().parent, Some(foot));
    }

    #[test]
    fn test_empty_mesh() {
        assert!(estimate_skeleton(&[], SkeletonPreset::Humanoid).is_err());
    }
}
