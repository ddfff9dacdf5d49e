use nalgebra::base::*;

use crate::algorithm::sub_algorithms::landmark_projection;
use crate::config::DepthConfig;
use crate::error::Result;
use crate::input::{DepthMap, DepthSource};
use crate::mesh3d::{GenericMesh3D, MeshRegion};

/// Offsets the depth of every visible surface vertex by `(sample - 0.5) * strength`
///
/// Vertices are mapped back to depth map pixels through the inverse landmark
/// projection. Shell and neck vertices are left untouched. Returns the number of
/// displaced vertices.
pub fn refine_depth(mesh: &mut GenericMesh3D, depth: &DepthMap, config: &DepthConfig) -> Result<usize> {
    let surface = mesh.region_indices(MeshRegion::Surface);
    for &ind_vertex in surface.iter() {
        let vert = mesh.get_vertex(ind_vertex)?;
        let (px, py) = landmark_projection::to_pixel(&vert, depth.width(), depth.height());
        let sample = depth.sample(px, py);
        let displaced = vert + Vector3::new(0.0, 0.0, (sample - 0.5) * config.strength);
        mesh.set_vertex(ind_vertex, &displaced)?;
    }
    Ok(surface.len())
}

/// Fetches the depth map and refines the surface with it
///
/// Source errors are returned untouched so the caller can skip the stage.
pub fn refine_from_source(
    mesh: &mut GenericMesh3D,
    source: &dyn DepthSource,
    config: &DepthConfig,
) -> Result<usize> {
    let depth = source.depth_map()?;
    refine_depth(mesh, &depth, config)
}
