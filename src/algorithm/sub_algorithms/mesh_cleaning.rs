use log::debug;

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::mesh3d::mesh_operations;
use crate::mesh3d::GenericMesh3D;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// What the cleaner removed or changed
pub struct CleaningReport {
    pub degenerate_faces: usize,
    pub duplicate_faces: usize,
    pub merged_vertices: usize,
    pub unreferenced_vertices: usize,
    pub flipped_faces: usize,
}

/// Cleans the mesh and computes its normals
///
/// Order matters: each pass relies on the indices left by the previous one.
pub fn clean_mesh(mesh: &mut GenericMesh3D, config: &CleaningConfig) -> Result<CleaningReport> {
    let mut report = CleaningReport::default();

    report.degenerate_faces = mesh_operations::remove_degenerate_faces(mesh, config.area_epsilon);
    report.duplicate_faces = mesh_operations::remove_duplicate_faces(mesh);
    report.merged_vertices = mesh_operations::merge_close_vertices(mesh, config.merge_epsilon);
    report.unreferenced_vertices = mesh_operations::remove_unreferenced_vertices(mesh);
    debug!("Cleaning: {:?}", report);
    mesh.check_mesh()?;

    report.flipped_faces = mesh_operations::orient_faces_outward(mesh);
    mesh_operations::compute_vertex_normals(mesh);
    mesh.check_mesh()?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh3d::MeshRegion;
    use nalgebra::base::*;

    #[test]
    fn test_clean_mesh() {
        let mut mesh = GenericMesh3D::new();
        // two triangles sharing a split edge, one flat triangle, one duplicate
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(1.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(0.0, 1.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(1.0, 0.0, 1e-8), MeshRegion::Shell);
        mesh.add_vertex(&Vector3::new(0.0, 1.0, 0.0), MeshRegion::Shell);
        mesh.add_vertex(&Vector3::new(1.0, 1.0, -1.0), MeshRegion::Shell);
        mesh.add_vertex(&Vector3::new(5.0, 5.0, 5.0), MeshRegion::Neck);
        mesh.add_vertex(&Vector3::new(2.0, 0.0, 0.0), MeshRegion::Neck);
        mesh.add_face(0, 1, 2).unwrap();
        mesh.add_face(3, 5, 4).unwrap();
        mesh.add_face(0, 1, 7).unwrap();
        mesh.add_face(2, 1, 0).unwrap();
        // collapses once vertex 3 is merged into vertex 1
        mesh.add_face(0, 1, 3).unwrap();

        let report = clean_mesh(&mut mesh, &CleaningConfig::default()).unwrap();
        assert_eq!(report.degenerate_faces, 1);
        assert_eq!(report.duplicate_faces, 1);
        assert_eq!(report.merged_vertices, 2);
        assert_eq!(report.unreferenced_vertices, 4);
        assert_eq!(mesh.get_nb_vertices(), 4);
        assert_eq!(mesh.get_nb_faces(), 2);
        assert_eq!(mesh.normals().unwrap().len(), 4);
        assert!(mesh.region_indices(MeshRegion::Neck).is_empty());
    }
}
