use nalgebra::base::*;
use std::collections::{HashMap, HashSet};

use crate::geometry::geometry_operations;
use crate::mesh3d::generic_mesh3d::{Face, Vertex};
use crate::mesh3d::GenericMesh3D;

fn face_points(vertices: &[Vertex], face: &Face) -> [Vertex; 3] {
    [vertices[face[0]], vertices[face[1]], vertices[face[2]]]
}

fn retain_used<T>(vals: &mut Vec<T>, used: &[bool]) {
    let mut ind = 0;
    vals.retain(|_| {
        let res = used[ind];
        ind = ind + 1;
        res
    });
}

fn sorted_face(face: &Face) -> Face {
    let mut key = *face;
    key.sort();
    key
}

/// Removes faces with repeated vertices or with an area below epsilon
///
/// Returns the number of removed faces
pub fn remove_degenerate_faces(mesh: &mut GenericMesh3D, area_epsilon: f32) -> usize {
    let nb_before = mesh.faces.len();
    let vertices = &mesh.vertices;
    mesh.faces.retain(|face| {
        face[0] != face[1]
            && face[1] != face[2]
            && face[0] != face[2]
            && geometry_operations::triangle_area(face_points(vertices, face)) > area_epsilon
    });
    nb_before - mesh.faces.len()
}

/// Removes faces built on the same three vertices as an earlier face
///
/// Returns the number of removed faces
pub fn remove_duplicate_faces(mesh: &mut GenericMesh3D) -> usize {
    let nb_before = mesh.faces.len();
    let mut seen: HashSet<Face> = HashSet::new();
    mesh.faces.retain(|face| seen.insert(sorted_face(face)));
    nb_before - mesh.faces.len()
}

/// Merges vertices closer than epsilon into the first one met
///
/// Only faces are remapped: merged vertices become unreferenced and are dropped by
/// [`remove_unreferenced_vertices`]. Faces collapsing onto an edge and faces becoming
/// duplicates are removed. Returns the number of merged vertices.
pub fn merge_close_vertices(mesh: &mut GenericMesh3D, merge_epsilon: f32) -> usize {
    let cell = merge_epsilon.max(f32::MIN_POSITIVE);
    let cell_of = |vert: &Vertex| -> [i64; 3] {
        [
            (vert[0] / cell).floor() as i64,
            (vert[1] / cell).floor() as i64,
            (vert[2] / cell).floor() as i64,
        ]
    };

    let mut grid: HashMap<[i64; 3], Vec<usize>> = HashMap::new();
    let mut corresp: Vec<usize> = Vec::with_capacity(mesh.vertices.len());
    let mut nb_merged = 0;

    for (ind_vertex, vert) in mesh.vertices.iter().enumerate() {
        let key = cell_of(vert);
        let mut opt_rep = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neigh = [key[0] + dx, key[1] + dy, key[2] + dz];
                    if let Some(cands) = grid.get(&neigh) {
                        for &ind_cand in cands.iter() {
                            if (mesh.vertices[ind_cand] - vert).norm() <= merge_epsilon {
                                opt_rep = Some(ind_cand);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }
        match opt_rep {
            Some(ind_rep) => {
                corresp.push(ind_rep);
                nb_merged = nb_merged + 1;
            }
            None => {
                grid.entry(key).or_insert_with(Vec::new).push(ind_vertex);
                corresp.push(ind_vertex);
            }
        }
    }

    if nb_merged == 0 {
        return 0;
    }

    for face in mesh.faces.iter_mut() {
        for ind in face.iter_mut() {
            *ind = corresp[*ind];
        }
    }
    mesh.faces
        .retain(|face| face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
    remove_duplicate_faces(mesh);
    mesh.normals = None;

    nb_merged
}

/// Removes vertices referenced by no face, compacting every per vertex buffer
///
/// Returns the number of removed vertices
pub fn remove_unreferenced_vertices(mesh: &mut GenericMesh3D) -> usize {
    let nb_before = mesh.vertices.len();
    let mut used = vec![false; nb_before];
    for face in mesh.faces.iter() {
        for &ind in face.iter() {
            used[ind] = true;
        }
    }

    let mut corresp: Vec<Option<usize>> = vec![None; nb_before];
    let mut cpt = 0;
    for ind_vertex in 0..nb_before {
        if used[ind_vertex] {
            corresp[ind_vertex] = Some(cpt);
            cpt = cpt + 1;
        }
    }
    if cpt == nb_before {
        return 0;
    }

    retain_used(&mut mesh.vertices, &used);
    retain_used(&mut mesh.regions, &used);
    if let Some(colors) = mesh.colors.as_mut() {
        retain_used(colors, &used);
    }
    mesh.normals = None;

    for face in mesh.faces.iter_mut() {
        for ind in face.iter_mut() {
            // every face vertex is used, hence mapped
            *ind = corresp[*ind].unwrap_or(0);
        }
    }

    nb_before - cpt
}

/// Flips faces whose normal points toward the mesh centroid
///
/// Returns the number of flipped faces
pub fn orient_faces_outward(mesh: &mut GenericMesh3D) -> usize {
    if mesh.vertices.is_empty() {
        return 0;
    }
    let centroid = mesh
        .vertices
        .iter()
        .fold(Vector3::zeros(), |acc: Vertex, vert| acc + vert)
        / mesh.vertices.len() as f32;

    let mut nb_flipped = 0;
    let vertices = &mesh.vertices;
    for face in mesh.faces.iter_mut() {
        let pts = face_points(vertices, face);
        let normal = geometry_operations::triangle_normal(pts);
        let face_center = (pts[0] + pts[1] + pts[2]) / 3.0;
        if normal.dot(&(face_center - centroid)) < 0.0 {
            face.swap(1, 2);
            nb_flipped = nb_flipped + 1;
        }
    }
    nb_flipped
}

/// Computes area weighted vertex normals
pub fn compute_vertex_normals(mesh: &mut GenericMesh3D) {
    let mut normals: Vec<Vertex> = vec![Vector3::zeros(); mesh.vertices.len()];
    for face in mesh.faces.iter() {
        let normal = geometry_operations::triangle_normal(face_points(&mesh.vertices, face));
        for &ind in face.iter() {
            normals[ind] += normal;
        }
    }
    for normal in normals.iter_mut() {
        *normal = normal.try_normalize(1e-20).unwrap_or(Vector3::y());
    }
    mesh.normals = Some(normals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh3d::MeshRegion;

    fn tetrahedron() -> GenericMesh3D {
        let mut mesh = GenericMesh3D::new();
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(1.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(0.0, 1.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 1.0), MeshRegion::Shell);
        mesh.add_face(0, 1, 2).unwrap();
        mesh.add_face(0, 1, 3).unwrap();
        mesh.add_face(1, 2, 3).unwrap();
        mesh.add_face(0, 2, 3).unwrap();
        mesh
    }

    #[test]
    fn test_remove_degenerate_faces() {
        let mut mesh = tetrahedron();
        mesh.add_vertex(&Vector3::new(2.0, 0.0, 0.0), MeshRegion::Surface);
        // collinear
        mesh.add_face(0, 1, 4).unwrap();
        // repeated vertex
        mesh.add_face(2, 2, 3).unwrap();
        assert_eq!(remove_degenerate_faces(&mut mesh, 1e-12), 2);
        assert_eq!(mesh.get_nb_faces(), 4);
    }

    #[test]
    fn test_remove_duplicate_faces_ignores_winding() {
        let mut mesh = tetrahedron();
        mesh.add_face(2, 1, 0).unwrap();
        mesh.add_face(0, 1, 2).unwrap();
        assert_eq!(remove_duplicate_faces(&mut mesh), 2);
        assert_eq!(mesh.get_nb_faces(), 4);
    }

    #[test]
    fn test_merge_then_compact() {
        let mut mesh = tetrahedron();
        let ind_copy = mesh.add_vertex(&Vector3::new(1.0, 1e-8, 0.0), MeshRegion::Neck);
        mesh.add_face(0, ind_copy, 3).unwrap();

        // the extra face becomes a duplicate of (0, 1, 3) once merged
        assert_eq!(merge_close_vertices(&mut mesh, 1e-6), 1);
        assert_eq!(mesh.get_nb_faces(), 4);
        assert_eq!(mesh.get_nb_vertices(), 5);

        assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
        assert_eq!(mesh.get_nb_vertices(), 4);
        assert_eq!(mesh.region_indices(MeshRegion::Neck), Vec::<usize>::new());
        assert!(mesh.check_mesh().is_ok());
    }

    #[test]
    fn test_unreferenced_keeps_colors_in_lockstep() {
        let mut mesh = GenericMesh3D::new();
        for i in 0..4 {
            mesh.add_vertex(&Vector3::new(i as f32, (i * i) as f32, 0.0), MeshRegion::Surface);
        }
        mesh.set_colors(vec![
            [0.0, 0.0, 0.0, 1.0],
            [0.1, 0.0, 0.0, 1.0],
            [0.2, 0.0, 0.0, 1.0],
            [0.3, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        mesh.add_face(1, 2, 3).unwrap();

        assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
        assert_eq!(mesh.get_face(0).unwrap(), [0, 1, 2]);
        assert_eq!(mesh.colors().unwrap()[0], [0.1, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_orient_outward_and_normals() {
        let mut mesh = tetrahedron();
        orient_faces_outward(&mut mesh);
        // the bottom face (z = 0) must now point down
        let face = mesh.get_face(0).unwrap();
        let normal = geometry_operations::triangle_normal(face_points(mesh.vertices(), &face));
        assert!(normal[2] < 0.0);

        // orientation is stable
        assert_eq!(orient_faces_outward(&mut mesh), 0);

        compute_vertex_normals(&mut mesh);
        let normals = mesh.normals().unwrap();
        assert_eq!(normals.len(), 4);
        for normal in normals {
            assert!((normal.norm() - 1.0).abs() < 1e-5);
        }
    }
}
