use log::{debug, warn};
use nalgebra::base::*;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::algorithm::delaunay_alg;
use crate::config::TriangulationConfig;
use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::{Face, Vertex};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Strategy that produced the surface triangles
pub enum TriangulationMethod {
    /// Closed 3-cycles of the landmark adjacency graph
    Topology,
    /// 2D Delaunay triangulation of the projected landmarks
    Delaunay,
}

#[derive(Clone, Debug)]
/// Triangulated visible surface
pub struct SurfaceTriangulation {
    pub faces: Vec<Face>,
    pub method: TriangulationMethod,
}

/// Triangles closed by the adjacency graph, as sorted index triples
///
/// Each vertex pairs its neighbors, so the cost is quadratic in the vertex degree.
/// Landmark tessellations have a small bounded degree; dense graphs need another
/// join strategy.
pub fn triangles_from_adjacency(nb_points: usize, edges: &[[usize; 2]]) -> Result<Vec<Face>> {
    let mut neighbors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); nb_points];
    for edge in edges.iter() {
        if edge[0] >= nb_points || edge[1] >= nb_points {
            return Err(AvatarError::Input(format!(
                "adjacency edge {:?} references a missing landmark ({} landmarks)",
                edge, nb_points
            )));
        }
        if edge[0] != edge[1] {
            neighbors[edge[0]].insert(edge[1]);
            neighbors[edge[1]].insert(edge[0]);
        }
    }

    let mut triangles: BTreeSet<Face> = BTreeSet::new();
    for (ind_vertex, neigh) in neighbors.iter().enumerate() {
        let neigh: Vec<usize> = neigh.iter().copied().collect();
        for i in 0..neigh.len() {
            for j in (i + 1)..neigh.len() {
                if neighbors[neigh[i]].contains(&neigh[j]) {
                    let mut tri = [ind_vertex, neigh[i], neigh[j]];
                    tri.sort();
                    triangles.insert(tri);
                }
            }
        }
    }
    Ok(triangles.into_iter().collect())
}

/// Median length of the distinct edges of a face set
pub fn median_edge_length(points: &[Vertex], faces: &[Face]) -> Option<f32> {
    let mut edges: HashSet<[usize; 2]> = HashSet::new();
    for face in faces.iter() {
        for k in 0..3 {
            let (a, b) = (face[k], face[(k + 1) % 3]);
            edges.insert(if a < b { [a, b] } else { [b, a] });
        }
    }
    let mut lengths: Vec<f32> = edges
        .iter()
        .map(|edge| (points[edge[1]] - points[edge[0]]).norm())
        .collect();
    if lengths.is_empty() {
        return None;
    }
    lengths.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(lengths[lengths.len() / 2])
}

/// Drops triangles whose longest edge exceeds `max_edge_factor` times the median edge
pub fn filter_long_edges(points: &[Vertex], faces: &[Face], max_edge_factor: f32) -> Vec<Face> {
    let median = match median_edge_length(points, faces) {
        Some(med) if med > 0.0 => med,
        _ => return faces.to_vec(),
    };
    let max_length = max_edge_factor * median;
    faces
        .iter()
        .filter(|face| {
            geometry_operations::longest_edge([points[face[0]], points[face[1]], points[face[2]]])
                <= max_length
        })
        .copied()
        .collect()
}

/// Orients faces counter clockwise in the image plane (normals toward +z)
fn orient_toward_camera(points: &[Vertex], faces: &mut [Face]) {
    for face in faces.iter_mut() {
        let normal = geometry_operations::triangle_normal([
            points[face[0]],
            points[face[1]],
            points[face[2]],
        ]);
        if normal[2] < 0.0 {
            face.swap(1, 2);
        }
    }
}

fn delaunay_faces(points: &[Vertex], max_edge_factor: f32) -> Result<Vec<Face>> {
    let planar: Vec<Vector2<f64>> = points
        .iter()
        .map(|pt| Vector2::new(pt[0] as f64, pt[1] as f64))
        .collect();
    let faces = delaunay_alg::delaunay_2d(&planar)?;
    let filtered = filter_long_edges(points, &faces, max_edge_factor);
    if filtered.is_empty() {
        Ok(faces)
    } else {
        Ok(filtered)
    }
}

/// Triangulates the projected landmarks
///
/// Topology triangles are used when an adjacency list is given and enough of them
/// survive the edge filter, otherwise the Delaunay triangulation of the (x, y)
/// projection is used. Too few topology triangles still beat an empty Delaunay
/// result.
pub fn triangulate_surface(
    points: &[Vertex],
    adjacency: Option<&[[usize; 2]]>,
    config: &TriangulationConfig,
) -> Result<SurfaceTriangulation> {
    if points.len() < 3 {
        return Err(AvatarError::Input(format!(
            "{} points cannot be triangulated",
            points.len()
        )));
    }

    let mut topology_faces = Vec::new();
    if let Some(edges) = adjacency {
        let triangles = triangles_from_adjacency(points.len(), edges)?;
        let nb_cycles = triangles.len();
        let mut faces = filter_long_edges(points, &triangles, config.max_edge_factor);
        let required = ((points.len() as f32 * config.min_topology_ratio).ceil() as usize).max(1);
        debug!(
            "Topology: {} closed cycles, {} kept after edge filter ({} required)",
            nb_cycles,
            faces.len(),
            required
        );
        if faces.len() >= required {
            orient_toward_camera(points, &mut faces);
            return Ok(SurfaceTriangulation {
                faces,
                method: TriangulationMethod::Topology,
            });
        }
        warn!(
            "Topology gave {} triangles ({} required), falling back to Delaunay",
            faces.len(),
            required
        );
        topology_faces = faces;
    }

    let mut faces = delaunay_faces(points, config.max_edge_factor)?;
    if faces.is_empty() {
        if topology_faces.is_empty() {
            return Err(AvatarError::GeometryDegenerate {
                points: points.len(),
            });
        }
        warn!(
            "Delaunay gave no triangle, keeping {} topology triangles",
            topology_faces.len()
        );
        orient_toward_camera(points, &mut topology_faces);
        return Ok(SurfaceTriangulation {
            faces: topology_faces,
            method: TriangulationMethod::Topology,
        });
    }
    orient_toward_camera(points, &mut faces);
    Ok(SurfaceTriangulation {
        faces,
        method: TriangulationMethod::Delaunay,
    })
}
