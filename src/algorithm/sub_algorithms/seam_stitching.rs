use nalgebra::base::*;

use crate::config::SeamConfig;
use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::{Face, Vertex};

fn planar(points: &[Vertex]) -> Vec<Vector2<f32>> {
    points.iter().map(|pt| Vector2::new(pt[0], pt[1])).collect()
}

fn planar_centroid(pts: &[Vector2<f32>]) -> Vector2<f32> {
    pts.iter().fold(Vector2::zeros(), |acc: Vector2<f32>, pt| acc + pt) / pts.len().max(1) as f32
}

/// Boundary loop of the visible surface, ordered by polar angle around its centroid
///
/// Uses the convex hull of the (x, y) projection. When the hull has fewer than
/// `min_points` points, the points beyond the `boundary_percentile` radial distance
/// are used instead.
pub fn extract_boundary(surface: &[Vertex], config: &SeamConfig) -> Vec<usize> {
    if surface.is_empty() {
        return Vec::new();
    }
    let pts = planar(surface);
    let centroid = planar_centroid(&pts);

    let mut boundary = geometry_operations::convex_hull_2d(&pts);
    if boundary.len() < config.min_points {
        let dists: Vec<f32> = pts.iter().map(|pt| (pt - centroid).norm()).collect();
        boundary = match geometry_operations::quantile(&dists, config.boundary_percentile) {
            Some(threshold) => (0..pts.len()).filter(|&ind| dists[ind] > threshold).collect(),
            None => Vec::new(),
        };
    }
    geometry_operations::sort_by_polar_angle(&mut boundary, &pts, &centroid);
    boundary
}

/// Front facing ring of the shell: vertices in the nearest `1 - ring_quantile` depth band
pub fn front_ring(shell: &[Vertex], config: &SeamConfig) -> Vec<usize> {
    let depths: Vec<f32> = shell.iter().map(|vert| vert[2]).collect();
    match geometry_operations::quantile(&depths, config.ring_quantile) {
        Some(threshold) => (0..shell.len()).filter(|&ind| depths[ind] >= threshold).collect(),
        None => Vec::new(),
    }
}

/// Faces joining the visible surface boundary to the shell front ring
///
/// Surface vertices are indexed from 0, shell vertices from `shell_offset`. Each
/// boundary vertex is matched to its nearest ring vertex and every consecutive
/// boundary pair yields a quad (two triangles, one if both ends share their ring
/// vertex). Fails with `StitchUnavailable` if the boundary or the ring has fewer
/// than `min_points` points.
pub fn stitch_seam(
    surface: &[Vertex],
    shell: &[Vertex],
    shell_offset: usize,
    config: &SeamConfig,
) -> Result<Vec<Face>> {
    let boundary = extract_boundary(surface, config);
    let ring = front_ring(shell, config);
    if boundary.len() < config.min_points || ring.len() < config.min_points {
        return Err(AvatarError::StitchUnavailable {
            boundary: boundary.len(),
            ring: ring.len(),
            required: config.min_points,
        });
    }

    let matched: Vec<usize> = boundary
        .iter()
        .map(|&ind_bnd| {
            let mut best = ring[0];
            let mut best_dist = f32::INFINITY;
            for &ind_ring in ring.iter() {
                let dist = (shell[ind_ring] - surface[ind_bnd]).norm_squared();
                if dist < best_dist {
                    best_dist = dist;
                    best = ind_ring;
                }
            }
            best + shell_offset
        })
        .collect();

    let mut faces = Vec::with_capacity(2 * boundary.len());
    for i in 0..boundary.len() {
        let j = (i + 1) % boundary.len();
        let (b_i, b_j) = (boundary[i], boundary[j]);
        let (r_i, r_j) = (matched[i], matched[j]);
        faces.push([b_i, r_i, b_j]);
        if r_i != r_j {
            faces.push([b_j, r_i, r_j]);
        }
    }
    Ok(faces)
}
