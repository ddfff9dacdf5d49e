use nalgebra::base::*;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::error::{AvatarError, Result};
use crate::mesh3d::Face;

/// 2D Delaunay triangulation
///
/// Coincident points are triangulated once, through their first occurrence.
/// Returns faces over the input indices, counter clockwise, or nothing if every
/// point is collinear.
pub fn delaunay_2d(points: &[Vector2<f64>]) -> Result<Vec<Face>> {
    let mut del_struct: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();

    // spade vertex index -> first input point at that position
    let mut corresp: Vec<usize> = Vec::with_capacity(points.len());
    for (ind_point, pt) in points.iter().enumerate() {
        let handle = del_struct
            .insert(Point2::new(pt[0], pt[1]))
            .map_err(|err| {
                AvatarError::Input(format!("point {} cannot be triangulated: {:?}", ind_point, err))
            })?;
        if handle.index() == corresp.len() {
            corresp.push(ind_point);
        }
    }

    let mut faces = Vec::with_capacity(del_struct.num_inner_faces());
    for face in del_struct.inner_faces() {
        let [a, b, c] = face.vertices().map(|vert| corresp[vert.fix().index()]);
        let cross = (points[b] - points[a]).perp(&(points[c] - points[a]));
        if cross < 0.0 {
            faces.push([a, c, b]);
        } else {
            faces.push([a, b, c]);
        }
    }
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geometry_operations;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_square() {
        let pts = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.1),
            Vector2::new(0.0, 1.0),
        ];
        let faces = delaunay_2d(&pts).unwrap();
        assert_eq!(faces.len(), 2);
    }

    #[test]
    fn test_duplicates_and_collinear() {
        let line: Vec<Vector2<f64>> = (0..4).map(|i| Vector2::new(i as f64, i as f64)).collect();
        assert!(delaunay_2d(&line).unwrap().is_empty());

        let pts = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 0.0),
        ];
        let faces = delaunay_2d(&pts).unwrap();
        assert_eq!(faces.len(), 1);
        assert!(faces[0].contains(&1));
        assert!(!faces[0].contains(&3));
    }

    #[test]
    fn test_non_finite_point() {
        let pts = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(f64::NAN, 0.0),
            Vector2::new(0.0, 1.0),
        ];
        assert!(matches!(delaunay_2d(&pts), Err(AvatarError::Input(_))));
    }

    #[test]
    fn test_random_points_empty_circumcircles() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<Vector2<f64>> = (0..60)
            .map(|_| Vector2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        let faces = delaunay_2d(&pts).unwrap();
        // Euler: 2n - 2 - h triangles, h >= 3
        assert!(faces.len() <= 2 * pts.len() - 5);
        assert!(faces.len() >= pts.len());

        for face in faces.iter() {
            let cross = (pts[face[1]] - pts[face[0]]).perp(&(pts[face[2]] - pts[face[0]]));
            assert!(cross > 0.0);
            let (center, radius_sq) =
                geometry_operations::center_and_radius_2d([pts[face[0]], pts[face[1]], pts[face[2]]])
                    .unwrap();
            for (ind, pt) in pts.iter().enumerate() {
                if !face.contains(&ind) {
                    assert!((pt - center).norm_squared() >= radius_sq * (1.0 - 1e-9));
                }
            }
        }
    }
}
