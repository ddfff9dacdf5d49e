use nalgebra::base::*;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Circumcenter and squared circumradius of a 2D triangle
///
/// Returns None for flat triangles
pub fn center_and_radius_2d(pts: [Vector2<f64>; 3]) -> Option<(Vector2<f64>, f64)> {
    let vec_0_1 = pts[1] - pts[0];
    let vec_0_2 = pts[2] - pts[0];

    #[rustfmt::skip]
    let mat_slv = Matrix2::new(
        vec_0_1[0], vec_0_1[1],
        vec_0_2[0], vec_0_2[1],
    );

    let sqn0 = pts[0].norm_squared();
    let sqn1 = pts[1].norm_squared();
    let sqn2 = pts[2].norm_squared();

    let vec_slv = Vector2::new(0.5 * (sqn1 - sqn0), 0.5 * (sqn2 - sqn0));

    let scale = vec_0_1.norm() * vec_0_2.norm();
    if scale == 0.0 || (mat_slv.determinant() / scale).abs() < 1e-12 {
        return None;
    }

    match mat_slv.lu().solve(&vec_slv) {
        Some(center) => {
            let radius_sq = (center - pts[0]).norm_squared();
            Some((center, radius_sq))
        }
        None => None,
    }
}

/// Non normalized triangle normal (twice the area)
pub fn triangle_normal(pts: [Vector3<f32>; 3]) -> Vector3<f32> {
    (pts[1] - pts[0]).cross(&(pts[2] - pts[0]))
}

/// Triangle area
pub fn triangle_area(pts: [Vector3<f32>; 3]) -> f32 {
    0.5 * triangle_normal(pts).norm()
}

/// Longest edge length of a triangle
pub fn longest_edge(pts: [Vector3<f32>; 3]) -> f32 {
    let l01 = (pts[1] - pts[0]).norm();
    let l12 = (pts[2] - pts[1]).norm();
    let l20 = (pts[0] - pts[2]).norm();
    l01.max(l12).max(l20)
}

/// Axis aligned bounding box (min, max)
pub fn bounding_box(pts: &[Vector3<f32>]) -> Option<(Vector3<f32>, Vector3<f32>)> {
    let first = pts.first()?;
    let bbox = pts.iter().fold((*first, *first), |(bmin, bmax), pt| {
        (bmin.inf(pt), bmax.sup(pt))
    });
    Some(bbox)
}

/// Quantile of a set of values, linearly interpolated between closest ranks
pub fn quantile(values: &[f32], q: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f32;
    let low = pos.floor() as usize;
    let high = pos.ceil() as usize;
    let frac = pos - low as f32;
    Some(sorted[low] + (sorted[high] - sorted[low]) * frac)
}

fn cross_2d(o: &Vector2<f32>, a: &Vector2<f32>, b: &Vector2<f32>) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Convex hull of 2D points (monotone chain)
///
/// Returns point indices in counter clockwise order. Points lying on a hull edge are
/// kept, so the loop follows every rim point of a regular grid. Returns an empty
/// vector if the points are all collinear.
pub fn convex_hull_2d(pts: &[Vector2<f32>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pts.len()).collect();
    order.sort_by(|&i, &j| {
        pts[i][0]
            .partial_cmp(&pts[j][0])
            .unwrap_or(Ordering::Equal)
            .then(pts[i][1].partial_cmp(&pts[j][1]).unwrap_or(Ordering::Equal))
    });
    order.dedup_by(|i, j| pts[*i] == pts[*j]);
    if order.len() < 3 {
        return Vec::new();
    }
    let (first, last) = (order[0], order[order.len() - 1]);
    if order
        .iter()
        .all(|&ind| cross_2d(&pts[first], &pts[last], &pts[ind]) == 0.0)
    {
        return Vec::new();
    }

    let mut lower: Vec<usize> = Vec::new();
    for &ind in order.iter() {
        while lower.len() >= 2
            && cross_2d(
                &pts[lower[lower.len() - 2]],
                &pts[lower[lower.len() - 1]],
                &pts[ind],
            ) < 0.0
        {
            lower.pop();
        }
        lower.push(ind);
    }

    let mut upper: Vec<usize> = Vec::new();
    for &ind in order.iter().rev() {
        while upper.len() >= 2
            && cross_2d(
                &pts[upper[upper.len() - 2]],
                &pts[upper[upper.len() - 1]],
                &pts[ind],
            ) < 0.0
        {
            upper.pop();
        }
        upper.push(ind);
    }

    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    let mut seen = HashSet::new();
    lower.retain(|&ind| seen.insert(ind));
    if lower.len() < 3 {
        return Vec::new();
    }
    lower
}

/// Sorts point indices by increasing polar angle around a center
pub fn sort_by_polar_angle(inds: &mut Vec<usize>, pts: &[Vector2<f32>], center: &Vector2<f32>) {
    inds.sort_by(|&i, &j| {
        let ang_i = (pts[i][1] - center[1]).atan2(pts[i][0] - center[0]);
        let ang_j = (pts[j][1] - center[1]).atan2(pts[j][0] - center[0]);
        ang_i.partial_cmp(&ang_j).unwrap_or(Ordering::Equal)
    });
}
