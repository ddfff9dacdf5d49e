use nalgebra::base::*;

use crate::error::{AvatarError, Result};
use crate::input::LandmarkSet;
use crate::mesh3d::Vertex;

/// Head-local width covered by the normalized image x range
pub const X_SCALE: f32 = 0.24;
/// Head-local height covered by the normalized image y range
pub const Y_SCALE: f32 = 0.28;
/// Head-local height of the image center
pub const Y_OFFSET: f32 = 0.85;
/// Half depth range of the visible surface
pub const Z_SCALE: f32 = 0.12;
/// Head-local depth of a landmark at mean depth
pub const Z_OFFSET: f32 = 0.12;
/// Power law exponent compressing the landmark depths
pub const DEPTH_EXPONENT: f32 = 0.55;
/// Minimum number of landmarks
pub const MIN_LANDMARKS: usize = 3;

/// Zero centers, compresses (signed power law) and rescales depths to [-1, 1]
pub fn compress_depths(depths: &[f32]) -> Vec<f32> {
    if depths.is_empty() {
        return Vec::new();
    }
    let mean = depths.iter().sum::<f32>() / depths.len() as f32;
    let compressed: Vec<f32> = depths
        .iter()
        .map(|&z| {
            let zc = z - mean;
            zc.signum() * zc.abs().powf(DEPTH_EXPONENT)
        })
        .collect();
    let max_abs = compressed.iter().fold(0.0f32, |acc, z| acc.max(z.abs()));
    if max_abs <= f32::EPSILON {
        return vec![0.0; depths.len()];
    }
    compressed.iter().map(|z| z / max_abs).collect()
}

/// Maps landmarks into the head-local frame (y up, +z toward the camera)
///
/// Detector depths grow away from the camera, so the closest landmark gets the
/// largest head-local z (`2 * Z_OFFSET` at most).
pub fn project_landmarks(landmarks: &LandmarkSet) -> Result<Vec<Vertex>> {
    if landmarks.len() < MIN_LANDMARKS {
        return Err(AvatarError::Input(format!(
            "{} landmarks given, at least {} needed",
            landmarks.len(),
            MIN_LANDMARKS
        )));
    }
    if let Some(ind) = landmarks
        .landmarks()
        .iter()
        .position(|lm| !(lm.x.is_finite() && lm.y.is_finite() && lm.z.is_finite()))
    {
        return Err(AvatarError::Input(format!(
            "landmark {} has a non finite coordinate",
            ind
        )));
    }

    let depths: Vec<f32> = landmarks.landmarks().iter().map(|lm| lm.z).collect();
    let depths = compress_depths(&depths);

    let points = landmarks
        .landmarks()
        .iter()
        .zip(depths.iter())
        .map(|(lm, &z_norm)| {
            Vector3::new(
                (lm.x - 0.5) * X_SCALE,
                (0.5 - lm.y) * Y_SCALE + Y_OFFSET,
                -z_norm * Z_SCALE + Z_OFFSET,
            )
        })
        .collect();
    Ok(points)
}

/// Normalized image coordinates of a head-local point (inverse of the projection)
pub fn to_normalized(point: &Vertex) -> (f32, f32) {
    (
        point[0] / X_SCALE + 0.5,
        0.5 - (point[1] - Y_OFFSET) / Y_SCALE,
    )
}

/// Pixel coordinates of a head-local point in a width x height image
pub fn to_pixel(point: &Vertex, width: usize, height: usize) -> (f32, f32) {
    let (nx, ny) = to_normalized(point);
    (nx * width as f32, ny * height as f32)
}
