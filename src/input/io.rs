use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AvatarError, Result};
use crate::input::{FaceRegion, Landmark, LandmarkSet};
use crate::mesh3d::Color;

/// Loads landmarks from a json array of `{x, y, z}` objects or `[x, y, z]` triples
pub fn load_landmarks<P: AsRef<Path>>(filename: P) -> Result<LandmarkSet> {
    let file = File::open(filename)?;
    let landmarks: Vec<Landmark> = serde_json::from_reader(BufReader::new(file))?;
    Ok(LandmarkSet::new(landmarks))
}

/// Loads a landmark adjacency list from a json array of index pairs
pub fn load_adjacency<P: AsRef<Path>>(filename: P) -> Result<Vec<[usize; 2]>> {
    let file = File::open(filename)?;
    let edges = serde_json::from_reader(BufReader::new(file))?;
    Ok(edges)
}

/// Samples the color of every landmark in the source photo
pub fn sample_landmark_colors(img: &image::RgbImage, landmarks: &LandmarkSet) -> Result<Vec<Color>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AvatarError::Input("empty photo".to_string()));
    }
    let colors = landmarks
        .landmarks()
        .iter()
        .map(|lm| {
            let col = (lm.x * width as f32).floor().clamp(0.0, (width - 1) as f32) as u32;
            let row = (lm.y * height as f32).floor().clamp(0.0, (height - 1) as f32) as u32;
            let pix = img.get_pixel(col, row);
            [
                pix[0] as f32 / 255.0,
                pix[1] as f32 / 255.0,
                pix[2] as f32 / 255.0,
                1.0,
            ]
        })
        .collect();
    Ok(colors)
}

/// Loads the source photo and samples the landmark colors
pub fn load_landmark_colors<P: AsRef<Path>>(
    filename: P,
    landmarks: &LandmarkSet,
) -> Result<Vec<Color>> {
    let img = image::open(filename)?.to_rgb8();
    sample_landmark_colors(&img, landmarks)
}

/// Mean color of the skin regions (forehead and cheeks)
///
/// Returns None if the set has none of their landmarks.
pub fn skin_tone(colors: &[Color], landmarks: &LandmarkSet) -> Option<Color> {
    let inds: Vec<usize> = [
        FaceRegion::Forehead,
        FaceRegion::LeftCheek,
        FaceRegion::RightCheek,
    ]
    .iter()
    .flat_map(|&region| landmarks.region_indices(region))
    .filter(|&ind| ind < colors.len())
    .collect();
    if inds.is_empty() {
        return None;
    }
    let mut tone = [0.0f32; 4];
    for &ind in inds.iter() {
        for k in 0..4 {
            tone[k] += colors[ind][k];
        }
    }
    for val in tone.iter_mut() {
        *val /= inds.len() as f32;
    }
    Some(tone)
}
