use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Detector landmark: x, y normalized to [0, 1] in image space, z relative depth
/// (smaller is closer to the camera)
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    /// Landmark constructor
    pub fn new(x: f32, y: f32, z: f32) -> Landmark {
        Landmark { x, y, z }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Named anatomical region of the face landmark layout
pub enum FaceRegion {
    Jaw,
    LeftEye,
    RightEye,
    Nose,
    Mouth,
    LeftBrow,
    RightBrow,
    Forehead,
    Chin,
    LeftCheek,
    RightCheek,
    FaceOval,
}

impl FaceRegion {
    /// Fixed landmark indices of the region (468/478 point face layout)
    pub fn indices(&self) -> &'static [usize] {
        match self {
            FaceRegion::Jaw => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
            FaceRegion::LeftEye => &[33, 160, 158, 133, 153, 144],
            FaceRegion::RightEye => &[362, 385, 387, 263, 373, 380],
            FaceRegion::Nose => &[1, 2, 98, 327, 168],
            FaceRegion::Mouth => &[61, 291, 0, 17, 78, 308],
            FaceRegion::LeftBrow => &[70, 63, 105, 66, 107],
            FaceRegion::RightBrow => &[300, 293, 334, 296, 336],
            FaceRegion::Forehead => &[10, 338, 297, 332, 284, 251, 389, 356, 454],
            FaceRegion::Chin => &[152, 148, 176, 149, 150, 136, 172, 58, 132],
            FaceRegion::LeftCheek => &[50, 101, 36, 205, 187, 123, 116, 117],
            FaceRegion::RightCheek => &[280, 330, 266, 425, 411, 352, 345, 346],
            FaceRegion::FaceOval => &[
                10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378,
                400, 377, 152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54,
                103, 67, 109,
            ],
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Immutable, index addressable landmark sequence
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    /// Landmark set constructor
    pub fn new(landmarks: Vec<Landmark>) -> LandmarkSet {
        LandmarkSet { landmarks }
    }

    /// Gets number of landmarks
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Checks if the set is empty
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Landmark getter
    pub fn get(&self, ind_landmark: usize) -> Option<&Landmark> {
        self.landmarks.get(ind_landmark)
    }

    /// All landmarks, in detector order
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Indices of a region present in this set
    pub fn region_indices(&self, region: FaceRegion) -> Vec<usize> {
        region
            .indices()
            .iter()
            .copied()
            .filter(|&ind| ind < self.landmarks.len())
            .collect()
    }

    /// Landmarks of a region present in this set
    pub fn region(&self, region: FaceRegion) -> Vec<Landmark> {
        self.region_indices(region)
            .into_iter()
            .map(|ind| self.landmarks[ind])
            .collect()
    }
}
