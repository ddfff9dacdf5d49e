/// Depth maps and depth sources
pub mod depth_map;
/// Input files loading
pub mod io;
/// Landmark sets and anatomical regions
pub mod landmark_set;
pub use depth_map::{DepthMap, DepthSource, ImageDepthSource};
pub use landmark_set::{FaceRegion, Landmark, LandmarkSet};
