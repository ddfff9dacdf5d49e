use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::skeleton3d::SkeletonPreset;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
/// Parameters of every pipeline stage
pub struct AvatarConfig {
    pub triangulation: TriangulationConfig,
    pub shell: ShellConfig,
    pub seam: SeamConfig,
    pub depth: DepthConfig,
    pub neck: NeckConfig,
    pub cleaning: CleaningConfig,
    pub skeleton: SkeletonConfig,
    pub skinning: SkinningConfig,
}

impl AvatarConfig {
    /// Loads a configuration from a json file, missing fields take their default value
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<AvatarConfig> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Surface triangulation parameters
pub struct TriangulationConfig {
    /// Triangles whose longest edge exceeds this factor times the median edge are dropped
    pub max_edge_factor: f32,
    /// Topology result is kept only if it yields at least this many triangles per landmark
    pub min_topology_ratio: f32,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        TriangulationConfig {
            max_edge_factor: 3.0,
            min_topology_ratio: 0.25,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Back shell parameters
pub struct ShellConfig {
    pub lat_steps: usize,
    pub lon_steps: usize,
    /// Gap between the surface and the shell rim, as a fraction of the shell depth radius
    pub gap_fraction: f32,
    /// Shell depth radius relative to its horizontal radius
    pub depth_ratio: f32,
    /// Normalized back depth after which flattening starts
    pub flatten_start: f32,
    /// Scale applied to the depth beyond `flatten_start`
    pub flatten_factor: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            lat_steps: 16,
            lon_steps: 16,
            gap_fraction: 0.1,
            depth_ratio: 0.9,
            flatten_start: 0.6,
            flatten_factor: 0.85,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Seam stitching parameters
pub struct SeamConfig {
    /// Shell vertices above this depth quantile form the front ring
    pub ring_quantile: f32,
    /// Fallback boundary: surface points beyond this radial percentile
    pub boundary_percentile: f32,
    /// Minimum number of boundary and ring points
    pub min_points: usize,
}

impl Default for SeamConfig {
    fn default() -> Self {
        SeamConfig {
            ring_quantile: 0.92,
            boundary_percentile: 0.85,
            min_points: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Depth refinement parameters
pub struct DepthConfig {
    pub strength: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        DepthConfig { strength: 0.03 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Neck cylinder parameters
pub struct NeckConfig {
    pub rings: usize,
    pub segments: usize,
    /// Neck length relative to head height
    pub length_ratio: f32,
    /// Top radius relative to head width
    pub radius_ratio: f32,
    /// Bottom radius relative to top radius
    pub taper: f32,
    /// Height band (relative to head height) defining the lowest ring
    pub bottom_band: f32,
}

impl Default for NeckConfig {
    fn default() -> Self {
        NeckConfig {
            rings: 4,
            segments: 32,
            length_ratio: 0.25,
            radius_ratio: 0.28,
            taper: 0.75,
            bottom_band: 0.05,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Mesh cleaning parameters
pub struct CleaningConfig {
    pub area_epsilon: f32,
    pub merge_epsilon: f32,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        CleaningConfig {
            area_epsilon: 1e-12,
            merge_epsilon: 1e-6,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
/// Skeleton estimation parameters
pub struct SkeletonConfig {
    pub preset: SkeletonPreset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
/// Skinning weight parameters
pub struct SkinningConfig {
    /// Lower bound on bone distances before inversion
    pub epsilon: f32,
    /// Bones never used as influences
    pub excluded_bones: Vec<String>,
}

impl Default for SkinningConfig {
    fn default() -> Self {
        SkinningConfig {
            epsilon: 1e-6,
            excluded_bones: Vec::new(),
        }
    }
}
