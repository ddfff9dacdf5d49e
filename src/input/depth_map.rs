use std::path::{Path, PathBuf};

use crate::error::{AvatarError, Result};

#[derive(Clone, Debug)]
/// Single channel depth image, row major, values in [0, 1]
pub struct DepthMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthMap {
    /// Depth map constructor
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<DepthMap> {
        if width == 0 || height == 0 {
            return Err(AvatarError::DepthUnavailable(format!(
                "empty depth map ({}x{})",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(AvatarError::DepthUnavailable(format!(
                "{} depth values for a {}x{} map",
                data.len(),
                width,
                height
            )));
        }
        Ok(DepthMap {
            width,
            height,
            data,
        })
    }

    /// Gets map width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets map height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Depth at a pixel position, clamped to the map bounds
    pub fn sample(&self, px: f32, py: f32) -> f32 {
        let col = px.floor().clamp(0.0, (self.width - 1) as f32) as usize;
        let row = py.floor().clamp(0.0, (self.height - 1) as f32) as usize;
        self.data[row * self.width + col]
    }

    /// Rescales values to [0, 1]
    ///
    /// A flat map carries no depth information and is rejected
    pub fn normalized(mut self) -> Result<DepthMap> {
        let (dmin, dmax) = self
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
                (lo.min(d), hi.max(d))
            });
        if !(dmax - dmin > 1e-6) {
            return Err(AvatarError::DepthUnavailable(
                "flat depth map".to_string(),
            ));
        }
        for val in self.data.iter_mut() {
            *val = (*val - dmin) / (dmax - dmin);
        }
        Ok(self)
    }
}

/// Provider of a depth map for the current request
///
/// Failures are never fatal: the pipeline logs them and skips depth refinement.
pub trait DepthSource {
    fn depth_map(&self) -> Result<DepthMap>;
}

impl DepthSource for DepthMap {
    fn depth_map(&self) -> Result<DepthMap> {
        Ok(self.clone())
    }
}

/// Depth map read from a grayscale image file
pub struct ImageDepthSource {
    path: PathBuf,
}

impl ImageDepthSource {
    /// Image depth source constructor
    pub fn new<P: AsRef<Path>>(path: P) -> ImageDepthSource {
        ImageDepthSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DepthSource for ImageDepthSource {
    fn depth_map(&self) -> Result<DepthMap> {
        let img = image::open(&self.path).map_err(|err| {
            AvatarError::DepthUnavailable(format!("{}: {}", self.path.display(), err))
        })?;
        let luma = img.to_luma32f();
        let (width, height) = luma.dimensions();
        DepthMap::new(width as usize, height as usize, luma.into_raw())?.normalized()
    }
}
