//! Error types for head-rig-3d.

use thiserror::Error;

/// Result type alias using [`AvatarError`].
pub type Result<T> = std::result::Result<T, AvatarError>;

/// Errors raised by the avatar pipeline stages.
#[derive(Error, Debug)]
pub enum AvatarError {
    /// Not enough landmarks, or a malformed input record.
    #[error("invalid input: {0}")]
    Input(String),

    /// Neither topology nor Delaunay produced a triangle.
    #[error("no triangle could be built from {points} landmarks")]
    GeometryDegenerate {
        /// Number of landmarks given to the triangulator.
        points: usize,
    },

    /// Not enough points to stitch the seam (recoverable).
    #[error("seam unavailable: {boundary} boundary points, {ring} ring points (need {required})")]
    StitchUnavailable {
        /// Boundary points found on the visible surface.
        boundary: usize,
        /// Front ring points found on the shell.
        ring: usize,
        /// Minimum count for both.
        required: usize,
    },

    /// Depth map missing or unusable (recoverable).
    #[error("depth map unavailable: {0}")]
    DepthUnavailable(String),

    /// A buffer view or accessor would fall outside the binary buffer.
    #[error("serialization bounds error: {0}")]
    SerializationBounds(String),

    /// A face references a vertex that does not exist.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// The bone hierarchy breaks the single-root / parent-before-child rule.
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AvatarError {
    /// Tells whether the pipeline may log this error and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AvatarError::StitchUnavailable { .. } | AvatarError::DepthUnavailable(_)
        )
    }
}
