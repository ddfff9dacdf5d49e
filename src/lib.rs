/// Avatar pipeline algorithms
pub mod algorithm;
/// Binary asset codec
pub mod asset;
/// Pipeline parameters
pub mod config;
/// Error types
pub mod error;
/// Geometric operations
pub mod geometry;
/// Landmarks and depth inputs
pub mod input;
/// Mesh object and operations
pub mod mesh3d;
/// Skeleton object and operations
pub mod skeleton3d;

pub use algorithm::avatar_alg::{build_avatar, AvatarInput, AvatarOutput, AvatarSummary};
pub use config::AvatarConfig;
pub use error::{AvatarError, Result};
