/// Input/Output functions
pub mod io;
/// Static bone tables
pub mod presets;
/// Bone hierarchy structure
pub mod skeleton3d;
/// Per vertex bone influences
pub mod skin;
pub use presets::{BoneDef, SkeletonPreset};
pub use skeleton3d::{Bone, Skeleton3D};
pub use skin::{Influence, SkinBinding, MAX_INFLUENCES};
