/// Depth map refinement of the visible surface
pub mod depth_refinement;
/// Normalized landmarks to head-local frame
pub mod landmark_projection;
/// Mesh cleaning sequence
pub mod mesh_cleaning;
/// Neck cylinder
pub mod neck_extrusion;
/// Seam between surface and shell
pub mod seam_stitching;
/// Back of the head
pub mod shell_synthesis;
/// Visible surface triangulation
pub mod surface_triangulation;

pub use mesh_cleaning::CleaningReport;
pub use surface_triangulation::{SurfaceTriangulation, TriangulationMethod};
