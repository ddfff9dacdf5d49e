/// Arena mesh grown by the pipeline stages
pub mod generic_mesh3d;
/// Input/Ouput functions
pub mod io;
/// Mesh cleaning operations
pub mod mesh_operations;
pub use generic_mesh3d::{Color, Face, GenericMesh3D, MeshPatch, MeshRegion, Vertex};
