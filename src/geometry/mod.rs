/// Geometric primitives shared by the pipeline stages
pub mod geometry_operations;
