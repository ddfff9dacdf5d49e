/// Full avatar pipeline
pub mod avatar_alg;
/// Delaunay triangulation algorithm
pub mod delaunay_alg;
/// Skeleton estimation algorithm
pub mod skeleton_alg;
/// Skinning weights algorithm
pub mod skinning_alg;
/// Sub operations used in algorithms
pub mod sub_algorithms;
