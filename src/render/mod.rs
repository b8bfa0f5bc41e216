pub mod context;
pub mod geometry;
pub mod shaders;

#[cfg(feature = "gpu")]
pub mod gpu;
