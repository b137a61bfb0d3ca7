//! Image types and voxel access.
//!
//! [`Image`] is the device-side scalar image with physical metadata;
//! [`ImageBuffer`] is its read-only host copy used by per-voxel kernels.

pub mod image;
pub mod buffer;
pub mod region;

pub use image::Image;
pub use buffer::ImageBuffer;
pub use region::{ImageRegion, Neighborhood, RegionIndices};
