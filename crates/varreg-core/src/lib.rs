//! Image, geometry and sampling primitives for variational registration.
//!
//! Device-side images ([`Image`], [`DisplacementField`]) are built on burn
//! tensors. Per-voxel kernels read them through host copies
//! ([`image::ImageBuffer`]) and sample gradients with
//! [`interpolation::CentralDifferenceGradient`].

pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;

pub use error::ImageError;
pub use image::{Image, ImageBuffer, ImageRegion, Neighborhood};
pub use spatial::{Point, Vector, Spacing, Direction};
pub use transform::DisplacementField;
