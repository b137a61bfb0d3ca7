//! Interpolation and gradient sampling on host image buffers.

pub mod trait_;
pub mod linear;
pub mod gradient;

pub use trait_::{GradientSampler, Interpolator};
pub use linear::LinearInterpolator;
pub use gradient::CentralDifferenceGradient;
