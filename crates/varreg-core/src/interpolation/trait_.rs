//! Sampling traits for continuous positions.
//!
//! Both traits work on host [`ImageBuffer`]s and take `&self`, so a bound
//! sampler can be shared read-only across worker threads.

use crate::image::ImageBuffer;
use crate::spatial::{Point, Vector};

/// Interpolator trait for sampling intensities at continuous indices.
pub trait Interpolator<const D: usize>: Send + Sync {
    /// Interpolate the intensity of `image` at a continuous index.
    ///
    /// Positions outside the grid are clamped to the nearest border voxel.
    fn evaluate(&self, image: &ImageBuffer<D>, index: &Point<D>) -> f64;
}

/// Spatial gradient of an image bound to the sampler.
pub trait GradientSampler<const D: usize>: Send + Sync {
    /// The image this sampler differentiates.
    fn image(&self) -> &ImageBuffer<D>;

    /// Gradient at a grid index, in physical units.
    fn gradient_at_index(&self, index: &[usize; D]) -> Vector<D>;

    /// Gradient at a continuous index, in physical units.
    fn gradient(&self, index: &Point<D>) -> Vector<D>;

    /// Number of voxels the stencil reaches from its centre along each axis.
    fn required_radius(&self) -> usize;
}
