//! Central-difference image gradients.

use crate::image::ImageBuffer;
use crate::spatial::{Point, Vector};
use super::linear::LinearInterpolator;
use super::trait_::{GradientSampler, Interpolator};

/// Central-difference gradient bound to one image.
///
/// Along axis `i` the derivative is `(I(p + e_i) - I(p - e_i)) / (2 s_i)`,
/// where `s_i` is the spacing. At continuous positions both samples are
/// linearly interpolated. If either sample would leave the grid the
/// derivative along that axis is zero. The index-space result is mapped to
/// physical space with the image direction matrix.
#[derive(Debug, Clone)]
pub struct CentralDifferenceGradient<const D: usize> {
    image: ImageBuffer<D>,
    interpolator: LinearInterpolator,
}

impl<const D: usize> CentralDifferenceGradient<D> {
    /// Bind a sampler to `image`.
    pub fn new(image: ImageBuffer<D>) -> Self {
        Self {
            image,
            interpolator: LinearInterpolator::new(),
        }
    }

    fn to_physical(&self, mut derivative: Vector<D>) -> Vector<D> {
        let spacing = self.image.spacing();
        for axis in 0..D {
            derivative[axis] /= 2.0 * spacing[axis];
        }
        let direction = self.image.direction();
        if direction.is_identity() {
            derivative
        } else {
            *direction * derivative
        }
    }
}

impl<const D: usize> GradientSampler<D> for CentralDifferenceGradient<D> {
    fn image(&self) -> &ImageBuffer<D> {
        &self.image
    }

    fn gradient_at_index(&self, index: &[usize; D]) -> Vector<D> {
        let size = self.image.size();
        let mut derivative = Vector::zeros();
        for axis in 0..D {
            if index[axis] == 0 || index[axis] + 1 >= size[axis] {
                continue;
            }
            let mut forward = *index;
            let mut backward = *index;
            forward[axis] += 1;
            backward[axis] -= 1;
            derivative[axis] = self.image.value(&forward) as f64 - self.image.value(&backward) as f64;
        }
        self.to_physical(derivative)
    }

    fn gradient(&self, index: &Point<D>) -> Vector<D> {
        let mut derivative = Vector::zeros();
        for axis in 0..D {
            let step = Vector::unit(axis);
            let forward = *index + step;
            let backward = *index - step;
            if !self.image.contains_continuous(&forward) || !self.image.contains_continuous(&backward) {
                continue;
            }
            derivative[axis] = self.interpolator.evaluate(&self.image, &forward)
                - self.interpolator.evaluate(&self.image, &backward);
        }
        self.to_physical(derivative)
    }

    fn required_radius(&self) -> usize {
        1
    }
}
