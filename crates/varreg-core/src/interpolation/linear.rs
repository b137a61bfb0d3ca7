//! Linear interpolation on host buffers.
//!
//! Bilinear in 2D, trilinear in 3D; the weights are built generically over
//! the `2^D` corners of the enclosing cell.

use crate::image::ImageBuffer;
use crate::spatial::Point;
use super::trait_::Interpolator;

/// Linear Interpolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<const D: usize> Interpolator<D> for LinearInterpolator {
    fn evaluate(&self, image: &ImageBuffer<D>, index: &Point<D>) -> f64 {
        let size = image.size();
        let mut base = [0usize; D];
        let mut weight = [0.0f64; D];

        for axis in 0..D {
            let last = size[axis].saturating_sub(1) as f64;
            let c = index[axis].clamp(0.0, last);
            let floor = c.floor();
            base[axis] = floor as usize;
            weight[axis] = c - floor;
        }

        let mut value = 0.0;
        let mut corner = [0usize; D];
        for mask in 0..(1usize << D) {
            let mut w = 1.0;
            for axis in 0..D {
                let upper = (mask >> axis) & 1 == 1;
                if upper {
                    w *= weight[axis];
                    corner[axis] = (base[axis] + 1).min(size[axis] - 1);
                } else {
                    w *= 1.0 - weight[axis];
                    corner[axis] = base[axis];
                }
            }
            if w != 0.0 {
                value += w * image.value(&corner) as f64;
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction, Spacing};

    fn plane_3d() -> ImageBuffer<3> {
        // value = x + 2y + 3z on a 4 x 4 x 4 grid
        let n = 4;
        let mut values = Vec::with_capacity(n * n * n);
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    values.push((x + 2 * y + 3 * z) as f32);
                }
            }
        }
        ImageBuffer::new(values, [n, n, n], Spacing::uniform(1.0), Direction::identity()).unwrap()
    }

    #[test]
    fn test_linear_on_grid() {
        let image = plane_3d();
        let value = LinearInterpolator::new().evaluate(&image, &Point::new([1.0, 2.0, 3.0]));
        assert!((value - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_reproduces_plane() {
        let image = plane_3d();
        let p = Point::new([1.25, 0.5, 2.75]);
        let value = LinearInterpolator::new().evaluate(&image, &p);
        let expected = 1.25 + 2.0 * 0.5 + 3.0 * 2.75;
        assert!((value - expected).abs() < 1e-6, "got {}", value);
    }

    #[test]
    fn test_linear_clamps_outside() {
        let image = plane_3d();
        let value = LinearInterpolator::new().evaluate(&image, &Point::new([-1.0, 0.0, 10.0]));
        // clamps to (0, 0, 3)
        assert!((value - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_2d() {
        let values = vec![0.0, 1.0, 10.0, 11.0];
        let image = ImageBuffer::new(values, [2, 2], Spacing::uniform(1.0), Direction::identity()).unwrap();
        let value = LinearInterpolator::new().evaluate(&image, &Point::new([0.5, 0.5]));
        assert!((value - 5.5).abs() < 1e-9);
    }
}
