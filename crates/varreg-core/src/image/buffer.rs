//! Host-resident voxel buffer.
//!
//! Per-voxel kernels read single intensities millions of times per
//! iteration; doing that through device tensors would cost a dispatch per
//! read. [`ImageBuffer`] is the read-only host copy those kernels sample from.
//! It is plain data and therefore `Send + Sync`.

use crate::error::{ImageError, Result};
use crate::spatial::{Direction, Point, Spacing};

/// Read-only scalar image stored on the host.
///
/// Values are laid out with axis 0 (x) varying fastest, which is the
/// row-major order of a tensor shaped `[.., Y, X]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer<const D: usize> {
    values: Vec<f32>,
    size: [usize; D],
    strides: [usize; D],
    spacing: Spacing<D>,
    direction: Direction<D>,
}

impl<const D: usize> ImageBuffer<D> {
    /// Create a buffer from voxel values in x-fastest order.
    ///
    /// # Arguments
    /// * `values` - Voxel intensities, `size.iter().product()` of them
    /// * `size` - Number of voxels along each axis (x first)
    /// * `spacing` - Physical distance between voxels along each axis
    /// * `direction` - Orientation of the image axes
    pub fn new(
        values: Vec<f32>,
        size: [usize; D],
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Result<Self> {
        let expected: usize = size.iter().product();
        if values.len() != expected {
            return Err(ImageError::VoxelCountMismatch {
                size: size.to_vec(),
                expected,
                actual: values.len(),
            });
        }

        let mut strides = [0usize; D];
        let mut stride = 1;
        for axis in 0..D {
            strides[axis] = stride;
            stride *= size[axis];
        }

        Ok(Self {
            values,
            size,
            strides,
            spacing,
            direction,
        })
    }

    /// Number of voxels along each axis (x first).
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw voxel values in x-fastest order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// True when `index` lies on the grid.
    pub fn contains(&self, index: &[usize; D]) -> bool {
        (0..D).all(|axis| index[axis] < self.size[axis])
    }

    /// True when the continuous index lies inside the hull of the grid
    /// (between the first and last voxel centres on every axis).
    pub fn contains_continuous(&self, point: &Point<D>) -> bool {
        (0..D).all(|axis| {
            let c = point[axis];
            c >= 0.0 && c <= (self.size[axis] as f64 - 1.0)
        })
    }

    /// Linear offset of a grid index. The index must lie on the grid.
    #[inline]
    pub fn offset(&self, index: &[usize; D]) -> usize {
        (0..D).map(|axis| index[axis] * self.strides[axis]).sum()
    }

    /// Intensity at a grid index. The index must lie on the grid.
    #[inline]
    pub fn value(&self, index: &[usize; D]) -> f32 {
        self.values[self.offset(index)]
    }

    /// Whether `other` is defined on the same grid (size only).
    pub fn same_size(&self, other: &Self) -> bool {
        self.size == other.size
    }
}
