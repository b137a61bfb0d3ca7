//! Image type with physical metadata.
//!
//! This module provides the Image struct which represents scalar images
//! with tensor data and physical space metadata (origin, spacing, direction).

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use crate::error::{ImageError, Result};
use crate::image::ImageBuffer;
use crate::spatial::{Direction, Point, Spacing};

/// Scalar image with physical metadata.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image (2 or 3)
///
/// # Axis order
/// The tensor is shaped `[Z, Y, X]` (`[Y, X]` in 2D) while spatial
/// quantities (spacing, indices, gradients) use axis order `x, y, z`.
/// Spatial axis `i` therefore maps to tensor dimension `D - 1 - i`.
///
/// # Examples
/// ```rust
/// use varreg_core::Image;
/// use varreg_core::spatial::Spacing3;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let image = Image::<Backend, 3>::from_values(
///     vec![0.0; 4 * 3 * 2],
///     [4, 3, 2],
///     Spacing3::new([1.0, 1.0, 2.0]),
///     &device,
/// ).unwrap();
/// assert_eq!(image.size(), [4, 3, 2]);
/// assert_eq!(image.shape(), [2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The pixel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Physical coordinate of the first voxel.
    origin: Point<D>,
    /// Physical distance between voxels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes.
    direction: Direction<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            data,
            origin,
            spacing,
            direction,
        }
    }

    /// Create an image at the origin with identity direction from voxel
    /// values in x-fastest order.
    ///
    /// # Arguments
    /// * `values` - Voxel intensities, x varying fastest
    /// * `size` - Number of voxels along each axis (x first)
    /// * `spacing` - Physical distance between voxels along each axis
    /// * `device` - Device to place the tensor on
    pub fn from_values(
        values: Vec<f32>,
        size: [usize; D],
        spacing: Spacing<D>,
        device: &B::Device,
    ) -> Result<Self> {
        let expected: usize = size.iter().product();
        if values.len() != expected {
            return Err(ImageError::VoxelCountMismatch {
                size: size.to_vec(),
                expected,
                actual: values.len(),
            });
        }

        let mut shape = size;
        shape.reverse();
        let data = Tensor::<B, D>::from_data(TensorData::new(values, shape), device);
        Ok(Self::new(data, Point::origin(), spacing, Direction::identity()))
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the origin (physical coordinate of first voxel).
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing (physical distance between voxels).
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Tensor shape (`[Z, Y, X]` order).
    pub fn shape(&self) -> [usize; D] {
        let dims = self.data.shape().dims;
        let mut shape = [0usize; D];
        shape.copy_from_slice(&dims[..D]);
        shape
    }

    /// Number of voxels along each spatial axis (x first).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    /// Read the voxel data back into a host buffer.
    ///
    /// This synchronizes with the device; call it once per iteration,
    /// never per voxel.
    pub fn to_buffer(&self) -> Result<ImageBuffer<D>> {
        let values = self
            .data
            .clone()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ImageError::ReadBack(format!("{:?}", e)))?;
        ImageBuffer::new(values, self.size(), self.spacing, self.direction)
    }
}
