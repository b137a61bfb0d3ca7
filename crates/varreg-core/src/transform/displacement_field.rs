//! Dense displacement field.
//!
//! Each voxel of the fixed image grid carries a displacement vector
//! `u(x)`; the moving image warped by the solver is `M(x + u(x))`.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use crate::error::{ImageError, Result};
use crate::spatial::Spacing;

/// Dense displacement field stored as one scalar tensor per axis.
///
/// Component `i` is the displacement along spatial axis `i` (x first) and
/// is shaped like the image tensor (`[Z, Y, X]` in 3D).
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `D` - Spatial dimensionality, equal to the vector dimensionality
#[derive(Debug, Clone)]
pub struct DisplacementField<B: Backend, const D: usize> {
    components: Vec<Tensor<B, D>>,
    spacing: Spacing<D>,
}

impl<B: Backend, const D: usize> DisplacementField<B, D> {
    /// Create a field from its per-axis components.
    ///
    /// Fails unless there are exactly `D` components of identical shape.
    pub fn from_components(components: Vec<Tensor<B, D>>, spacing: Spacing<D>) -> Result<Self> {
        if components.len() != D {
            return Err(ImageError::ComponentMismatch {
                expected: D,
                actual: components.len(),
            });
        }
        let expected = components[0].shape().dims;
        for component in &components[1..] {
            let actual = component.shape().dims;
            if actual != expected {
                return Err(ImageError::SizeMismatch {
                    expected: expected.to_vec(),
                    actual: actual.to_vec(),
                });
            }
        }
        Ok(Self { components, spacing })
    }

    /// Identity field (all displacements zero) on a grid of `size` voxels.
    ///
    /// # Arguments
    /// * `size` - Number of voxels along each axis (x first)
    /// * `spacing` - Grid spacing
    /// * `device` - Device to create the tensors on
    pub fn zeros(size: [usize; D], spacing: Spacing<D>, device: &B::Device) -> Self {
        let mut shape = size;
        shape.reverse();
        let components = (0..D).map(|_| Tensor::zeros(shape, device)).collect();
        Self { components, spacing }
    }

    /// Displacement component along `axis`.
    pub fn component(&self, axis: usize) -> &Tensor<B, D> {
        &self.components[axis]
    }

    /// Length of each displacement vector.
    pub fn vector_dimension(&self) -> usize {
        self.components.len()
    }

    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Number of voxels along each spatial axis (x first).
    pub fn size(&self) -> [usize; D] {
        let dims = self.components[0].shape().dims;
        let mut size = [0usize; D];
        for axis in 0..D {
            size[axis] = dims[D - 1 - axis];
        }
        size
    }
}
