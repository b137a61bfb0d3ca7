//! Spacing type for representing physical distances between voxels.

use super::Vector;

/// Spacing between adjacent voxels along each axis.
///
/// This is a type alias to Vector for semantic clarity.
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Create uniform spacing (same value for all dimensions).
    pub fn uniform(value: f64) -> Self {
        Self::new([value; D])
    }

    /// True when every component is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| self[i].is_finite() && self[i] > 0.0)
    }

    /// Mean of the squared spacing components.
    ///
    /// This is the squared spacing of an isotropic grid with the same
    /// average voxel extent, used to normalize force updates and time steps
    /// on anisotropic images.
    pub fn mean_squared(&self) -> f64 {
        if D == 0 {
            return 0.0;
        }
        (0..D).map(|i| self[i] * self[i]).sum::<f64>() / D as f64
    }
}
