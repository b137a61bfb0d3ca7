//! Direction type for representing image orientation.

use nalgebra::SMatrix;
use super::Vector;

/// Direction matrix representing image orientation.
///
/// Column i is the direction of the i-th image axis in physical space.
/// Index-space vectors (after division by spacing) are mapped into physical
/// space by left-multiplication with this matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// True for the identity matrix, where the physical mapping can be skipped.
    pub fn is_identity(&self) -> bool {
        self.0 == SMatrix::<f64, D, D>::identity()
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

impl<const D: usize> Default for Direction<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Direction3 = Direction<3>;
    type Vector3 = Vector<3>;

    #[test]
    fn test_direction_identity() {
        let d = Direction3::identity();
        assert!(d.is_identity());
        assert_eq!(d * Vector3::new([1.0, 2.0, 3.0]), Vector3::new([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_direction_rotation() {
        // 90 degrees around Z
        let rot = Direction(SMatrix::<f64, 3, 3>::new(
            0.0, -1.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
        ));
        assert!(!rot.is_identity());
        assert_eq!(rot * Vector3::unit(0), Vector3::unit(1));
    }
}
