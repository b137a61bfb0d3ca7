//! Vector type for displacements, gradients and force updates.
//!
//! Every per-voxel quantity with a direction (an image gradient, a
//! displacement, the update produced by a force law) is a `Vector<D>`.

use nalgebra::SVector;

/// A vector in D-dimensional space.
///
/// Thin wrapper around nalgebra's `SVector<f64, D>`. Components are stored in
/// axis order (x first), matching the axis order of [`crate::Spacing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const D: usize>(pub SVector<f64, D>);

impl<const D: usize> Vector<D> {
    /// Create a new vector from components.
    pub fn new(components: [f64; D]) -> Self {
        Self(SVector::from(components))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(SVector::zeros())
    }

    /// Unit vector along `axis`.
    pub fn unit(axis: usize) -> Self {
        let mut v = Self::zeros();
        v.0[axis] = 1.0;
        v
    }

    /// True when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Component-wise mean of two vectors.
    pub fn midpoint(&self, other: &Self) -> Self {
        Self((self.0 + other.0) * 0.5)
    }

    /// Components as an array.
    pub fn to_array(&self) -> [f64; D] {
        self.0.into()
    }

    /// Get the inner nalgebra vector.
    pub fn inner(&self) -> &SVector<f64, D> {
        &self.0
    }
}

impl<const D: usize> Default for Vector<D> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const D: usize> std::ops::Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Add for Vector<D> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl<const D: usize> std::ops::AddAssign for Vector<D> {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl<const D: usize> std::ops::Sub for Vector<D> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

impl<const D: usize> std::ops::Mul<f64> for Vector<D> {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

impl<const D: usize> std::ops::Div<f64> for Vector<D> {
    type Output = Self;

    fn div(self, scalar: f64) -> Self::Output {
        Self(self.0 / scalar)
    }
}

impl<const D: usize> std::ops::Neg for Vector<D> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
