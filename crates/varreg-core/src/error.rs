//! Error types for image construction and host-side sampling.

use thiserror::Error;

/// Errors raised while building images or reading their voxel data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Number of voxel values does not match the grid size.
    #[error("Voxel count mismatch: size {size:?} needs {expected} values, got {actual}")]
    VoxelCountMismatch {
        size: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Two grids that must coincide have different sizes.
    #[error("Size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Wrong number of displacement components.
    #[error("Component mismatch: expected {expected} components, got {actual}")]
    ComponentMismatch { expected: usize, actual: usize },

    /// Tensor data could not be read back to the host.
    #[error("Tensor read-back failed: {0}")]
    ReadBack(String),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImageError::VoxelCountMismatch {
            size: vec![2, 3],
            expected: 6,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "Voxel count mismatch: size [2, 3] needs 6 values, got 5"
        );
    }
}
