//! Error types for force computation.
//!
//! Configuration errors are raised by iteration setup; precondition
//! violations by per-voxel evaluation. Neither is transient.

use thiserror::Error;
use varreg_core::ImageError;

/// Main error type for registration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// Invalid configuration (spacing, threshold, time step).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A required image or field was not bound before setup.
    #[error("Missing input: {0} is not set")]
    MissingInput(&'static str),

    /// Per-voxel evaluation requested before iteration setup.
    #[error("Force function not initialized: call initialize_iteration first")]
    NotInitialized,

    /// Neighborhood smaller than the gradient stencil.
    #[error("Neighborhood radius {actual} is smaller than the required radius {required}")]
    InsufficientRadius { required: usize, actual: usize },

    /// Neighborhood centre outside the image grid.
    #[error("Index {index:?} is outside the image of size {size:?}")]
    IndexOutOfBounds { index: Vec<usize>, size: Vec<usize> },

    /// Shape mismatch between bound inputs.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Image construction or read-back failure.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a missing input error.
    pub fn missing_input(what: &'static str) -> Self {
        Self::MissingInput(what)
    }

    /// Create a shape mismatch error from two grid sizes.
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Whether the error stems from configuration rather than from a
    /// per-voxel precondition.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::MissingInput(_)
                | Self::ShapeMismatch { .. }
                | Self::Image(_)
        )
    }
}
