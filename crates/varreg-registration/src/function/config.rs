//! Configuration for the SSD force law.

use serde::{Deserialize, Serialize};
use crate::error::{RegistrationError, Result};

/// Which image gradient drives the force at a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientType {
    /// Gradient of the warped moving image, `∇M(x + u(x))`.
    #[default]
    WarpedMoving,
    /// Gradient of the fixed image, `∇F(x)`.
    Fixed,
    /// Component-wise mean of the fixed and warped moving gradients.
    Symmetric,
}

/// Settings of [`SsdForceFunction`](super::SsdForceFunction).
///
/// Changes take effect between iterations only; the per-voxel kernel reads
/// a frozen copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsdForceConfig {
    /// Gradient selection.
    pub gradient_type: GradientType,
    /// Absolute intensity difference below which a voxel counts as matched
    /// and receives the zero update.
    pub intensity_difference_threshold: f64,
    /// Step size applied to every update.
    pub time_step: f64,
    /// Mask values at or below this are outside the mask.
    pub mask_background_threshold: f64,
}

impl Default for SsdForceConfig {
    fn default() -> Self {
        Self {
            gradient_type: GradientType::WarpedMoving,
            intensity_difference_threshold: 0.001,
            time_step: 1.0,
            mask_background_threshold: 0.0,
        }
    }
}

impl SsdForceConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gradient selection.
    pub fn with_gradient_type(mut self, gradient_type: GradientType) -> Self {
        self.gradient_type = gradient_type;
        self
    }

    /// Set the intensity-match threshold.
    pub fn with_intensity_difference_threshold(mut self, threshold: f64) -> Self {
        self.intensity_difference_threshold = threshold;
        self
    }

    /// Set the time step.
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the mask background threshold.
    pub fn with_mask_background_threshold(mut self, threshold: f64) -> Self {
        self.mask_background_threshold = threshold;
        self
    }

    /// Check the numeric settings.
    pub fn validate(&self) -> Result<()> {
        if !self.intensity_difference_threshold.is_finite() || self.intensity_difference_threshold < 0.0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "intensity difference threshold must be finite and non-negative, got {}",
                self.intensity_difference_threshold
            )));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "time step must be finite and positive, got {}",
                self.time_step
            )));
        }
        if self.mask_background_threshold.is_nan() {
            return Err(RegistrationError::invalid_configuration(
                "mask background threshold is NaN",
            ));
        }
        Ok(())
    }
}
