//! SSD forces for variational registration.
//!
//! The force at voxel `x` is
//!
//! f(x) = τ κ (F(x) − M(x + u(x))) ∇
//!
//! where τ is the time step, κ the mean squared spacing of the fixed image
//! and ∇ the selected gradient: `∇M(x + u(x))`, `∇F(x)`, or their mean.
//! Voxels whose intensities already match within a threshold get the zero
//! update.

use burn::tensor::backend::Backend;
use varreg_core::image::{Image, ImageBuffer, Neighborhood};
use varreg_core::interpolation::{CentralDifferenceGradient, GradientSampler, Interpolator, LinearInterpolator};
use varreg_core::{DisplacementField, Point, Vector};
use crate::accumulator::SsdAccumulator;
use crate::error::{RegistrationError, Result};
use super::config::{GradientType, SsdForceConfig};
use super::trait_::RegistrationFunction;

/// Frozen per-iteration state of the SSD force law.
///
/// Built by [`SsdForceFunction::initialize_iteration`]. It owns host copies
/// of the bound images, the two gradient samplers and the normalizer, and
/// is `Send + Sync`: workers of a parallel pass share it by reference and
/// each passes its own [`SsdAccumulator`].
#[derive(Debug, Clone)]
pub struct SsdKernel<const D: usize> {
    fixed: CentralDifferenceGradient<D>,
    warped: CentralDifferenceGradient<D>,
    mask: Option<ImageBuffer<D>>,
    interpolator: LinearInterpolator,
    gradient_type: GradientType,
    intensity_difference_threshold: f64,
    mask_background_threshold: f64,
    time_step: f64,
    normalizer: f64,
    zero_update: Vector<D>,
}

impl<const D: usize> SsdKernel<D> {
    /// Mean squared spacing of the fixed image.
    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    pub fn gradient_type(&self) -> GradientType {
        self.gradient_type
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn intensity_difference_threshold(&self) -> f64 {
        self.intensity_difference_threshold
    }

    /// Grid size of the fixed image (x first).
    pub fn size(&self) -> [usize; D] {
        self.fixed.image().size()
    }

    /// Host copy of the fixed image.
    pub fn fixed_image(&self) -> &ImageBuffer<D> {
        self.fixed.image()
    }

    /// Host copy of the warped moving image.
    pub fn warped_image(&self) -> &ImageBuffer<D> {
        self.warped.image()
    }

    /// Neighborhood radius the gradient samplers need.
    pub fn required_radius(&self) -> usize {
        self.fixed.required_radius().max(self.warped.required_radius())
    }

    /// `time_step · normalizer`.
    pub fn global_time_step(&self) -> f64 {
        self.time_step * self.normalizer
    }

    /// SSD update for the voxel at the centre of `neighborhood`.
    ///
    /// Every evaluated voxel is recorded in `accumulator`, including matched
    /// voxels that return the zero update. Voxels outside the mask are not
    /// evaluated and leave `accumulator` untouched.
    pub fn compute_update(
        &self,
        neighborhood: &Neighborhood<D>,
        accumulator: &mut SsdAccumulator,
        offset: &Vector<D>,
    ) -> Result<Vector<D>> {
        let required = self.required_radius();
        let actual = neighborhood.min_radius();
        if actual < required {
            return Err(RegistrationError::InsufficientRadius { required, actual });
        }

        let index = neighborhood.center();
        let fixed_image = self.fixed.image();
        if !fixed_image.contains(index) {
            return Err(RegistrationError::IndexOutOfBounds {
                index: index.to_vec(),
                size: fixed_image.size().to_vec(),
            });
        }

        if let Some(mask) = &self.mask {
            if mask.value(index) as f64 <= self.mask_background_threshold {
                return Ok(self.zero_update);
            }
        }

        let position = if offset.is_zero() {
            None
        } else {
            Some(Point::from_index(*index) + *offset)
        };

        let fixed_value = fixed_image.value(index) as f64;
        let warped_value = match &position {
            Some(p) => self.interpolator.evaluate(self.warped.image(), p),
            None => self.warped.image().value(index) as f64,
        };

        let difference = fixed_value - warped_value;
        accumulator.add_sample(difference);

        if difference.abs() < self.intensity_difference_threshold {
            return Ok(self.zero_update);
        }

        let gradient = match self.gradient_type {
            GradientType::Fixed => self.fixed.gradient_at_index(index),
            GradientType::WarpedMoving => self.warped_gradient(index, position.as_ref()),
            GradientType::Symmetric => self
                .fixed
                .gradient_at_index(index)
                .midpoint(&self.warped_gradient(index, position.as_ref())),
        };

        Ok(gradient * (self.time_step * self.normalizer * difference))
    }

    #[inline]
    fn warped_gradient(&self, index: &[usize; D], position: Option<&Point<D>>) -> Vector<D> {
        match position {
            Some(p) => self.warped.gradient(p),
            None => self.warped.gradient_at_index(index),
        }
    }
}

/// SSD force function.
///
/// Holds the configuration and borrowed bindings to the fixed image, the
/// warped moving image, the displacement field and an optional fixed-image
/// mask. Rebinding any input discards the kernel of the previous
/// iteration, so evaluation requires a fresh `initialize_iteration`.
///
/// # Example
///
/// ```rust
/// use burn_ndarray::NdArray;
/// use varreg_core::{DisplacementField, Image, Neighborhood, Spacing, Vector};
/// use varreg_registration::function::{RegistrationFunction, SsdForceConfig, SsdForceFunction};
/// use varreg_registration::SsdAccumulator;
///
/// type B = NdArray<f32>;
/// let device = Default::default();
///
/// let fixed = Image::<B, 2>::from_values((0..25).map(|v| v as f32).collect(), [5, 5], Spacing::uniform(1.0), &device)?;
/// let warped = Image::<B, 2>::from_values(vec![0.0; 25], [5, 5], Spacing::uniform(1.0), &device)?;
/// let field = DisplacementField::<B, 2>::zeros([5, 5], Spacing::uniform(1.0), &device);
///
/// let mut function = SsdForceFunction::new(SsdForceConfig::default());
/// function.set_fixed_image(&fixed);
/// function.set_warped_image(&warped);
/// function.set_displacement_field(&field);
/// function.initialize_iteration()?;
///
/// let mut accumulator = SsdAccumulator::new();
/// let update = function.compute_update(&Neighborhood::with_radius([2, 2], 1), &mut accumulator, &Vector::zeros())?;
/// assert_eq!(accumulator.number_of_voxels(), 1);
/// assert_eq!(update, Vector::zeros()); // warped image is flat
/// # Ok::<(), varreg_registration::RegistrationError>(())
/// ```
#[derive(Debug)]
pub struct SsdForceFunction<'a, B: Backend, const D: usize> {
    config: SsdForceConfig,
    fixed_image: Option<&'a Image<B, D>>,
    warped_image: Option<&'a Image<B, D>>,
    displacement_field: Option<&'a DisplacementField<B, D>>,
    mask: Option<&'a Image<B, D>>,
    kernel: Option<SsdKernel<D>>,
}

impl<'a, B: Backend, const D: usize> SsdForceFunction<'a, B, D> {
    /// Create a force function with no inputs bound.
    pub fn new(config: SsdForceConfig) -> Self {
        Self {
            config,
            fixed_image: None,
            warped_image: None,
            displacement_field: None,
            mask: None,
            kernel: None,
        }
    }

    pub fn config(&self) -> &SsdForceConfig {
        &self.config
    }

    pub fn set_fixed_image(&mut self, image: &'a Image<B, D>) {
        self.fixed_image = Some(image);
        self.kernel = None;
    }

    /// Bind the moving image already warped through the current field.
    pub fn set_warped_image(&mut self, image: &'a Image<B, D>) {
        self.warped_image = Some(image);
        self.kernel = None;
    }

    pub fn set_displacement_field(&mut self, field: &'a DisplacementField<B, D>) {
        self.displacement_field = Some(field);
        self.kernel = None;
    }

    /// Restrict evaluation to voxels whose mask value exceeds the mask
    /// background threshold.
    pub fn set_mask(&mut self, mask: &'a Image<B, D>) {
        self.mask = Some(mask);
        self.kernel = None;
    }

    pub fn clear_mask(&mut self) {
        self.mask = None;
        self.kernel = None;
    }

    pub fn gradient_type(&self) -> GradientType {
        self.config.gradient_type
    }

    /// Switch the gradient selection. Both samplers stay bound, so an
    /// initialized kernel is updated in place.
    pub fn set_gradient_type(&mut self, gradient_type: GradientType) {
        self.config.gradient_type = gradient_type;
        if let Some(kernel) = &mut self.kernel {
            kernel.gradient_type = gradient_type;
        }
    }

    pub fn intensity_difference_threshold(&self) -> f64 {
        self.config.intensity_difference_threshold
    }

    /// Change the matched-voxel threshold. An invalid value is rejected
    /// and leaves both the configuration and the kernel untouched.
    pub fn set_intensity_difference_threshold(&mut self, threshold: f64) -> Result<()> {
        self.config.with_intensity_difference_threshold(threshold).validate()?;
        self.config.intensity_difference_threshold = threshold;
        if let Some(kernel) = &mut self.kernel {
            kernel.intensity_difference_threshold = threshold;
        }
        Ok(())
    }

    /// Normalizer of the current iteration, if initialized.
    pub fn normalizer(&self) -> Option<f64> {
        self.kernel.as_ref().map(SsdKernel::normalizer)
    }

    /// Frozen state of the current iteration.
    pub fn kernel(&self) -> Result<&SsdKernel<D>> {
        self.kernel.as_ref().ok_or(RegistrationError::NotInitialized)
    }

    fn check_size(expected: [usize; D], actual: [usize; D]) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(RegistrationError::shape_mismatch(&expected, &actual))
        }
    }
}

impl<'a, B: Backend, const D: usize> RegistrationFunction<D> for SsdForceFunction<'a, B, D> {
    type GlobalData = SsdAccumulator;

    fn initialize_iteration(&mut self) -> Result<()> {
        self.config.validate()?;

        let fixed = self
            .fixed_image
            .ok_or(RegistrationError::missing_input("fixed image"))?;
        let warped = self
            .warped_image
            .ok_or(RegistrationError::missing_input("warped moving image"))?;
        let field = self
            .displacement_field
            .ok_or(RegistrationError::missing_input("displacement field"))?;

        let size = fixed.size();
        if size.iter().any(|&n| n == 0) {
            return Err(RegistrationError::invalid_configuration(format!(
                "fixed image is empty (size {:?})",
                size
            )));
        }
        Self::check_size(size, warped.size())?;
        Self::check_size(size, field.size())?;

        let spacing = fixed.spacing();
        if !spacing.is_valid() {
            return Err(RegistrationError::invalid_configuration(format!(
                "fixed image spacing must be positive on every axis, got {:?}",
                spacing.to_array()
            )));
        }
        let normalizer = spacing.mean_squared();

        let mask = match self.mask {
            Some(mask) => {
                Self::check_size(size, mask.size())?;
                Some(mask.to_buffer()?)
            }
            None => None,
        };

        let kernel = SsdKernel {
            fixed: CentralDifferenceGradient::new(fixed.to_buffer()?),
            warped: CentralDifferenceGradient::new(warped.to_buffer()?),
            mask,
            interpolator: LinearInterpolator::new(),
            gradient_type: self.config.gradient_type,
            intensity_difference_threshold: self.config.intensity_difference_threshold,
            mask_background_threshold: self.config.mask_background_threshold,
            time_step: self.config.time_step,
            normalizer,
            zero_update: Vector::zeros(),
        };

        tracing::debug!(
            normalizer,
            gradient_type = ?kernel.gradient_type,
            size = ?size,
            masked = kernel.mask.is_some(),
            "Initialized SSD force iteration"
        );

        self.kernel = Some(kernel);
        Ok(())
    }

    fn compute_update(
        &self,
        neighborhood: &Neighborhood<D>,
        global_data: &mut SsdAccumulator,
        offset: &Vector<D>,
    ) -> Result<Vector<D>> {
        self.kernel()?.compute_update(neighborhood, global_data, offset)
    }

    fn compute_global_time_step(&self, _global_data: &SsdAccumulator) -> Result<f64> {
        Ok(self.kernel()?.global_time_step())
    }

    fn time_step(&self) -> f64 {
        self.config.time_step
    }

    fn set_time_step(&mut self, time_step: f64) -> Result<()> {
        self.config.with_time_step(time_step).validate()?;
        self.config.time_step = time_step;
        if let Some(kernel) = &mut self.kernel {
            kernel.time_step = time_step;
        }
        Ok(())
    }
}
