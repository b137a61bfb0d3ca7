//! Force functions for variational registration.
//!
//! [`RegistrationFunction`] is the per-voxel contract a solver drives;
//! [`SsdForceFunction`] implements it with sum-of-squared-differences forces.

pub mod trait_;
pub mod config;
pub mod ssd;

pub use trait_::RegistrationFunction;
pub use config::{GradientType, SsdForceConfig};
pub use ssd::{SsdForceFunction, SsdKernel};
