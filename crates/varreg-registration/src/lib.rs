//! SSD force computation for variational image registration.
//!
//! A solver binds the fixed image, the warped moving image and the current
//! displacement field to an [`SsdForceFunction`], calls
//! `initialize_iteration` once per iteration and then evaluates per-voxel
//! updates, either one at a time through [`RegistrationFunction`] or for the
//! whole grid with [`pass::compute_update_pass`]. Iteration diagnostics go
//! through an [`ObserverSet`].

pub mod error;
pub mod accumulator;
pub mod function;
pub mod pass;
pub mod observer;

pub use error::{RegistrationError, Result};
pub use accumulator::SsdAccumulator;
pub use function::{GradientType, RegistrationFunction, SsdForceConfig, SsdForceFunction, SsdKernel};
pub use pass::{compute_region_updates, compute_update_pass, RegionUpdates, UpdatePass};
pub use observer::{
    CallbackObserver, ChannelObserver, EventHistory, ObserverSet, RegistrationEvent,
    RegistrationLogger, RegistrationObserver,
};
