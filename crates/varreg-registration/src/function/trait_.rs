//! Force-function trait used by variational solvers.
//!
//! A solver drives one iteration as:
//! 1. `initialize_iteration` once, single-threaded;
//! 2. `compute_update` for every interior voxel, possibly from many threads,
//!    each thread passing its own `GlobalData`;
//! 3. merge the per-thread `GlobalData` and ask `compute_global_time_step`.

use varreg_core::{Neighborhood, Vector};
use crate::error::Result;

/// Per-voxel force law of a variational registration solver.
///
/// # Type Parameters
/// * `D` - Spatial dimensionality, equal to the update vector length
pub trait RegistrationFunction<const D: usize> {
    /// Per-thread statistics written during a pass.
    type GlobalData: Default + Send;

    /// Prepare state shared by all voxels of the coming iteration.
    fn initialize_iteration(&mut self) -> Result<()>;

    /// Update vector for the voxel at the centre of `neighborhood`.
    ///
    /// # Arguments
    /// * `neighborhood` - View centred on an interior voxel
    /// * `global_data` - The calling thread's statistics
    /// * `offset` - Sub-voxel offset of the evaluation position (zero for on-grid)
    fn compute_update(
        &self,
        neighborhood: &Neighborhood<D>,
        global_data: &mut Self::GlobalData,
        offset: &Vector<D>,
    ) -> Result<Vector<D>>;

    /// Time step the solver should apply after the pass.
    fn compute_global_time_step(&self, global_data: &Self::GlobalData) -> Result<f64>;

    /// Configured step size.
    fn time_step(&self) -> f64;

    /// Set the step size. Values the configuration would reject fail
    /// without changing the current step.
    fn set_time_step(&mut self, time_step: f64) -> Result<()>;
}
