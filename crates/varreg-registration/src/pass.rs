//! Region-parallel evaluation of a force kernel.
//!
//! The interior of the fixed image (the grid minus a band as wide as the
//! sampler stencil) is split into slabs along the slowest axis. Each slab is
//! evaluated on a rayon worker with its own [`SsdAccumulator`]; the slab
//! results are then scattered into a dense update buffer and the
//! accumulators merged. Boundary voxels receive the zero update.

use rayon::prelude::*;
use varreg_core::{ImageRegion, Neighborhood, Vector};
use crate::accumulator::SsdAccumulator;
use crate::error::Result;
use crate::function::SsdKernel;

/// Updates of one evaluated region, in region iteration order.
#[derive(Debug, Clone)]
pub struct RegionUpdates<const D: usize> {
    region: ImageRegion<D>,
    updates: Vec<Vector<D>>,
    accumulator: SsdAccumulator,
}

impl<const D: usize> RegionUpdates<D> {
    pub fn region(&self) -> &ImageRegion<D> {
        &self.region
    }

    /// One update per voxel of the region, axis 0 varying fastest.
    pub fn updates(&self) -> &[Vector<D>] {
        &self.updates
    }

    pub fn accumulator(&self) -> &SsdAccumulator {
        &self.accumulator
    }
}

/// Result of a full pass over the image.
#[derive(Debug, Clone)]
pub struct UpdatePass<const D: usize> {
    size: [usize; D],
    updates: Vec<Vector<D>>,
    accumulator: SsdAccumulator,
    global_time_step: f64,
}

impl<const D: usize> UpdatePass<D> {
    /// Grid size (x first).
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Dense update buffer in x-fastest order.
    pub fn updates(&self) -> &[Vector<D>] {
        &self.updates
    }

    /// Update at a grid index, `None` off the grid.
    pub fn update_at(&self, index: &[usize; D]) -> Option<Vector<D>> {
        if (0..D).any(|axis| index[axis] >= self.size[axis]) {
            return None;
        }
        self.updates.get(linear_offset(index, &self.size)).copied()
    }

    /// Merged statistics of all workers.
    pub fn accumulator(&self) -> &SsdAccumulator {
        &self.accumulator
    }

    /// Mean squared intensity difference of the pass.
    pub fn metric(&self) -> f64 {
        self.accumulator.metric()
    }

    /// Global time step reported by the kernel for this pass.
    pub fn global_time_step(&self) -> f64 {
        self.global_time_step
    }

    /// Root mean square of the update magnitudes over the whole grid.
    pub fn rms_update(&self) -> f64 {
        if self.updates.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.updates.iter().map(Vector::norm_squared).sum();
        (sum / self.updates.len() as f64).sqrt()
    }

    pub fn into_updates(self) -> Vec<Vector<D>> {
        self.updates
    }
}

/// Evaluate every voxel of `region` with a fresh accumulator.
///
/// The region must lie inside the interior of the kernel's grid; voxels
/// closer to the border than the sampler radius fail with
/// `InsufficientRadius`.
pub fn compute_region_updates<const D: usize>(
    kernel: &SsdKernel<D>,
    region: &ImageRegion<D>,
) -> Result<RegionUpdates<D>> {
    let size = kernel.size();
    let zero = Vector::zeros();
    let mut accumulator = SsdAccumulator::new();
    let mut updates = Vec::with_capacity(region.number_of_voxels());

    for index in region.indices() {
        let neighborhood = Neighborhood::new(index, border_radius(&index, &size));
        updates.push(kernel.compute_update(&neighborhood, &mut accumulator, &zero)?);
    }

    Ok(RegionUpdates {
        region: *region,
        updates,
        accumulator,
    })
}

/// Evaluate the interior of the kernel's grid on up to `pieces` workers.
///
/// # Arguments
/// * `kernel` - Frozen state of the current iteration
/// * `pieces` - Number of slabs to split the interior into (at least 1)
///
/// # Returns
/// The dense update buffer and the merged accumulator
pub fn compute_update_pass<const D: usize>(
    kernel: &SsdKernel<D>,
    pieces: usize,
) -> Result<UpdatePass<D>> {
    let size = kernel.size();
    let interior = ImageRegion::interior(size, kernel.required_radius());
    let regions = interior.split(pieces.max(1));

    let results: Vec<RegionUpdates<D>> = regions
        .par_iter()
        .map(|region| compute_region_updates(kernel, region))
        .collect::<Result<Vec<_>>>()?;

    let total: usize = size.iter().product();
    let mut updates = vec![Vector::zeros(); total];
    let mut accumulator = SsdAccumulator::new();

    for result in &results {
        accumulator.merge(&result.accumulator);
        for (index, update) in result.region.indices().zip(&result.updates) {
            updates[linear_offset(&index, &size)] = *update;
        }
    }

    if accumulator.is_empty() {
        tracing::warn!(
            size = ?size,
            regions = results.len(),
            "SSD pass evaluated no voxels"
        );
    }

    Ok(UpdatePass {
        size,
        updates,
        accumulator,
        global_time_step: kernel.global_time_step(),
    })
}

/// Largest neighborhood radius per axis that stays inside the grid.
fn border_radius<const D: usize>(index: &[usize; D], size: &[usize; D]) -> [usize; D] {
    let mut radius = [0usize; D];
    for axis in 0..D {
        let after = size[axis].saturating_sub(index[axis] + 1);
        radius[axis] = index[axis].min(after);
    }
    radius
}

fn linear_offset<const D: usize>(index: &[usize; D], size: &[usize; D]) -> usize {
    let mut offset = 0;
    let mut stride = 1;
    for axis in 0..D {
        offset += index[axis] * stride;
        stride *= size[axis];
    }
    offset
}
