//! Per-thread SSD statistics.
//!
//! Each worker of a parallel pass owns one [`SsdAccumulator`] and hands it to
//! every per-voxel call it makes. After the pass the caller folds the
//! workers' accumulators with [`SsdAccumulator::merge`], which is associative
//! and commutative, so the merge order does not matter.

/// Running sum of squared intensity differences and evaluated-voxel count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SsdAccumulator {
    sum_of_squared_differences: f64,
    number_of_voxels: usize,
}

impl SsdAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluated voxel with intensity difference `difference`.
    #[inline]
    pub fn add_sample(&mut self, difference: f64) {
        self.sum_of_squared_differences += difference * difference;
        self.number_of_voxels += 1;
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.sum_of_squared_differences += other.sum_of_squared_differences;
        self.number_of_voxels += other.number_of_voxels;
    }

    /// By-value merge, convenient as a reduction operator.
    pub fn merged(mut self, other: Self) -> Self {
        self.merge(&other);
        self
    }

    pub fn sum_of_squared_differences(&self) -> f64 {
        self.sum_of_squared_differences
    }

    pub fn number_of_voxels(&self) -> usize {
        self.number_of_voxels
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_voxels == 0
    }

    /// Mean squared difference over the evaluated voxels, 0 when empty.
    ///
    /// This is the convergence metric a solver reports per iteration.
    pub fn metric(&self) -> f64 {
        if self.number_of_voxels == 0 {
            0.0
        } else {
            self.sum_of_squared_differences / self.number_of_voxels as f64
        }
    }
}

impl std::iter::Sum for SsdAccumulator {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sample() {
        let mut acc = SsdAccumulator::new();
        acc.add_sample(3.0);
        acc.add_sample(-1.0);
        assert_eq!(acc.sum_of_squared_differences(), 10.0);
        assert_eq!(acc.number_of_voxels(), 2);
        assert_eq!(acc.metric(), 5.0);
    }

    #[test]
    fn test_empty_metric() {
        let acc = SsdAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.metric(), 0.0);
    }

    #[test]
    fn test_merge_and_sum() {
        let mut a = SsdAccumulator::new();
        a.add_sample(1.0);
        let mut b = SsdAccumulator::new();
        b.add_sample(2.0);
        b.add_sample(2.0);

        let merged = a.merged(b);
        assert_eq!(merged.sum_of_squared_differences(), 9.0);
        assert_eq!(merged.number_of_voxels(), 3);

        let summed: SsdAccumulator = vec![a, b].into_iter().sum();
        assert_eq!(summed, merged);
    }
}
