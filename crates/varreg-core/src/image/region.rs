//! Rectangular index regions and voxel neighborhoods.
//!
//! A solver evaluates a force law over the interior of the fixed image,
//! split into disjoint regions with one worker per region. Each voxel is
//! handed to the force law as a [`Neighborhood`] view.

/// Axis-aligned block of grid indices `[start, start + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRegion<const D: usize> {
    start: [usize; D],
    size: [usize; D],
}

impl<const D: usize> ImageRegion<D> {
    pub fn new(start: [usize; D], size: [usize; D]) -> Self {
        Self { start, size }
    }

    /// Region covering a whole grid.
    pub fn whole(size: [usize; D]) -> Self {
        Self::new([0; D], size)
    }

    /// Region of a grid excluding a boundary band of `radius` voxels on
    /// every side. Empty when the grid is too small to have an interior.
    pub fn interior(size: [usize; D], radius: usize) -> Self {
        let mut start = [0usize; D];
        let mut inner = [0usize; D];
        for axis in 0..D {
            start[axis] = radius.min(size[axis]);
            inner[axis] = size[axis].saturating_sub(2 * radius);
        }
        Self::new(start, inner)
    }

    pub fn start(&self) -> [usize; D] {
        self.start
    }

    pub fn size(&self) -> [usize; D] {
        self.size
    }

    pub fn number_of_voxels(&self) -> usize {
        self.size.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_voxels() == 0
    }

    pub fn contains(&self, index: &[usize; D]) -> bool {
        (0..D).all(|axis| {
            index[axis] >= self.start[axis] && index[axis] < self.start[axis] + self.size[axis]
        })
    }

    /// Split into at most `pieces` disjoint slabs along the slowest axis.
    ///
    /// The slabs cover the region exactly; fewer than `pieces` are returned
    /// when the slowest axis is shorter than `pieces`.
    pub fn split(&self, pieces: usize) -> Vec<Self> {
        if D == 0 || self.is_empty() {
            return Vec::new();
        }
        let axis = D - 1;
        let extent = self.size[axis];
        let pieces = pieces.clamp(1, extent);
        let base = extent / pieces;
        let remainder = extent % pieces;

        let mut regions = Vec::with_capacity(pieces);
        let mut offset = self.start[axis];
        for piece in 0..pieces {
            let length = base + usize::from(piece < remainder);
            let mut start = self.start;
            let mut size = self.size;
            start[axis] = offset;
            size[axis] = length;
            regions.push(Self::new(start, size));
            offset += length;
        }
        regions
    }

    /// Iterate over the indices of the region, axis 0 varying fastest.
    pub fn indices(&self) -> RegionIndices<D> {
        RegionIndices {
            region: *self,
            next: if self.is_empty() { None } else { Some(self.start) },
        }
    }
}

/// Iterator over the indices of an [`ImageRegion`].
#[derive(Debug, Clone)]
pub struct RegionIndices<const D: usize> {
    region: ImageRegion<D>,
    next: Option<[usize; D]>,
}

impl<const D: usize> Iterator for RegionIndices<D> {
    type Item = [usize; D];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut following = current;
        let mut advanced = false;
        for axis in 0..D {
            following[axis] += 1;
            if following[axis] < self.region.start[axis] + self.region.size[axis] {
                advanced = true;
                break;
            }
            following[axis] = self.region.start[axis];
        }
        self.next = if advanced { Some(following) } else { None };
        Some(current)
    }
}

/// View of a voxel and its surrounding box of `radius` voxels per axis.
///
/// The force law reads the centre; the radius documents how far its
/// samplers may reach and is checked against their requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood<const D: usize> {
    center: [usize; D],
    radius: [usize; D],
}

impl<const D: usize> Neighborhood<D> {
    pub fn new(center: [usize; D], radius: [usize; D]) -> Self {
        Self { center, radius }
    }

    /// Neighborhood with the same radius along every axis.
    pub fn with_radius(center: [usize; D], radius: usize) -> Self {
        Self::new(center, [radius; D])
    }

    pub fn center(&self) -> &[usize; D] {
        &self.center
    }

    pub fn radius(&self) -> &[usize; D] {
        &self.radius
    }

    /// Smallest radius over all axes.
    pub fn min_radius(&self) -> usize {
        self.radius.iter().copied().min().unwrap_or(0)
    }
}
