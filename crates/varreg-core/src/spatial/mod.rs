//! Geometry of the voxel grid.
//!
//! Thin nalgebra wrappers in axis order (x first): continuous indices
//! ([`Point`]), per-voxel vectors such as gradients and updates
//! ([`Vector`]), voxel spacing and the image orientation matrix.

pub mod point;
pub mod vector;
pub mod spacing;
pub mod direction;

pub use point::Point;
pub use vector::Vector;
pub use spacing::Spacing;
pub use direction::Direction;

pub type Spacing2 = Spacing<2>;
pub type Spacing3 = Spacing<3>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
