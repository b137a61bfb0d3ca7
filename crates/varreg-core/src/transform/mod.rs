//! Spatial transforms.
//!
//! Only the dense displacement field is modelled; it is the read-only
//! geometric state a variational solver hands to its force law.

pub mod displacement_field;

pub use displacement_field::DisplacementField;
