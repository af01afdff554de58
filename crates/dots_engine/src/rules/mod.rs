//! Geometry rules for the dots lattice.
//!
//! Pure functions mapping an edge to its neighbouring squares and completion
//! groups. They know only the lattice dimensions, never edge state, so the
//! lattice and the invariant checks can share them.

pub mod distance;
pub mod groups;

pub use distance::distance_from_counts;
pub use groups::{adjacent_square, completion_group, present_sides, side_of};
