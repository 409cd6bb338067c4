//! Belt-length kinematics
//!
//! The inverse transform from a planar carriage coordinate to the two
//! belt payout lengths, including the tilt compensation the carriage
//! needs near the horizontal edges.

pub mod belts;

pub use belts::{belt_lengths, BeltLengths, PlanarPoint};
