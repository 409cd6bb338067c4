//! Motion scheduling and the movement controller
//!
//! [`scheduler`] turns a pair of step deltas into per-axis speeds with a
//! common arrival time; [`movement`] owns the two axes and the state
//! bookkeeping around travel, homing and jogging.

pub mod movement;
pub mod scheduler;

pub use movement::{Movement, MovementError};
pub use scheduler::{plan_travel, TravelPlan};
