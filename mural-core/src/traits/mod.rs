//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic and
//! hardware-specific implementations.

pub mod stepper;
pub mod time;

pub use stepper::{Jog, StepperAxis};
pub use time::Clock;
