//! Winch axis implementations

pub mod sim;
pub mod step_dir;

pub use sim::SimAxis;
pub use step_dir::{StepDirAxis, StepDirConfig};
