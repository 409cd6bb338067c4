//! Configuration types
//!
//! Rig geometry constants and the runtime top-distance calibration.

pub mod calibration;
pub mod rig;

pub use calibration::Calibration;
pub use rig::RigConfig;
