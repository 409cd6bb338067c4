//! Board-agnostic core logic for the Mural wall plotter firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (stepper axis, clock)
//! - Rig geometry and top-distance calibration
//! - Belt-length kinematics (tilt-compensated inverse transform)
//! - Motion scheduling (synchronized-arrival speed planning)
//! - The `Movement` controller and its polled execution loop

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod kinematics;
pub mod motion;
pub mod traits;
