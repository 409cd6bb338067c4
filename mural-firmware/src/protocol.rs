//! Command link protocol
//!
//! Commands arrive as postcard-serialized, COBS-framed messages on UART0;
//! status replies go back the same way. The host side (calibration app)
//! speaks the identical types.

use mural_core::traits::Jog;
use serde::{Deserialize, Serialize};

/// Largest encoded frame we ever exchange
pub const MAX_FRAME: usize = 64;

/// Which winch a jog command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    /// Left winch
    Left,
    /// Right winch
    Right,
}

/// Host-to-firmware commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set the measured top distance in mm
    SetTopDistance(i32),
    /// Set the top distance and resume from the home position
    ResumeTopDistance(i32),
    /// Linear travel to a coordinate at a peak speed in steps/s
    MoveTo { x: f64, y: f64, speed_sps: f32 },
    /// Re-establish the origin and travel home
    Home,
    /// Calibration probe: 100mm out left, 100mm in right
    Extend100,
    /// Manual jog of one winch
    Jog { side: Side, jog: Jog },
    /// Release both motors
    DisableMotors,
    /// Request a status frame
    Query,
}

/// Firmware-to-host status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Configured top distance in mm, -1 if unset
    pub top_distance: i32,
    /// Whether a move is in flight
    pub moving: bool,
    /// Whether a home-seek has ever been started
    pub started_homing: bool,
    /// Resting coordinate; None while moving or never commanded
    pub at: Option<(f64, f64)>,
}
