//! Rig geometry and speed configuration
//!
//! Everything here is a property of the built machine, not of the wall it
//! hangs on: spool size, carriage anchor span, pulley standoff, motor
//! step resolution and the two working speeds. The wall-dependent part
//! (top distance and the margins derived from it) lives in
//! [`Calibration`](super::Calibration).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative move magnitude standing in for "run until told to stop".
pub const INFINITE_STEPS: i32 = 999_999_999;

/// Rig geometry and speed constants
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    /// Motor steps per spool rotation (full steps x microstepping)
    pub steps_per_rotation: u32,
    /// Spool diameter in mm
    pub spool_diameter: f64,
    /// Distance between the two belt anchor points on the carriage, in mm
    pub bottom_distance: f64,
    /// Standoff between the mid pulley and the wall plane, in mm
    pub mid_pulley_to_wall: f64,
    /// Fraction of the top distance kept as vertical safety margin
    pub safe_y_fraction: f64,
    /// Fraction of the top distance kept as horizontal safety margin (each side)
    pub safe_x_fraction: f64,
    /// Vertical offset of the home coordinate below the top edge, in mm
    pub home_y_offset: f64,
    /// Belt payout at the known physical retraction point, in mm
    pub homed_offset_mm: f64,
    /// Travel and calibration speed in steps/s
    pub move_speed_sps: f32,
    /// Manual jog speed in steps/s
    pub jog_speed_sps: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            steps_per_rotation: 200 * 16, // 1/16 microstepping
            spool_diameter: 10.0,
            bottom_distance: 67.4,
            mid_pulley_to_wall: 41.0,
            safe_y_fraction: 0.2,
            safe_x_fraction: 0.2,
            home_y_offset: 350.0,
            homed_offset_mm: 17.0,
            move_speed_sps: 3000.0,
            jog_speed_sps: 1000.0,
        }
    }
}

impl RigConfig {
    /// Spool circumference in mm
    pub fn circumference(&self) -> f64 {
        self.spool_diameter * core::f64::consts::PI
    }

    /// Steps per millimeter of belt payout
    pub fn steps_per_mm(&self) -> f64 {
        self.steps_per_rotation as f64 / self.circumference()
    }

    /// Convert a belt distance in mm to motor steps, truncating toward zero
    pub fn mm_to_steps(&self, mm: f64) -> i32 {
        ((mm / self.circumference()) * self.steps_per_rotation as f64) as i32
    }

    /// Step count at the known physical retraction point
    pub fn homed_steps_offset(&self) -> i32 {
        self.mm_to_steps(self.homed_offset_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_ratio() {
        let rig = RigConfig::default();
        // 3200 steps over a 10mm spool: a bit over 100 steps/mm
        assert!(rig.steps_per_mm() > 101.0 && rig.steps_per_mm() < 102.0);
    }

    #[test]
    fn mm_to_steps_truncates() {
        let rig = RigConfig::default();
        assert_eq!(rig.mm_to_steps(100.0), 10_185);
        assert_eq!(rig.mm_to_steps(0.0), 0);
    }

    #[test]
    fn homed_offset_fixture() {
        let rig = RigConfig::default();
        assert_eq!(rig.homed_steps_offset(), 1_731);
    }
}
