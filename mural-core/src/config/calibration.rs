//! Top-distance calibration state
//!
//! The single measured input is the horizontal span of the mounting
//! surface's top edge. Safety margins and the usable drawing width derive
//! from it the moment it is set; until then every kinematics call is out
//! of contract and the [`Movement`](crate::motion::Movement) controller
//! refuses travel.

use crate::config::RigConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel top distance meaning "never measured"
pub const UNCONFIGURED: i32 = -1;

/// Measured top-edge distance and the margins derived from it
///
/// Created unconfigured; transitions to configured via
/// [`set_top_distance`](Calibration::set_top_distance) and never reverts.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    top_distance: i32,
    min_safe_y: f64,
    min_safe_x_offset: f64,
    width: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl Calibration {
    /// Create an unconfigured calibration
    pub const fn unconfigured() -> Self {
        Self {
            top_distance: UNCONFIGURED,
            min_safe_y: 0.0,
            min_safe_x_offset: 0.0,
            width: 0.0,
        }
    }

    /// Set the measured top distance and derive margins and usable width
    pub fn set_top_distance(&mut self, distance: i32, rig: &RigConfig) {
        self.top_distance = distance;
        self.min_safe_y = rig.safe_y_fraction * distance as f64;
        self.min_safe_x_offset = rig.safe_x_fraction * distance as f64;
        self.width = distance as f64 - 2.0 * self.min_safe_x_offset;
    }

    /// Whether a top distance has been set
    pub fn is_configured(&self) -> bool {
        self.top_distance != UNCONFIGURED
    }

    /// Measured top distance in mm, [`UNCONFIGURED`] if never set
    pub fn top_distance(&self) -> i32 {
        self.top_distance
    }

    /// Vertical safety margin in mm
    pub fn min_safe_y(&self) -> f64 {
        self.min_safe_y
    }

    /// Horizontal safety margin (each side) in mm
    pub fn min_safe_x_offset(&self) -> f64 {
        self.min_safe_x_offset
    }

    /// Usable drawing width in mm
    pub fn width(&self) -> f64 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unconfigured() {
        let cal = Calibration::unconfigured();
        assert!(!cal.is_configured());
        assert_eq!(cal.top_distance(), UNCONFIGURED);
    }

    #[test]
    fn derives_margins_and_width() {
        let rig = RigConfig::default();
        let mut cal = Calibration::unconfigured();
        cal.set_top_distance(1000, &rig);

        assert!(cal.is_configured());
        assert_eq!(cal.top_distance(), 1000);
        assert_eq!(cal.min_safe_y(), 200.0);
        assert_eq!(cal.min_safe_x_offset(), 200.0);
        assert_eq!(cal.width(), 600.0);
    }

    #[test]
    fn re_measuring_updates_derived_fields() {
        let rig = RigConfig::default();
        let mut cal = Calibration::unconfigured();
        cal.set_top_distance(1000, &rig);
        cal.set_top_distance(2000, &rig);

        assert_eq!(cal.min_safe_x_offset(), 400.0);
        assert_eq!(cal.width(), 1200.0);
    }
}
