//! Planar coordinate to belt payout transform
//!
//! The carriage hangs from two belts anchored `bottom_distance` apart.
//! Near the midline it hangs level; toward either side boundary it
//! rotates, which moves the anchor points relative to the pen tip. The
//! transform models that rotation as an angle proportional to the
//! horizontal deviation from the midline, corrects both anchors, and then
//! measures the two legs corner-to-anchor, extended by the pulley
//! standoff out of the wall plane.

use libm::{cos, fabs, sin, sqrt};

use crate::config::{Calibration, RigConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate on the drawing plane, in mm
///
/// x grows rightward across the usable width, y grows downward from the
/// safe top margin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanarPoint {
    /// Horizontal position in mm
    pub x: f64,
    /// Vertical position in mm
    pub y: f64,
}

impl PlanarPoint {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Belt payout targets in motor steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeltLengths {
    /// Left winch payout in steps
    pub left: i32,
    /// Right winch payout in steps
    pub right: i32,
}

/// Compute the belt payout lengths for a carriage coordinate
///
/// Pure over the domain x in [0, width], y >= 0 with a configured
/// calibration; outside that domain the result is meaningless. Callers
/// gate on [`Calibration::is_configured`].
pub fn belt_lengths(point: PlanarPoint, rig: &RigConfig, cal: &Calibration) -> BeltLengths {
    let unsafe_x = point.x + cal.min_safe_x_offset();
    let unsafe_y = point.y + cal.min_safe_y();

    let half_top = cal.top_distance() as f64 / 2.0;

    // x deviation from the middle - the farther from the middle, the more
    // extreme the carriage tilt gets
    let x_dev = half_top - unsafe_x;

    // tilt angle is proportional to that deviation: at either edge of the
    // top span it reaches a quarter turn
    let dev_angle = (fabs(x_dev) / half_top) * (core::f64::consts::PI / 2.0);

    // the carriage rotates around the middle of its anchor span
    let half_bottom = rig.bottom_distance / 2.0;

    // flat anchor coordinates before tilt compensation
    let flat_left_x = unsafe_x - half_bottom;
    let flat_right_x = unsafe_x + half_bottom;
    let flat_left_y = unsafe_y;
    let flat_right_y = unsafe_y;

    // compensation magnitudes: zero at the midline, bounded by half_bottom
    let x_comp = half_bottom - cos(dev_angle) * half_bottom;
    let y_comp = sin(dev_angle) * half_bottom;

    // x_comp always pulls the anchors inward; y_comp changes side with the
    // tilt direction
    let (left_x, left_y, right_x, right_y) = if x_dev < 0.0 {
        // right of the middle axis: carriage tilts counter-clockwise
        (
            flat_left_x + x_comp,
            flat_left_y + y_comp,
            flat_right_x - x_comp,
            flat_right_y - y_comp,
        )
    } else {
        // left of the middle axis: carriage tilts clockwise
        (
            flat_left_x + x_comp,
            flat_left_y - y_comp,
            flat_right_x - x_comp,
            flat_right_y + y_comp,
        )
    };

    // leg lengths flush to the wall, from each top corner to its anchor
    let left_flat = sqrt(left_x * left_x + left_y * left_y);
    let right_span = cal.top_distance() as f64 - right_x;
    let right_flat = sqrt(right_span * right_span + right_y * right_y);

    // true leg lengths including the pulley standoff
    let wall = rig.mid_pulley_to_wall;
    let left_leg = sqrt(left_flat * left_flat + wall * wall);
    let right_leg = sqrt(right_flat * right_flat + wall * wall);

    BeltLengths {
        left: rig.mm_to_steps(left_leg),
        right: rig.mm_to_steps(right_leg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated(top: i32) -> (RigConfig, Calibration) {
        let rig = RigConfig::default();
        let mut cal = Calibration::unconfigured();
        cal.set_top_distance(top, &rig);
        (rig, cal)
    }

    #[test]
    fn home_point_regression() {
        // top=1000 => margins 200/200, width 600, home (300, 350)
        let (rig, cal) = calibrated(1000);
        let lengths = belt_lengths(PlanarPoint::new(300.0, 350.0), &rig, &cal);
        assert_eq!(lengths.left, 73_565);
        assert_eq!(lengths.right, 73_565);
    }

    #[test]
    fn off_midline_regression_pins_chirality() {
        // Left of the midline: clockwise branch (left anchor rises,
        // right anchor drops). These values pin the sign convention.
        let (rig, cal) = calibrated(1000);
        let lengths = belt_lengths(PlanarPoint::new(100.0, 350.0), &rig, &cal);
        assert_eq!(lengths.left, 60_874);
        assert_eq!(lengths.right, 89_898);

        // Mirror point takes the counter-clockwise branch
        let mirrored = belt_lengths(PlanarPoint::new(500.0, 350.0), &rig, &cal);
        assert_eq!(mirrored.left, 89_898);
        assert_eq!(mirrored.right, 60_874);
    }

    #[test]
    fn midline_is_symmetric_for_any_depth() {
        let (rig, cal) = calibrated(1000);
        for y in [0.0, 10.0, 100.0, 350.0, 1000.0] {
            let lengths = belt_lengths(PlanarPoint::new(300.0, y), &rig, &cal);
            assert!(
                (lengths.left - lengths.right).abs() <= 1,
                "midline asymmetry at y={}: {:?}",
                y,
                lengths
            );
        }
    }

    #[test]
    fn legs_lengthen_with_depth() {
        let (rig, cal) = calibrated(1000);
        let shallow = belt_lengths(PlanarPoint::new(300.0, 0.0), &rig, &cal);
        let deep = belt_lengths(PlanarPoint::new(300.0, 350.0), &rig, &cal);
        assert!(deep.left > shallow.left);
        assert!(deep.right > shallow.right);
    }

    #[test]
    fn corner_fixture() {
        let (rig, cal) = calibrated(1000);
        let lengths = belt_lengths(PlanarPoint::new(0.0, 0.0), &rig, &cal);
        assert_eq!(lengths.left, 25_766);
        assert_eq!(lengths.right, 82_877);
    }
}
