//! Synchronized-arrival speed planning
//!
//! Two independently speed-controlled axes must reach their targets at
//! the same moment or the carriage rotates mid-travel. The axis with the
//! larger distance runs at the requested speed; the other is slowed so
//! both arrival times coincide.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-axis speeds and the common estimated duration of one travel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TravelPlan {
    /// Left axis speed in steps/s
    pub left_speed: f32,
    /// Right axis speed in steps/s
    pub right_speed: f32,
    /// Estimated travel duration in seconds
    pub move_time: f32,
}

/// Plan a travel from signed step deltas and the requested peak speed
///
/// The dominant axis gets `speed`; the other axis's speed is scaled so
/// `delta / speed` matches on both. A zero-length travel yields zero
/// speeds and zero duration.
pub fn plan_travel(delta_left: i32, delta_right: i32, speed: f32) -> TravelPlan {
    let left = delta_left.unsigned_abs() as f32;
    let right = delta_right.unsigned_abs() as f32;

    if left >= right {
        if left == 0.0 {
            return TravelPlan {
                left_speed: 0.0,
                right_speed: 0.0,
                move_time: 0.0,
            };
        }
        let move_time = left / speed;
        TravelPlan {
            left_speed: speed,
            right_speed: right / move_time,
            move_time,
        }
    } else {
        let move_time = right / speed;
        TravelPlan {
            left_speed: left / move_time,
            right_speed: speed,
            move_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    #[test]
    fn dominant_left_gets_full_speed() {
        let plan = plan_travel(6000, 3000, 3000.0);
        assert_eq!(plan.left_speed, 3000.0);
        assert!((plan.move_time - 2.0).abs() < TOL);
        assert!((plan.right_speed - 1500.0).abs() < TOL);
    }

    #[test]
    fn dominant_right_gets_full_speed() {
        let plan = plan_travel(-1000, 4000, 2000.0);
        assert_eq!(plan.right_speed, 2000.0);
        assert!((plan.move_time - 2.0).abs() < TOL);
        assert!((plan.left_speed - 500.0).abs() < TOL);
    }

    #[test]
    fn arrival_times_match() {
        for (dl, dr) in [(1234, 987), (10, 100_000), (-5000, 4999), (77, -77)] {
            let plan = plan_travel(dl, dr, 3000.0);
            let tl = dl.unsigned_abs() as f32 / plan.left_speed;
            let tr = dr.unsigned_abs() as f32 / plan.right_speed;
            assert!(
                (tl - tr).abs() < TOL,
                "desynchronized arrival for ({}, {}): {} vs {}",
                dl,
                dr,
                tl,
                tr
            );
        }
    }

    #[test]
    fn zero_travel_is_instant() {
        let plan = plan_travel(0, 0, 3000.0);
        assert_eq!(plan.move_time, 0.0);
        assert_eq!(plan.left_speed, 0.0);
        assert_eq!(plan.right_speed, 0.0);
    }

    #[test]
    fn one_sided_travel_stills_other_axis() {
        let plan = plan_travel(0, 500, 1000.0);
        assert_eq!(plan.left_speed, 0.0);
        assert_eq!(plan.right_speed, 1000.0);
        assert!((plan.move_time - 0.5).abs() < TOL);
    }
}
