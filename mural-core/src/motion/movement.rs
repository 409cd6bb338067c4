//! The movement controller
//!
//! Owns the two winch axes and all motion state. Every operation here is
//! synchronous and non-blocking; the only recurring entry point is
//! [`run_steppers`](Movement::run_steppers), which the host must poll
//! frequently and regularly while a move is in flight - step timing
//! fidelity is entirely the caller's cadence.

use libm::ceilf;

use crate::config::rig::INFINITE_STEPS;
use crate::config::{Calibration, RigConfig};
use crate::kinematics::{belt_lengths, PlanarPoint};
use crate::motion::scheduler::plan_travel;
use crate::traits::{Jog, StepperAxis};

/// Sentinel coordinate meaning "never commanded"
const UNKNOWN: f64 = -1.0;

/// Errors returned by movement operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovementError {
    /// Calibration or homing precondition unmet, or coordinates queried
    /// while unset or moving
    NotReady,
    /// Target coordinate outside the valid envelope
    InvalidCoordinate,
}

/// Two-winch movement controller
///
/// Generic over the axis implementation so the same logic runs against
/// real step/dir hardware and the simulated axes used in tests.
pub struct Movement<L, R> {
    rig: RigConfig,
    calibration: Calibration,
    left: L,
    right: R,
    current_x: f64,
    current_y: f64,
    homed: bool,
    moving: bool,
    started_homing: bool,
}

impl<L: StepperAxis, R: StepperAxis> Movement<L, R> {
    /// Create a controller over two axes; motors start released
    pub fn new(rig: RigConfig, mut left: L, mut right: R) -> Self {
        left.set_enabled(false);
        right.set_enabled(false);

        Self {
            rig,
            calibration: Calibration::unconfigured(),
            left,
            right,
            current_x: UNKNOWN,
            current_y: UNKNOWN,
            homed: false,
            moving: false,
            started_homing: false,
        }
    }

    /// Set the measured top distance; movement state is untouched
    pub fn set_top_distance(&mut self, distance: i32) {
        self.calibration.set_top_distance(distance, &self.rig);
    }

    /// Set the top distance and re-establish a known physical position
    ///
    /// Used when resuming from the home coordinate without re-homing: the
    /// controller is marked homed, the current coordinate becomes the home
    /// coordinate and both axis counters are reconciled to the belt
    /// lengths that coordinate implies.
    pub fn resume_top_distance(&mut self, distance: i32) {
        self.set_top_distance(distance);
        self.homed = true;

        let home = self.home_coordinates();
        self.current_x = home.x;
        self.current_y = home.y;

        let lengths = belt_lengths(home, &self.rig, &self.calibration);
        self.left.set_current_position(lengths.left);
        self.right.set_current_position(lengths.right);

        self.moving = false;
    }

    /// Measured top distance in mm, -1 if unconfigured
    pub fn top_distance(&self) -> i32 {
        self.calibration.top_distance()
    }

    /// Usable drawing width in mm
    pub fn width(&self) -> Result<f64, MovementError> {
        if !self.calibration.is_configured() {
            return Err(MovementError::NotReady);
        }
        Ok(self.calibration.width())
    }

    /// The designated resting position: horizontally centered, offset down
    ///
    /// Returns the plane origin while unconfigured.
    pub fn home_coordinates(&self) -> PlanarPoint {
        if !self.calibration.is_configured() {
            return PlanarPoint::new(0.0, 0.0);
        }
        PlanarPoint::new(self.calibration.width() / 2.0, self.rig.home_y_offset)
    }

    /// Last commanded coordinate; only meaningful at rest
    pub fn coordinates(&self) -> Result<PlanarPoint, MovementError> {
        if self.current_x == UNKNOWN || self.current_y == UNKNOWN {
            return Err(MovementError::NotReady);
        }
        if self.moving {
            return Err(MovementError::NotReady);
        }
        Ok(PlanarPoint::new(self.current_x, self.current_y))
    }

    /// Begin a single-segment linear travel to `(x, y)` at `speed` steps/s
    ///
    /// Validation precedes every state write. On success both axes carry
    /// new targets and speeds chosen for simultaneous arrival, and the
    /// estimated duration in seconds is returned.
    pub fn begin_linear_travel(&mut self, x: f64, y: f64, speed: f32) -> Result<f32, MovementError> {
        if !self.calibration.is_configured() || !self.homed {
            return Err(MovementError::NotReady);
        }
        if x < 0.0 || x >= self.calibration.width() + 1.0 {
            return Err(MovementError::InvalidCoordinate);
        }
        if y < 0.0 {
            return Err(MovementError::InvalidCoordinate);
        }

        let lengths = belt_lengths(PlanarPoint::new(x, y), &self.rig, &self.calibration);
        let delta_left = lengths.left - self.left.current_position();
        let delta_right = lengths.right - self.right.current_position();

        let plan = plan_travel(delta_left, delta_right, speed);

        self.left.set_enabled(true);
        self.right.set_enabled(true);

        self.left.set_target(lengths.left);
        self.left.set_speed(plan.left_speed);
        self.right.set_target(lengths.right);
        self.right.set_speed(plan.right_speed);

        // optimistic: coordinate queries are blocked until the move drains
        self.current_x = x;
        self.current_y = y;
        self.moving = true;

        Ok(plan.move_time)
    }

    /// Re-establish the origin and travel to the home coordinate
    ///
    /// Returns the estimated duration rounded up to whole seconds so the
    /// caller can schedule a poll or timeout.
    pub fn extend_to_home(&mut self) -> Result<u32, MovementError> {
        self.set_origin();

        let home = self.home_coordinates();
        self.started_homing = true;
        let move_time = self.begin_linear_travel(home.x, home.y, self.rig.move_speed_sps)?;
        Ok(ceilf(move_time) as u32)
    }

    /// Fixed calibration probe: 100mm out on the left, 100mm in on the right
    ///
    /// Bypasses the kinematics entirely and needs no calibration.
    pub fn extend_100mm(&mut self) {
        let steps = self.rig.mm_to_steps(100.0);

        self.left.set_enabled(true);
        self.right.set_enabled(true);

        self.left.move_relative(steps);
        self.left.set_speed(self.rig.move_speed_sps);

        self.right.move_relative(-steps);
        self.right.set_speed(self.rig.move_speed_sps);

        self.moving = true;
    }

    /// Jog the left axis
    pub fn left_stepper(&mut self, jog: Jog) {
        Self::jog_axis(&mut self.left, jog, self.rig.jog_speed_sps);
        self.moving = true;
    }

    /// Jog the right axis
    pub fn right_stepper(&mut self, jog: Jog) {
        Self::jog_axis(&mut self.right, jog, self.rig.jog_speed_sps);
        self.moving = true;
    }

    fn jog_axis<A: StepperAxis>(axis: &mut A, jog: Jog, speed: f32) {
        match jog {
            Jog::Forward => {
                axis.set_enabled(true);
                axis.move_relative(INFINITE_STEPS);
                axis.set_speed(speed);
            }
            Jog::Reverse => {
                axis.set_enabled(true);
                axis.move_relative(-INFINITE_STEPS);
                axis.set_speed(speed);
            }
            // instant stop: the remaining distance collapses to zero and
            // the next poll observes completion
            Jog::Stop => {
                let position = axis.current_position();
                axis.set_target(position);
            }
        }
    }

    /// The polled execution tick
    ///
    /// Advances both axes toward their targets while a move is in flight;
    /// clears `moving` once both report zero remaining distance. Never
    /// blocks.
    pub fn run_steppers(&mut self) {
        if !self.moving {
            return;
        }

        self.left.advance();
        self.right.advance();

        if self.left.distance_to_go() == 0 && self.right.distance_to_go() == 0 {
            self.moving = false;
        }
    }

    /// Release both motors
    pub fn disable_motors(&mut self) {
        self.left.set_enabled(false);
        self.right.set_enabled(false);
    }

    /// Whether a move is in flight
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether a home-seek has ever been started
    pub fn has_started_homing(&self) -> bool {
        self.started_homing
    }

    /// Reset both position counters to the known retraction point
    fn set_origin(&mut self) {
        let offset = self.rig.homed_steps_offset();
        self.left.set_current_position(offset);
        self.right.set_current_position(offset);
        self.homed = true;
    }
}
