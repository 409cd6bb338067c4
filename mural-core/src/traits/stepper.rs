//! Stepper axis abstraction
//!
//! One implementor per winch. The controller only ever talks in absolute
//! step counts and constant speeds; pulse generation, pin polarity and
//! pacing live behind this trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Manual jog command for a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Jog {
    /// Pay belt out until stopped
    Forward,
    /// Reel belt in until stopped
    Reverse,
    /// Stop now (instant-stop approximation)
    Stop,
}

/// Trait for a speed-controlled, position-counting stepper axis
///
/// Implementations run the motor toward the target position at the
/// commanded constant speed, one [`advance`](StepperAxis::advance) poll at
/// a time. The position counter is in motor steps and may be rewritten by
/// the controller when an origin is re-established.
pub trait StepperAxis {
    /// Set the absolute target position in steps
    fn set_target(&mut self, target: i32);

    /// Set the target relative to the current position
    fn move_relative(&mut self, delta: i32);

    /// Set the commanded speed in steps/s
    ///
    /// The speed stays in effect until the next call; direction is
    /// determined by the sign of the remaining distance, not the speed.
    fn set_speed(&mut self, steps_per_s: f32);

    /// Current position counter in steps
    fn current_position(&self) -> i32;

    /// Rewrite the position counter without moving
    fn set_current_position(&mut self, position: i32);

    /// Steps remaining to the target (signed)
    fn distance_to_go(&self) -> i32;

    /// One poll of the axis: emit at most one step toward the target
    ///
    /// Must return promptly; the caller provides the cadence. Returns
    /// whether a step was taken.
    fn advance(&mut self) -> bool;

    /// Energize or release the motor
    fn set_enabled(&mut self, enabled: bool);
}
