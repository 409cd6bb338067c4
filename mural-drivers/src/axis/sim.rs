//! Simulated winch axis
//!
//! Models the speed semantics of the real axis against a fixed poll rate
//! instead of a clock: every [`advance`](StepperAxis::advance) call is
//! worth `1 / tick_hz` seconds of travel. Deterministic, so scheduler
//! behavior (notably simultaneous arrival) is testable on the host
//! without hardware or timers.

use mural_core::traits::StepperAxis;

/// In-memory axis paced by a nominal poll rate
#[derive(Debug, Clone)]
pub struct SimAxis {
    tick_hz: f32,
    target: i32,
    position: i32,
    speed: f32,
    fraction: f32,
    enabled: bool,
}

impl SimAxis {
    /// Create a simulated axis assuming `tick_hz` advance calls per second
    pub fn new(tick_hz: f32) -> Self {
        Self {
            tick_hz,
            target: 0,
            position: 0,
            speed: 0.0,
            fraction: 0.0,
            enabled: false,
        }
    }

    /// Whether the motor is energized
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current target position in steps
    pub fn target(&self) -> i32 {
        self.target
    }

    /// The commanded speed in steps/s
    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl StepperAxis for SimAxis {
    fn set_target(&mut self, target: i32) {
        self.target = target;
    }

    fn move_relative(&mut self, delta: i32) {
        self.target = self.position.saturating_add(delta);
    }

    fn set_speed(&mut self, steps_per_s: f32) {
        self.speed = steps_per_s;
    }

    fn current_position(&self) -> i32 {
        self.position
    }

    fn set_current_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
    }

    fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    fn advance(&mut self) -> bool {
        let distance = self.target - self.position;
        if distance == 0 {
            self.fraction = 0.0;
            return false;
        }

        self.fraction += self.speed / self.tick_hz;
        let due = self.fraction as i32;
        if due == 0 {
            return false;
        }
        self.fraction -= due as f32;

        // never overshoot the target
        let magnitude = due.min(distance.abs());
        self.position += if distance > 0 { magnitude } else { -magnitude };
        true
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_steps_per_tick() {
        let mut axis = SimAxis::new(1000.0);
        axis.set_target(10);
        axis.set_speed(2000.0); // 2 steps per tick
        assert_eq!(axis.target(), 10);
        assert_eq!(axis.speed(), 2000.0);

        assert!(axis.advance());
        assert_eq!(axis.current_position(), 2);
        for _ in 0..4 {
            axis.advance();
        }
        assert_eq!(axis.current_position(), 10);
        assert_eq!(axis.distance_to_go(), 0);
    }

    #[test]
    fn enable_state_is_tracked() {
        let mut axis = SimAxis::new(1000.0);
        assert!(!axis.is_enabled());
        axis.set_enabled(true);
        assert!(axis.is_enabled());
    }

    #[test]
    fn fractional_speed_accumulates() {
        let mut axis = SimAxis::new(1000.0);
        axis.set_target(5);
        axis.set_speed(500.0); // half a step per tick

        assert!(!axis.advance());
        assert!(axis.advance());
        assert_eq!(axis.current_position(), 1);
    }

    #[test]
    fn runs_backward_and_clamps() {
        let mut axis = SimAxis::new(1000.0);
        axis.set_current_position(100);
        axis.set_target(97);
        axis.set_speed(10_000.0); // 10 steps per tick, 3 to go

        assert!(axis.advance());
        assert_eq!(axis.current_position(), 97);
        assert!(!axis.advance());
    }

    #[test]
    fn rewriting_the_counter_clears_the_move() {
        let mut axis = SimAxis::new(1000.0);
        axis.set_target(50);
        axis.set_current_position(7);
        assert_eq!(axis.distance_to_go(), 0);
    }
}
