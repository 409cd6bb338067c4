//! Step/dir winch axis
//!
//! Drives a step/dir/enable stepper interface through `embedded-hal`
//! output pins at a constant commanded speed, one pulse per due poll.
//! Pacing comes from an injected [`Clock`]; the poll cadence only needs
//! to beat the step interval.

use embedded_hal::digital::OutputPin;

use mural_core::traits::{Clock, StepperAxis};

/// Pin polarity configuration for one axis
#[derive(Debug, Clone)]
pub struct StepDirConfig {
    /// Invert the direction pin (mirrored motor mounting)
    pub dir_inverted: bool,
    /// Enable pin is active low (TMC-style EN input)
    pub enable_inverted: bool,
}

impl Default for StepDirConfig {
    fn default() -> Self {
        Self {
            dir_inverted: false,
            enable_inverted: true,
        }
    }
}

/// Position-counting axis over step/dir/enable pins
pub struct StepDirAxis<S, D, E, C> {
    step: S,
    dir: D,
    enable: E,
    clock: C,
    config: StepDirConfig,
    target: i32,
    position: i32,
    step_interval_us: u64,
    last_step_us: u64,
}

impl<S, D, E, C> StepDirAxis<S, D, E, C>
where
    S: OutputPin,
    D: OutputPin,
    E: OutputPin,
    C: Clock,
{
    /// Create an axis over the three control pins and a time source
    pub fn new(step: S, dir: D, enable: E, clock: C, config: StepDirConfig) -> Self {
        Self {
            step,
            dir,
            enable,
            clock,
            config,
            target: 0,
            position: 0,
            step_interval_us: 0,
            last_step_us: 0,
        }
    }
}

impl<S, D, E, C> StepperAxis for StepDirAxis<S, D, E, C>
where
    S: OutputPin,
    D: OutputPin,
    E: OutputPin,
    C: Clock,
{
    fn set_target(&mut self, target: i32) {
        self.target = target;
    }

    fn move_relative(&mut self, delta: i32) {
        self.target = self.position.saturating_add(delta);
    }

    fn set_speed(&mut self, steps_per_s: f32) {
        self.step_interval_us = if steps_per_s <= 0.0 {
            0
        } else {
            (1_000_000.0 / steps_per_s) as u64
        };
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
        if distance == 0 || self.step_interval_us == 0 {
            return false;
        }

        let now = self.clock.now_micros();
        if now.wrapping_sub(self.last_step_us) < self.step_interval_us {
            return false;
        }

        let forward = distance > 0;
        if forward != self.config.dir_inverted {
            self.dir.set_high().ok();
        } else {
            self.dir.set_low().ok();
        }

        // drivers latch on the rising edge; the low time until the next
        // poll satisfies any minimum pulse width at our step rates
        self.step.set_high().ok();
        self.step.set_low().ok();

        self.position += if forward { 1 } else { -1 };
        self.last_step_us = now;
        true
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.config.enable_inverted {
            self.enable.set_high().ok();
        } else {
            self.enable.set_low().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;

    /// (level, rising edge count) recorded behind a shared cell
    struct FakePin<'a>(&'a Cell<(bool, u32)>);

    impl embedded_hal::digital::ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for FakePin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let (_, edges) = self.0.get();
            self.0.set((false, edges));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let (high, edges) = self.0.get();
            self.0.set((true, if high { edges } else { edges + 1 }));
            Ok(())
        }
    }

    struct ManualClock<'a>(&'a Cell<u64>);

    impl Clock for ManualClock<'_> {
        fn now_micros(&self) -> u64 {
            self.0.get()
        }
    }

    struct Rig {
        step: Cell<(bool, u32)>,
        dir: Cell<(bool, u32)>,
        enable: Cell<(bool, u32)>,
        now: Cell<u64>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                step: Cell::new((false, 0)),
                dir: Cell::new((false, 0)),
                enable: Cell::new((false, 0)),
                now: Cell::new(1_000),
            }
        }

        fn axis(&self) -> StepDirAxis<FakePin<'_>, FakePin<'_>, FakePin<'_>, ManualClock<'_>> {
            StepDirAxis::new(
                FakePin(&self.step),
                FakePin(&self.dir),
                FakePin(&self.enable),
                ManualClock(&self.now),
                StepDirConfig::default(),
            )
        }

        fn step_edges(&self) -> u32 {
            self.step.get().1
        }
    }

    #[test]
    fn steps_are_paced_by_the_clock() {
        let rig = Rig::new();
        let mut axis = rig.axis();
        axis.set_target(3);
        axis.set_speed(1000.0); // one step per 1000us

        assert!(axis.advance()); // first poll fires immediately
        assert!(!axis.advance()); // same instant: not due yet
        assert_eq!(axis.current_position(), 1);

        rig.now.set(rig.now.get() + 999);
        assert!(!axis.advance());
        rig.now.set(rig.now.get() + 1);
        assert!(axis.advance());
        assert_eq!(axis.current_position(), 2);
        assert_eq!(rig.step_edges(), 2);
    }

    #[test]
    fn no_speed_means_no_motion() {
        let rig = Rig::new();
        let mut axis = rig.axis();
        axis.set_target(10);

        assert!(!axis.advance());
        assert_eq!(rig.step_edges(), 0);
    }

    #[test]
    fn direction_pin_follows_travel_sign() {
        let rig = Rig::new();
        let mut axis = rig.axis();
        axis.set_speed(1000.0);

        axis.set_target(1);
        axis.advance();
        assert!(rig.dir.get().0);

        rig.now.set(rig.now.get() + 2_000);
        axis.set_target(0);
        axis.advance();
        assert!(!rig.dir.get().0);
        assert_eq!(axis.current_position(), 0);
    }

    #[test]
    fn inverted_direction_pin_mirrors_the_motor() {
        let rig = Rig::new();
        let mut axis = StepDirAxis::new(
            FakePin(&rig.step),
            FakePin(&rig.dir),
            FakePin(&rig.enable),
            ManualClock(&rig.now),
            StepDirConfig {
                dir_inverted: true,
                ..Default::default()
            },
        );
        axis.set_speed(1000.0);
        axis.set_target(1);
        axis.advance();
        assert!(!rig.dir.get().0); // forward drives the pin low
    }

    #[test]
    fn enable_honors_active_low() {
        let rig = Rig::new();
        let mut axis = rig.axis();

        axis.set_enabled(true);
        assert!(!rig.enable.get().0); // active low EN

        axis.set_enabled(false);
        assert!(rig.enable.get().0);
    }
}
