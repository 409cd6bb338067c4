//! Time source for step pacing

use embassy_time::Instant;
use mural_core::traits::Clock;

/// Microsecond clock over the Embassy uptime timer
#[derive(Debug, Clone, Copy)]
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
