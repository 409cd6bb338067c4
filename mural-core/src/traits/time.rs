//! Monotonic time source
//!
//! Step pacing needs microsecond timestamps but the core cannot assume a
//! particular timer peripheral. Implementations wrap whatever the platform
//! provides (`embassy_time::Instant` on the firmware, a hand-advanced
//! counter in tests).

/// Monotonic microsecond clock
pub trait Clock {
    /// Microseconds since an arbitrary epoch
    fn now_micros(&self) -> u64;
}
