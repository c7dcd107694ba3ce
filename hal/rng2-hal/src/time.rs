//! Monotonic time source
//!
//! Waits on external electrical conditions (a slave stretching the clock)
//! are bounded by a wall-clock deadline rather than a poll count, so the
//! bound does not depend on how fast the host spins.

/// Free-running microsecond clock
///
/// Must never go backwards. Wrapping is not handled; a 64-bit microsecond
/// counter outlives the hardware.
pub trait Monotonic {
    /// Current time in microseconds since an arbitrary epoch
    fn now_micros(&self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Point in time after which a bounded wait gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at_micros: u64,
}

impl Deadline {
    /// Deadline `micros` microseconds from now
    pub fn after<C: Monotonic>(clock: &C, micros: u32) -> Self {
        Self {
            at_micros: clock.now_micros().saturating_add(micros as u64),
        }
    }

    /// Check if the deadline has passed
    pub fn expired<C: Monotonic>(&self, clock: &C) -> bool {
        clock.now_micros() >= self.at_micros
    }

    /// Absolute expiry time in microseconds
    pub fn at_micros(&self) -> u64 {
        self.at_micros
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Monotonic for EmbassyClock {
    fn now_micros(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Clock that only moves when told to
    struct ManualClock {
        now: Cell<u64>,
    }

    impl ManualClock {
        fn new(start: u64) -> Self {
            Self {
                now: Cell::new(start),
            }
        }

        fn advance(&self, micros: u64) {
            self.now.set(self.now.get() + micros);
        }
    }

    impl Monotonic for ManualClock {
        fn now_micros(&self) -> u64 {
            self.now.get()
        }
    }

    #[test]
    fn test_deadline_expiry() {
        let clock = ManualClock::new(1_000);
        let deadline = Deadline::after(&clock, 500);

        assert_eq!(deadline.at_micros(), 1_500);
        assert!(!deadline.expired(&clock));

        clock.advance(499);
        assert!(!deadline.expired(&clock));

        clock.advance(1);
        assert!(deadline.expired(&clock));
    }

    #[test]
    fn test_zero_deadline_is_already_expired() {
        let clock = ManualClock::new(42);
        let deadline = Deadline::after(&clock, 0);
        assert!(deadline.expired(&clock));
    }

    #[test]
    fn test_deadline_saturates() {
        let clock = ManualClock::new(u64::MAX - 10);
        let deadline = Deadline::after(&clock, 1_000);
        assert_eq!(deadline.at_micros(), u64::MAX);
    }

    #[test]
    fn test_reference_is_a_clock() {
        let clock = ManualClock::new(7);
        let by_ref = &clock;
        assert_eq!(by_ref.now_micros(), 7);
    }
}
