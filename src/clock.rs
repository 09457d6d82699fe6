//! Monotonic clock source.
//!
//! Wraps a monotonic time query (unaffected by wall-clock adjustments)
//! behind a plain `Timestamp` so the elapsed-seconds arithmetic is pure
//! and testable without real time passing. The subtraction carries the
//! classic timespec borrow: when the stop nanoseconds are smaller than
//! the start nanoseconds, borrow one second and add 1e9 ns.

use std::time::Instant;

/// Nanoseconds in one second.
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A monotonic point in time, split into whole seconds and nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub nanos: u32,
}

impl Timestamp {
    pub const fn new(secs: u64, nanos: u32) -> Self {
        Self { secs, nanos }
    }
}

/// Difference `stop - start` with nanosecond borrow.
///
/// Callers must pass `start <= stop`; the monotonic source guarantees
/// this for timestamps taken in order.
pub fn diff(start: Timestamp, stop: Timestamp) -> Timestamp {
    if stop.nanos < start.nanos {
        Timestamp {
            secs: stop.secs - start.secs - 1,
            nanos: stop.nanos + NANOS_PER_SEC - start.nanos,
        }
    } else {
        Timestamp {
            secs: stop.secs - start.secs,
            nanos: stop.nanos - start.nanos,
        }
    }
}

/// Whole seconds elapsed between two timestamps.
pub fn elapsed_seconds(start: Timestamp, now: Timestamp) -> u64 {
    diff(start, now).secs
}

/// Monotonic clock backed by [`std::time::Instant`].
///
/// Timestamps are offsets from an epoch captured at construction, which
/// keeps them small and strictly monotonic for the process lifetime.
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Current monotonic timestamp.
    pub fn now(&self) -> Timestamp {
        let d = self.epoch.elapsed();
        Timestamp {
            secs: d.as_secs(),
            nanos: d.subsec_nanos(),
        }
    }

    /// Milliseconds since construction, truncated to u32 for the
    /// debounce state machine (wraps after ~49 days, which the wrapping
    /// arithmetic in the button driver tolerates).
    pub fn now_ms(&self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_timestamps_give_zero() {
        let t = Timestamp::new(42, 500_000_000);
        assert_eq!(elapsed_seconds(t, t), 0);
    }

    #[test]
    fn plain_difference_no_borrow() {
        let start = Timestamp::new(10, 100);
        let stop = Timestamp::new(13, 200);
        let d = diff(start, stop);
        assert_eq!(d.secs, 3);
        assert_eq!(d.nanos, 100);
    }

    #[test]
    fn borrow_when_stop_nanos_smaller() {
        let start = Timestamp::new(10, 900_000_000);
        let stop = Timestamp::new(12, 100_000_000);
        let d = diff(start, stop);
        assert_eq!(d.secs, 1);
        assert_eq!(d.nanos, 200_000_000);
    }

    #[test]
    fn borrow_just_under_a_second() {
        let start = Timestamp::new(5, 999_999_999);
        let stop = Timestamp::new(6, 0);
        let d = diff(start, stop);
        assert_eq!(d.secs, 0);
        assert_eq!(d.nanos, 1);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        // elapsed between two immediate reads is far below one second
        assert_eq!(elapsed_seconds(a, b), 0);
    }
}
