//! Property-based tests for the pure arithmetic paths: elapsed-time
//! subtraction, count formatting, counter advancement, and the event
//! ring.

use proptest::prelude::*;

use gymtimer::clock::{Timestamp, diff, elapsed_seconds};
use gymtimer::config::{CountDirection, TimerConfig};
use gymtimer::display::{COUNT_WIDTH, format_count};
use gymtimer::events::{Event, EventQueue};
use gymtimer::fsm::context::TickContext;

const NANOS_PER_SEC: u128 = 1_000_000_000;

proptest! {
    // ── clock ─────────────────────────────────────────────────

    /// The borrow-based subtraction agrees with exact integer
    /// nanosecond arithmetic for every ordered pair of timestamps.
    #[test]
    fn diff_matches_integer_nanoseconds(
        start_secs in 0u64..100_000,
        start_nanos in 0u32..1_000_000_000,
        delta_secs in 0u64..100_000,
        delta_nanos in 0u32..1_000_000_000,
    ) {
        let start = Timestamp::new(start_secs, start_nanos);
        let stop_total = (u128::from(start_secs) * NANOS_PER_SEC
            + u128::from(start_nanos))
            + (u128::from(delta_secs) * NANOS_PER_SEC + u128::from(delta_nanos));
        let stop = Timestamp::new(
            (stop_total / NANOS_PER_SEC) as u64,
            (stop_total % NANOS_PER_SEC) as u32,
        );

        let d = diff(start, stop);
        let expect = u128::from(delta_secs) * NANOS_PER_SEC + u128::from(delta_nanos);
        prop_assert_eq!(
            u128::from(d.secs) * NANOS_PER_SEC + u128::from(d.nanos),
            expect
        );
        prop_assert!(d.nanos < 1_000_000_000);
    }

    #[test]
    fn elapsed_seconds_truncates_toward_zero(
        secs in 0u64..1000,
        nanos in 0u32..1_000_000_000,
        extra in 0u64..1000,
    ) {
        let start = Timestamp::new(secs, nanos);
        let stop = Timestamp::new(secs + extra, nanos);
        prop_assert_eq!(elapsed_seconds(start, stop), extra);
        // Falling one nanosecond short of the boundary loses the
        // whole second.
        if nanos > 0 && extra > 0 {
            let just_under = Timestamp::new(secs + extra, nanos - 1);
            prop_assert_eq!(elapsed_seconds(start, just_under), extra - 1);
        }
    }

    // ── display ───────────────────────────────────────────────

    #[test]
    fn format_count_is_right_justified_and_parses_back(value in 0u32..100_000) {
        let text = format_count(value);
        let s = text.as_str();
        prop_assert!(s.len() >= COUNT_WIDTH);
        // Padding is all spaces, then the digits.
        let trimmed = s.trim_start();
        prop_assert!(trimmed.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(trimmed.parse::<u32>().unwrap(), value);
        // No leading-space drift between equal values.
        prop_assert_eq!(format_count(value), text);
    }

    // ── counter ───────────────────────────────────────────────

    /// Counting up from zero, N ticks land on N mod the wrap bound.
    #[test]
    fn count_up_is_ticks_mod_wrap(wrap in 1u32..2000, ticks in 0u32..5000) {
        let config = TimerConfig {
            display_wrap_seconds: wrap,
            start_value: 0,
            ..TimerConfig::default()
        };
        let mut ctx = TickContext::new(config);
        for _ in 0..ticks {
            ctx.advance_counter();
        }
        prop_assert_eq!(ctx.counter, ticks % wrap);
    }

    /// Counting down, N ticks land on start minus N, floored at zero.
    #[test]
    fn count_down_saturates_at_zero(start in 0u32..500, ticks in 0u32..1000) {
        let config = TimerConfig {
            direction: CountDirection::Down,
            display_wrap_seconds: 1000,
            start_value: start.min(999),
            ..TimerConfig::default()
        };
        let start_value = config.start_value;
        let mut ctx = TickContext::new(config);
        for _ in 0..ticks {
            ctx.advance_counter();
        }
        prop_assert_eq!(ctx.counter, start_value.saturating_sub(ticks));
    }

    // ── event queue ───────────────────────────────────────────

    /// Any sequence that fits the ring pops back in push order.
    #[test]
    fn queue_preserves_fifo_order(raw in proptest::collection::vec(0u8..4, 0..31)) {
        let events: Vec<Event> = raw
            .iter()
            .map(|v| match v {
                0 => Event::Shutdown,
                1 => Event::PrimaryPress,
                2 => Event::AuxPress,
                _ => Event::Tick,
            })
            .collect();

        let q = EventQueue::new();
        for e in &events {
            prop_assert!(q.push(*e));
        }
        let mut seen = Vec::new();
        q.drain(|e| seen.push(e));
        prop_assert_eq!(seen, events);
        prop_assert!(q.is_empty());
    }
}
