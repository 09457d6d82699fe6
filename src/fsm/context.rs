//! Shared mutable context threaded through every FSM handler.
//!
//! `TickContext` is the single struct that state handlers read from and
//! write to: the elapsed counter, the pending-tick flag set by the event
//! loop, the configuration, and the command outputs the service applies
//! to the ports after each FSM step. All mutation happens on the event
//! loop consumer, so the tick path and the reset path never interleave.

use crate::config::{CountDirection, TimerConfig};

// ---------------------------------------------------------------------------
// Command outputs (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Side effects requested by state handlers.
///
/// Every field is a one-shot pulse: the service consumes each after
/// applying it, so a pass with no transition and no pending tick
/// performs no device or timer I/O. Disarm is applied before arm, so a
/// re-entry that sets both restarts the period from scratch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCommands {
    /// Arm the interval timer (re-arming restarts the period).
    pub arm_timer: bool,
    /// Disarm the interval timer.
    pub disarm_timer: bool,
    /// Value to draw on the panel this pass, if any.
    pub render: Option<u32>,
    /// Play the audio cue this pass.
    pub play_cue: bool,
}

// ---------------------------------------------------------------------------
// TickContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct TickContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Counter --
    /// Elapsed whole seconds since the last reset. Only tick and reset
    /// handlers write this, and both run on the event-loop consumer.
    pub counter: u32,

    // -- Event input --
    /// Set by the event loop when a timer firing is pending; consumed by
    /// the Running update handler.
    pub tick_pending: bool,

    // -- Command outputs --
    pub commands: TickCommands,

    // -- Configuration --
    pub config: TimerConfig,
}

impl TickContext {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            counter: config.start_value,
            tick_pending: false,
            commands: TickCommands::default(),
            config,
        }
    }

    /// Move the counter one tick in the configured direction.
    /// Count-up wraps at the display bound; count-down clamps at zero.
    pub fn advance_counter(&mut self) {
        self.counter = match self.config.direction {
            CountDirection::Up => (self.counter + 1) % self.config.display_wrap_seconds,
            CountDirection::Down => self.counter.saturating_sub(1),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_up_wraps_at_bound() {
        let mut ctx = TickContext::new(TimerConfig::default());
        ctx.counter = 999;
        ctx.advance_counter();
        assert_eq!(ctx.counter, 0);
    }

    #[test]
    fn count_down_clamps_at_zero() {
        let config = TimerConfig {
            direction: CountDirection::Down,
            start_value: 2,
            ..TimerConfig::default()
        };
        let mut ctx = TickContext::new(config);
        ctx.advance_counter();
        ctx.advance_counter();
        assert_eq!(ctx.counter, 0);
        ctx.advance_counter();
        assert_eq!(ctx.counter, 0);
    }
}
