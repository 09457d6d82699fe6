//! Debounced button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up bias: unpressed reads high,
//! a press pulls the pin low and fires a falling-edge callback. The
//! callback only records the raw edge timestamp into a shared atomic —
//! no blocking I/O, no state transitions in callback context. The
//! `tick()` method, called from the main loop, runs the debounce filter
//! and emits at most one press per quiet interval.
//!
//! ## Debounce
//!
//! A minimum inter-event interval: the first edge is accepted
//! immediately, then further edges are swallowed until `debounce_ms` of
//! quiet has passed. Contact bounce therefore produces exactly one press.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A debounced press. What the press *does* is the event loop's call,
/// made from configuration when the press is drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub pin: u8,
}

/// Shared edge slot: written by the GPIO callback, read by `tick()`.
/// Holds the millisecond timestamp of the most recent falling edge
/// (0 = no edge seen yet).
pub type EdgeSlot = Arc<AtomicU32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    /// Ready to accept the next edge.
    Armed,
    /// An edge was accepted; further edges are bounce until the quiet
    /// interval elapses.
    Cooldown { accepted_ms: u32 },
}

pub struct ButtonDriver {
    pin: u8,
    debounce_ms: u32,
    edge: EdgeSlot,
    last_edge_ms: u32,
    state: DebounceState,
}

impl ButtonDriver {
    pub fn new(pin: u8, debounce_ms: u32) -> Self {
        Self {
            pin,
            debounce_ms,
            edge: Arc::new(AtomicU32::new(0)),
            last_edge_ms: 0,
            state: DebounceState::Armed,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Handle for the edge callback: the callback stores the current
    /// monotonic millisecond timestamp here on every falling edge.
    /// Lock-free, safe from callback context.
    pub fn edge_slot(&self) -> EdgeSlot {
        Arc::clone(&self.edge)
    }

    /// Call from the main loop each pass. `now_ms` is the current
    /// monotonic time in milliseconds (same epoch as the edge callback).
    /// Returns a press when a debounced edge has been accepted.
    pub fn tick(&mut self, now_ms: u32) -> Option<Press> {
        let edge_ms = self.edge.load(Ordering::Acquire);
        let new_edge = edge_ms != self.last_edge_ms && edge_ms != 0;
        if new_edge {
            self.last_edge_ms = edge_ms;
        }

        match self.state {
            DebounceState::Armed => {
                if new_edge {
                    self.state = DebounceState::Cooldown { accepted_ms: now_ms };
                    return Some(Press { pin: self.pin });
                }
                None
            }
            DebounceState::Cooldown { accepted_ms } => {
                if new_edge {
                    // Bounce: swallow and restart the quiet interval.
                    self.state = DebounceState::Cooldown { accepted_ms: now_ms };
                } else if now_ms.wrapping_sub(accepted_ms) >= self.debounce_ms {
                    self.state = DebounceState::Armed;
                }
                None
            }
        }
    }
}

/// Store a raw edge timestamp into a slot. This is the entire body of
/// the GPIO callback path — safe from any context.
pub fn record_edge(slot: &EdgeSlot, now_ms: u32) {
    slot.store(now_ms, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> ButtonDriver {
        ButtonDriver::new(10, 50)
    }

    #[test]
    fn no_press_without_edge() {
        let mut btn = driver();
        assert_eq!(btn.tick(100), None);
        assert_eq!(btn.tick(200), None);
    }

    #[test]
    fn single_edge_emits_one_press() {
        let mut btn = driver();
        let slot = btn.edge_slot();
        record_edge(&slot, 100);
        assert_eq!(btn.tick(100), Some(Press { pin: 10 }));
        // Same edge seen again: nothing.
        assert_eq!(btn.tick(110), None);
    }

    #[test]
    fn bounce_within_debounce_window_swallowed() {
        let mut btn = driver();
        let slot = btn.edge_slot();
        record_edge(&slot, 100);
        assert!(btn.tick(100).is_some());
        // Contact bounce: edges at 105, 120, 140 ms.
        record_edge(&slot, 105);
        assert_eq!(btn.tick(105), None);
        record_edge(&slot, 120);
        assert_eq!(btn.tick(120), None);
        record_edge(&slot, 140);
        assert_eq!(btn.tick(140), None);
    }

    #[test]
    fn press_after_quiet_interval_accepted() {
        let mut btn = driver();
        let slot = btn.edge_slot();
        record_edge(&slot, 100);
        assert!(btn.tick(100).is_some());
        // Quiet passes, cooldown re-arms.
        assert_eq!(btn.tick(160), None);
        // Distinct press well after.
        record_edge(&slot, 300);
        assert!(btn.tick(300).is_some());
    }

    #[test]
    fn press_reports_its_pin() {
        let mut btn = ButtonDriver::new(9, 50);
        let slot = btn.edge_slot();
        record_edge(&slot, 42);
        assert_eq!(btn.tick(42).unwrap().pin, 9);
    }
}
