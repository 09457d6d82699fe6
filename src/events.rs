//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - the tick-timer thread (one event per interval period)
//! - the main loop itself (debounced presses, the shutdown request)
//!
//! The tick-timer thread and the main loop push concurrently, so the
//! queue is multi-producer. Events are consumed by the main loop alone,
//! one at a time; all counter and state mutation happens on the consumer
//! side, so the tick path and the reset path are serialized into a
//! single logical writer.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer thread │────▶│              │     │              │
//! │ GPIO edge    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Signal flag  │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types, ordered by rough priority.
/// Lower discriminant = higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Shutdown requested (interrupt signal observed).
    Shutdown = 0,
    /// Debounced press on the primary button.
    PrimaryPress = 1,
    /// Debounced press on the auxiliary button.
    AuxPress = 2,
    /// Interval timer fired.
    Tick = 10,
}

// ── Lock-free MPSC ring buffer ────────────────────────────────
//
// Producer threads write, the main loop reads. The buffer holds raw
// event discriminants in atomic cells; a producer claims its slot with
// a compare-exchange on `head`, so concurrent pushes never share a
// slot. An accepted push is never lost. When the queue is full, pushes
// are dropped rather than queued unboundedly — overlapping timer
// firings degrade to a single pending tick instead of a catch-up burst.

/// Slot sentinel: claimed but not yet written, or already consumed.
/// Distinct from every `Event` discriminant.
const SLOT_EMPTY: u8 = 0xFF;

pub struct EventQueue {
    head: AtomicU8,
    tail: AtomicU8,
    buf: [AtomicU8; EVENT_QUEUE_CAP],
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            buf: [const { AtomicU8::new(SLOT_EMPTY) }; EVENT_QUEUE_CAP],
        }
    }

    /// Push an event. Safe to call from any producer thread (lock-free).
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        loop {
            let head = self.head.load(Ordering::Relaxed);
            let tail = self.tail.load(Ordering::Acquire);
            let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

            if next_head == tail {
                return false; // Queue full — drop event.
            }

            // Claim the slot; on contention another producer advanced
            // `head` first, so retry with the new head.
            if self
                .head
                .compare_exchange_weak(head, next_head, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                self.buf[head as usize].store(event as u8, Ordering::Release);
                return true;
            }
        }
    }

    /// Pop the next event. Called from the main loop (single consumer).
    /// Returns `None` if the queue is empty, or if the next slot is
    /// claimed but the producer's write has not landed yet — the event
    /// is delivered on a later pass, never lost.
    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        let raw = self.buf[tail as usize].swap(SLOT_EMPTY, Ordering::Acquire);
        if raw == SLOT_EMPTY {
            return None; // Slot claimed, write still in flight.
        }

        self.tail
            .store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

        event_from_u8(raw)
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        tail == head
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Global instance ───────────────────────────────────────────
//
// Kept in a static so timer threads and GPIO callbacks can push
// without threading a handle through every adapter.

static QUEUE: EventQueue = EventQueue::new();

/// Push to the global queue. Safe from any producer context.
pub fn push_event(event: Event) -> bool {
    QUEUE.push(event)
}

/// Drain the global queue. Main loop only.
pub fn drain_events(handler: impl FnMut(Event)) {
    QUEUE.drain(handler);
}

/// Pending events in the global queue.
pub fn queue_len() -> usize {
    QUEUE.len()
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::Shutdown),
        1 => Some(Event::PrimaryPress),
        2 => Some(Event::AuxPress),
        10 => Some(Event::Tick),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let q = EventQueue::new();
        assert!(q.push(Event::Tick));
        assert!(q.push(Event::PrimaryPress));
        assert!(q.push(Event::Shutdown));
        assert_eq!(q.pop(), Some(Event::Tick));
        assert_eq!(q.pop(), Some(Event::PrimaryPress));
        assert_eq!(q.pop(), Some(Event::Shutdown));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let q = EventQueue::new();
        // Capacity is CAP - 1 (one slot distinguishes full from empty).
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(q.push(Event::Tick));
        }
        assert!(!q.push(Event::Tick));
        assert_eq!(q.len(), EVENT_QUEUE_CAP - 1);
    }

    #[test]
    fn drain_empties_in_order() {
        let q = EventQueue::new();
        q.push(Event::Tick);
        q.push(Event::Tick);
        q.push(Event::AuxPress);
        let mut seen = Vec::new();
        q.drain(|e| seen.push(e));
        assert_eq!(seen, vec![Event::Tick, Event::Tick, Event::AuxPress]);
        assert!(q.is_empty());
    }

    #[test]
    fn concurrent_producers_lose_no_accepted_events() {
        use core::sync::atomic::AtomicUsize;

        // Two producers hammer the queue while the consumer drains.
        // Every push that returned true must eventually be popped.
        let q = EventQueue::new();
        let accepted = AtomicUsize::new(0);
        let finished = AtomicUsize::new(0);
        let mut popped = 0usize;

        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    let mut mine = 0usize;
                    for _ in 0..50_000 {
                        if q.push(Event::Tick) {
                            mine += 1;
                        }
                    }
                    accepted.fetch_add(mine, Ordering::SeqCst);
                    finished.fetch_add(1, Ordering::SeqCst);
                });
            }

            loop {
                match q.pop() {
                    Some(_) => popped += 1,
                    None => {
                        if finished.load(Ordering::SeqCst) == 2 && q.is_empty() {
                            break;
                        }
                        std::thread::yield_now();
                    }
                }
            }
        });

        assert_eq!(popped, accepted.load(Ordering::SeqCst));
    }

    #[test]
    fn wraps_around_the_ring() {
        let q = EventQueue::new();
        for _ in 0..3 {
            for _ in 0..EVENT_QUEUE_CAP - 1 {
                assert!(q.push(Event::Tick));
            }
            let mut n = 0;
            q.drain(|_| n += 1);
            assert_eq!(n, EVENT_QUEUE_CAP - 1);
        }
    }
}
