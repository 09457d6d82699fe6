//! Repeating interval timer.
//!
//! A background thread that pushes [`Event::Tick`] into the lock-free
//! queue once per period, with the initial delay equal to the period.
//! Successive deadlines step from the schedule, not from the wake-up
//! time, so sleep jitter never accumulates as drift across ticks. The
//! thread does no other work; all tick processing happens on the
//! main-loop consumer, so a slow tick can never overlap another — at
//! worst the queue holds a pending tick, and the full-queue drop policy
//! bounds the backlog.
//!
//! Arming is idempotent: `arm()` always stops any previous worker before
//! starting a fresh one, so at most one timer is armed at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::app::ports::TimerPort;
use crate::events::{Event, push_event};

/// Granularity of the stop-flag poll inside the worker's sleep.
/// Bounds how long `disarm()` blocks waiting for the thread to exit.
const STOP_POLL_MS: u64 = 10;

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct TickTimer {
    period: Duration,
    worker: Option<Worker>,
}

impl TickTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            worker: None,
        }
    }

    /// Sleep until `deadline` in short slices, returning early when
    /// `stop` is set. Returns `true` if the deadline was reached.
    fn sleep_until(deadline: Instant, stop: &AtomicBool) -> bool {
        let slice = Duration::from_millis(STOP_POLL_MS);
        loop {
            if stop.load(Ordering::Acquire) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(slice));
        }
    }

    /// The deadline after `prev`: one period later on the schedule,
    /// regardless of how late the wake-up was. An overrun of a full
    /// period or more skips the missed slots instead of replaying them
    /// as a burst.
    fn next_deadline(prev: Instant, now: Instant, period: Duration) -> Instant {
        let next = prev + period;
        if next <= now { now + period } else { next }
    }
}

impl TimerPort for TickTimer {
    fn arm(&mut self) {
        // Re-arming cancels the previous timer first.
        self.disarm();

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let period = self.period;

        let handle = std::thread::spawn(move || {
            // Initial delay equals the period: the first tick fires one
            // full interval after arming.
            let mut deadline = Instant::now() + period;
            while Self::sleep_until(deadline, &thread_stop) {
                if !push_event(Event::Tick) {
                    debug!("tick timer: queue full, tick dropped");
                }
                deadline = Self::next_deadline(deadline, Instant::now(), period);
            }
        });

        info!("tick timer armed ({} ms period)", period.as_millis());
        self.worker = Some(Worker { stop, handle });
    }

    fn disarm(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Release);
            // The worker wakes within one poll slice; joining is bounded.
            let _ = worker.handle.join();
            info!("tick timer disarmed");
        }
    }

    fn is_armed(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
