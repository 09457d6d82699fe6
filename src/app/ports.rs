//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TimerService (domain)
//! ```
//!
//! Driven adapters (panel, PCM device, tick timer, event sinks)
//! implement these traits. The [`TimerService`](super::service::TimerService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Error contract: `DisplayPort::draw` and `CuePort::play` return typed
//! device errors; mid-run failures are logged and the tick's failing side
//! effect is skipped — they never abort the scheduler.

use crate::display::DisplayFrame;
use crate::error::DeviceError;

// ───────────────────────────────────────────────────────────────
// Display port (domain → panel)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the pixel panel.
///
/// `draw` must present the frame atomically from the viewer's
/// perspective — adapters that cannot do this natively must
/// double-buffer and swap.
pub trait DisplayPort {
    /// Panel width in pixels.
    fn width(&self) -> u32;

    /// Panel height in pixels.
    fn height(&self) -> u32;

    /// Draw one complete frame.
    fn draw(&mut self, frame: &DisplayFrame) -> Result<(), DeviceError>;

    /// Blank the panel. Must be called before the panel is released.
    fn clear(&mut self) -> Result<(), DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Cue port (domain → PCM device)
// ───────────────────────────────────────────────────────────────

/// Write-side port for audio playback.
pub trait CuePort {
    /// Write one cue's interleaved samples. Synchronous up to device
    /// acceptance; implementations must recover prior underrun state
    /// before writing and must complete (or fail) well within one tick
    /// period.
    fn play(&mut self, samples: &[i16]) -> Result<(), DeviceError>;

    /// Release the device handle. Idempotent.
    fn close(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Interval timer port (domain → tick source)
// ───────────────────────────────────────────────────────────────

/// Controls the repeating interval timer that produces tick events.
pub trait TimerPort {
    /// Arm the repeating timer. Arming while armed cancels the previous
    /// timer first, so at most one timer is ever armed.
    fn arm(&mut self);

    /// Disarm the timer. No-op when not armed.
    fn disarm(&mut self);

    /// Whether a timer is currently armed.
    fn is_armed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (log, test capture).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
