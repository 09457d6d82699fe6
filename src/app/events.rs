//! Outbound application events.
//!
//! The [`TimerService`](super::service::TimerService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log them, capture them in tests.

use crate::error::DeviceError;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The run state changed.
    StateChanged { from: StateId, to: StateId },

    /// A tick was announced: this value went to the display and the cue
    /// was requested.
    TickAnnounced { counter: u32 },

    /// A button press was acknowledged without resetting the interval.
    PressAcknowledged { pin: u8 },

    /// The display side effect of a tick was skipped.
    RenderSkipped(DeviceError),

    /// The audio side effect of a tick was skipped.
    CueSkipped(DeviceError),
}
