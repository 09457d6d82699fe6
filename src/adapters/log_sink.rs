//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger. A future telemetry adapter would implement the same
//! trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::TickAnnounced { counter } => {
                info!("TICK  | counter={}", counter);
            }
            AppEvent::PressAcknowledged { pin } => {
                info!("PRESS | pin={} (acknowledge only)", pin);
            }
            AppEvent::RenderSkipped(e) => {
                warn!("SKIP  | render: {}", e);
            }
            AppEvent::CueSkipped(e) => {
                warn!("SKIP  | cue: {}", e);
            }
        }
    }
}
