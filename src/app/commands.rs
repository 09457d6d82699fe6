//! Inbound commands to the timer service.
//!
//! These represent actions requested by the outside world (buttons,
//! signals) that the [`TimerService`](super::service::TimerService)
//! interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the interval, or restart it if already running.
    Start,
    /// Acknowledge a button press without touching the timer
    /// (the press is surfaced through the event sink only).
    Acknowledge { pin: u8 },
    /// Begin the terminal shutdown transition.
    Stop,
}
