//! Timer service — the hexagonal core.
//!
//! [`TimerService`] owns the FSM, the shared tick context, and the
//! immutable playback buffer. It exposes a clean, hardware-agnostic API;
//! all I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  events ──▶ ┌──────────────────────────┐ ──▶ DisplayPort
//!             │       TimerService        │ ──▶ CuePort
//!  Command ──▶│  FSM · counter · buffer   │ ──▶ TimerPort
//!             └──────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Every entry point runs on the event-loop consumer, so counter updates
//! from the tick path and resets from the button path are serialized:
//! a reset accepted while a tick is queued applies strictly after that
//! tick's counter update completes.

use log::{info, warn};

use crate::config::TimerConfig;
use crate::cue::PlaybackBuffer;
use crate::display::{DisplayFrame, FrameStyle};
use crate::fsm::context::TickContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{CuePort, DisplayPort, EventSink, TimerPort};

// ───────────────────────────────────────────────────────────────
// TimerService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct TimerService {
    fsm: Fsm,
    ctx: TickContext,
    style: FrameStyle,
    /// Loaded once at startup; read-only thereafter.
    buffer: PlaybackBuffer,
}

impl TimerService {
    /// Construct the service from configuration and the preloaded cue.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: TimerConfig, buffer: PlaybackBuffer) -> Self {
        let style = FrameStyle::from_config(&config);
        let ctx = TickContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);
        Self {
            fsm,
            ctx,
            style,
            buffer,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle and draw the resting value.
    pub fn start(
        &mut self,
        display: &mut impl DisplayPort,
        cue: &mut impl CuePort,
        sink: &mut impl EventSink,
    ) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("TimerService started in {:?}", self.fsm.current_state());
        self.apply_side_effects(display, cue, sink);
    }

    // ── Tick processing ───────────────────────────────────────

    /// Process one timer firing: advance the counter, then run the
    /// display and audio side effects. The two side effects are
    /// independent — a device error in one is logged and skipped while
    /// the other still runs, and the scheduler continues.
    pub fn on_tick(
        &mut self,
        display: &mut impl DisplayPort,
        cue: &mut impl CuePort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.tick_pending = true;
        self.fsm.step(&mut self.ctx);

        if self.fsm.current_state() == StateId::Running {
            sink.emit(&AppEvent::TickAnnounced {
                counter: self.ctx.counter,
            });
        }
        self.apply_side_effects(display, cue, sink);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button press, shutdown signal).
    pub fn handle_command(
        &mut self,
        cmd: Command,
        display: &mut impl DisplayPort,
        cue: &mut impl CuePort,
        timer: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::Start => match self.fsm.current_state() {
                StateId::Idle => {
                    self.fsm.force_transition(StateId::Running, &mut self.ctx);
                    sink.emit(&AppEvent::StateChanged {
                        from: StateId::Idle,
                        to: StateId::Running,
                    });
                }
                StateId::Running => {
                    // Idempotent re-arm: the exit pulse disarms, the
                    // enter pulse arms fresh. The reenter runs after any
                    // tick already drained this pass, never between its
                    // counter update and its render.
                    self.fsm.reenter(&mut self.ctx);
                }
                StateId::Stopping => {
                    info!("Start ignored: already stopping");
                }
            },
            Command::Acknowledge { pin } => {
                info!("Button on pin {} acknowledged (no reset)", pin);
                sink.emit(&AppEvent::PressAcknowledged { pin });
            }
            Command::Stop => {
                let prev = self.fsm.current_state();
                if prev != StateId::Stopping {
                    self.fsm.force_transition(StateId::Stopping, &mut self.ctx);
                    sink.emit(&AppEvent::StateChanged {
                        from: prev,
                        to: StateId::Stopping,
                    });
                }
                // A second stop while stopping is a no-op.
            }
        }
        self.apply_timer_pulses(timer);
        self.apply_side_effects(display, cue, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current run state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Current counter value.
    pub fn counter(&self) -> u32 {
        self.ctx.counter
    }

    /// The loaded cue buffer (read-only).
    pub fn buffer(&self) -> &PlaybackBuffer {
        &self.buffer
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drain the timer pulses set by state handlers. Disarm runs before
    /// arm so a re-entry restarts the period from scratch. Only state
    /// transitions set these, and transitions only happen in
    /// `handle_command`, where the port is in scope.
    fn apply_timer_pulses(&mut self, timer: &mut impl TimerPort) {
        if core::mem::take(&mut self.ctx.commands.disarm_timer) {
            timer.disarm();
        }
        if core::mem::take(&mut self.ctx.commands.arm_timer) {
            timer.arm();
        }
    }

    /// Drain the one-shot render and cue pulses into port calls.
    fn apply_side_effects(
        &mut self,
        display: &mut impl DisplayPort,
        cue: &mut impl CuePort,
        sink: &mut impl EventSink,
    ) {
        if let Some(value) = self.ctx.commands.render.take() {
            let frame = DisplayFrame::new(value, self.style);
            if let Err(e) = display.draw(&frame) {
                warn!("render skipped this tick: {}", e);
                sink.emit(&AppEvent::RenderSkipped(e));
            }
        }

        if core::mem::take(&mut self.ctx.commands.play_cue) {
            let samples = self
                .buffer
                .play_slice(self.ctx.config.cue_frames_limit);
            if let Err(e) = cue.play(samples) {
                warn!("cue skipped this tick: {}", e);
                sink.emit(&AppEvent::CueSkipped(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;

    struct NullDisplay;
    impl DisplayPort for NullDisplay {
        fn width(&self) -> u32 {
            64
        }
        fn height(&self) -> u32 {
            64
        }
        fn draw(&mut self, _frame: &DisplayFrame) -> Result<(), DeviceError> {
            Ok(())
        }
        fn clear(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }
    }

    struct NullCue;
    impl CuePort for NullCue {
        fn play(&mut self, _samples: &[i16]) -> Result<(), DeviceError> {
            Ok(())
        }
        fn close(&mut self) {}
    }

    struct NullTimer {
        armed: bool,
    }
    impl TimerPort for NullTimer {
        fn arm(&mut self) {
            self.armed = true;
        }
        fn disarm(&mut self) {
            self.armed = false;
        }
        fn is_armed(&self) -> bool {
            self.armed
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn starts_idle_with_reset_counter() {
        let cfg = TimerConfig::default();
        let mut svc = TimerService::new(cfg, PlaybackBuffer::from_samples(vec![0; 4], 2));
        svc.start(&mut NullDisplay, &mut NullCue, &mut NullSink);
        assert_eq!(svc.state(), StateId::Idle);
        assert_eq!(svc.counter(), 0);
    }

    #[test]
    fn stop_is_terminal_and_reentrant() {
        let cfg = TimerConfig::default();
        let mut svc = TimerService::new(cfg, PlaybackBuffer::from_samples(vec![0; 4], 2));
        let mut timer = NullTimer { armed: false };
        svc.start(&mut NullDisplay, &mut NullCue, &mut NullSink);
        svc.handle_command(
            Command::Start,
            &mut NullDisplay,
            &mut NullCue,
            &mut timer,
            &mut NullSink,
        );
        assert!(timer.is_armed());

        svc.handle_command(
            Command::Stop,
            &mut NullDisplay,
            &mut NullCue,
            &mut timer,
            &mut NullSink,
        );
        assert_eq!(svc.state(), StateId::Stopping);
        assert!(!timer.is_armed());

        // Second stop: no-op, still Stopping, still disarmed.
        svc.handle_command(
            Command::Stop,
            &mut NullDisplay,
            &mut NullCue,
            &mut timer,
            &mut NullSink,
        );
        assert_eq!(svc.state(), StateId::Stopping);
        assert!(!timer.is_armed());

        // Start after stop is ignored.
        svc.handle_command(
            Command::Start,
            &mut NullDisplay,
            &mut NullCue,
            &mut timer,
            &mut NullSink,
        );
        assert_eq!(svc.state(), StateId::Stopping);
        assert!(!timer.is_armed());
    }
}
