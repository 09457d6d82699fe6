//! GymTimer — Main Entry Point
//!
//! Lifecycle controller for the interval announcer. Hexagonal layout
//! with event-driven execution:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  MatrixPanel     AlsaCuePlayer    InputWatcher   LogEventSink│
//! │  (DisplayPort)   (CuePort)        (GPIO edges)   (EventSink) │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            TimerService (pure logic)               │      │
//! │  │  FSM · counter · cue buffer                        │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  TickTimer (TimerPort) · EventQueue (MPSC) · signal flag     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Acquisition order: signal handlers → config → input → display →
//! audio → service. Teardown runs the reverse once Stopping is observed,
//! never concurrently with a tick.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use gymtimer::adapters::log_sink::LogEventSink;
use gymtimer::app::commands::Command;
use gymtimer::app::ports::{CuePort, DisplayPort};
use gymtimer::app::service::TimerService;
use gymtimer::clock::MonotonicClock;
use gymtimer::config::{ButtonAction, TimerConfig};
use gymtimer::cue::PlaybackBuffer;
use gymtimer::drivers::button::ButtonDriver;
use gymtimer::drivers::gpio::InputWatcher;
use gymtimer::drivers::panel::MatrixPanel;
use gymtimer::drivers::pcm::AlsaCuePlayer;
use gymtimer::drivers::tick_timer::TickTimer;
use gymtimer::events::{self, Event, push_event};
use gymtimer::fsm::StateId;

/// Main loop poll granularity. Bounds button and shutdown latency
/// without spinning; all timing-sensitive work is event-driven.
const POLL_INTERVAL_MS: u64 = 10;

fn command_for(action: ButtonAction, pin: u8) -> Command {
    match action {
        ButtonAction::Restart => Command::Start,
        ButtonAction::LogOnly => Command::Acknowledge { pin },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    info!("gymtimer v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Signal handlers — installed before any resource so an
    //       interrupt during slow acquisition still shuts down cleanly.
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))
        .context("installing SIGINT handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))
        .context("installing SIGTERM handler")?;

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading config from '{}'", path);
            TimerConfig::from_json_file(&path).context("loading config")?
        }
        None => {
            let config = TimerConfig::default();
            config.validate().context("validating default config")?;
            config
        }
    };

    let clock = Arc::new(MonotonicClock::new());

    // ── 3. Input capability ───────────────────────────────────
    let mut primary = ButtonDriver::new(config.primary_button_pin, config.debounce_ms);
    let mut aux = ButtonDriver::new(config.aux_button_pin, config.debounce_ms);
    let watcher = InputWatcher::watch(&[&primary, &aux], Arc::clone(&clock))
        .context("claiming button pins")?;

    // ── 4. Display capability (panel + font) ──────────────────
    let mut panel = MatrixPanel::open(&config).context("initializing panel")?;

    // ── 5. Audio capability (buffer first, then device) ───────
    let buffer = PlaybackBuffer::load(
        Path::new(&config.cue_path),
        config.cue_header_bytes,
        config.channels,
    )
    .context("loading cue asset")?;
    info!(
        "cue '{}' loaded: {} frames",
        config.cue_path,
        buffer.frames()
    );
    let mut cue = AlsaCuePlayer::open(&config).context("opening PCM device")?;

    // ── 6. Scheduler ──────────────────────────────────────────
    let mut timer = TickTimer::new(Duration::from_millis(u64::from(config.tick_interval_ms)));
    let mut sink = LogEventSink::new();
    let mut service = TimerService::new(config.clone(), buffer);
    service.start(&mut panel, &mut cue, &mut sink);

    info!("ready: waiting for start button (pin {})", primary.pin());

    // ── 7. Event loop ─────────────────────────────────────────
    loop {
        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));

        // The signal handler only sets the flag; the Stopping transition
        // runs here, on the consumer, via the queue.
        if stop.load(Ordering::Acquire) && service.state() != StateId::Stopping {
            push_event(Event::Shutdown);
        }

        // Button debounce runs on the main loop; callbacks only stamped
        // the edge slots.
        let now_ms = clock.now_ms();
        if let Some(press) = primary.tick(now_ms) {
            debug!("primary press on pin {}", press.pin);
            push_event(Event::PrimaryPress);
        }
        if let Some(press) = aux.tick(now_ms) {
            debug!("aux press on pin {}", press.pin);
            push_event(Event::AuxPress);
        }

        // Process all pending events. Multiple queued ticks collapse
        // into one so a slow pass never causes a catch-up burst.
        let mut tick_done = false;
        events::drain_events(|event| match event {
            Event::Tick => {
                if tick_done {
                    debug!("coalesced extra tick");
                } else {
                    service.on_tick(&mut panel, &mut cue, &mut sink);
                    tick_done = true;
                }
            }
            Event::PrimaryPress => {
                let cmd = command_for(config.primary_button_action, config.primary_button_pin);
                service.handle_command(cmd, &mut panel, &mut cue, &mut timer, &mut sink);
            }
            Event::AuxPress => {
                let cmd = command_for(config.aux_button_action, config.aux_button_pin);
                service.handle_command(cmd, &mut panel, &mut cue, &mut timer, &mut sink);
            }
            Event::Shutdown => {
                service.handle_command(Command::Stop, &mut panel, &mut cue, &mut timer, &mut sink);
            }
        });

        if service.state() == StateId::Stopping {
            break;
        }
    }

    // ── 8. Teardown — reverse of acquisition. Errors here are logged
    //       and swallowed; the process still exits cleanly.
    info!("shutting down");
    if let Err(e) = panel.clear() {
        warn!("panel clear on shutdown failed: {}", e);
    }
    drop(panel);
    drop(service); // frees the playback buffer before the device closes
    cue.close();
    drop(cue);
    drop(timer);
    drop(watcher);
    info!("shutdown complete");
    Ok(())
}
