//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[start event]──▶ RUNNING ──[start event]──▶ RUNNING (re-arm)
//!                             │  ▲
//!                      [tick] └──┘
//!
//!  Any state ──[interrupt]──▶ STOPPING (terminal)
//! ```
//!
//! Transitions on external events (start press, shutdown) are driven by
//! the service via `force_transition`/`reenter`; the update handlers only
//! consume pending ticks.

use super::context::TickContext;
use super::{StateDescriptor, StateId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
        // Index 2 — Stopping
        StateDescriptor {
            id: StateId::Stopping,
            name: "Stopping",
            on_enter: Some(stopping_enter),
            on_exit: None,
            on_update: stopping_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — timer disarmed, waiting for a start event
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut TickContext) {
    ctx.commands.disarm_timer = true;
    // Show the resting value so the panel isn't blank before the first start.
    ctx.commands.render = Some(ctx.config.start_value);
    info!("IDLE: waiting for start, showing {}", ctx.config.start_value);
}

fn idle_update(ctx: &mut TickContext) -> Option<StateId> {
    // A tick firing with no timer armed is a late delivery from a timer
    // that was just disarmed; drop it.
    if ctx.tick_pending {
        debug!("IDLE: dropping stray tick");
        ctx.tick_pending = false;
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state — timer armed, counting
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut TickContext) {
    // Reset before arming: no tick may observe a value from a prior run.
    ctx.counter = ctx.config.start_value;
    ctx.tick_pending = false;
    ctx.commands.arm_timer = true;
    ctx.commands.render = Some(ctx.counter);
    info!("RUNNING: counter reset to {}, timer armed", ctx.counter);
}

fn running_exit(ctx: &mut TickContext) {
    // Leaving Running always disarms; re-entry re-arms fresh.
    ctx.commands.disarm_timer = true;
}

fn running_update(ctx: &mut TickContext) -> Option<StateId> {
    if ctx.tick_pending {
        ctx.tick_pending = false;
        ctx.advance_counter();
        // Display and audio are independent side effects of one tick;
        // the service applies each even if the other fails.
        ctx.commands.render = Some(ctx.counter);
        ctx.commands.play_cue = true;
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPING state — terminal
// ═══════════════════════════════════════════════════════════════════════════

fn stopping_enter(ctx: &mut TickContext) {
    ctx.commands.disarm_timer = true;
    ctx.commands.arm_timer = false;
    ctx.commands.render = None;
    ctx.commands.play_cue = false;
    info!("STOPPING: timer disarmed, teardown next");
}

fn stopping_update(ctx: &mut TickContext) -> Option<StateId> {
    // Terminal: swallow any late deliveries.
    ctx.tick_pending = false;
    None
}
