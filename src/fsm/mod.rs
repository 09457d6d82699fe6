//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  StateTable                                            │
//! │  ┌──────────┬───────────┬──────────┬─────────────────┐ │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update       │ │
//! │  ├──────────┼───────────┼──────────┼─────────────────┤ │
//! │  │ Idle     │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Running  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Stopping │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  └──────────┴───────────┴──────────┴─────────────────┘ │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Each step the engine calls `on_update` for the **current** state. If
//! it returns `Some(next_id)` the engine runs `on_exit`, updates the
//! current pointer, then runs `on_enter`. All handlers receive
//! `&mut TickContext`, which holds the counter, configuration, and
//! command outputs.

pub mod context;
pub mod states;

use context::TickContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of the scheduler's run states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// No timer armed; waiting for a start event.
    Idle = 0,
    /// Timer armed; counting.
    Running = 1,
    /// Terminal; timer disarmed, teardown imminent.
    Stopping = 2,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a `usize` index back to `StateId`. Panics on out-of-range
    /// in debug builds; returns `Stopping` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Stopping
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut TickContext);

/// Signature for the per-step update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut TickContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing step counter.
    step_count: u64,
    /// Step at which the current state was entered.
    state_entry_step: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            step_count: 0,
            state_entry_step: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `step()`.
    pub fn start(&mut self, ctx: &mut TickContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one step.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn step(&mut self, ctx: &mut TickContext) {
        self.step_count += 1;
        ctx.ticks_in_state = self.step_count - self.state_entry_step;
        ctx.total_ticks = self.step_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used by the service to drive
    /// event-triggered transitions such as start and shutdown).
    pub fn force_transition(&mut self, next: StateId, ctx: &mut TickContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// Re-enter the current state: run its `on_exit` then `on_enter`.
    /// This is the idempotent re-arm — entering Running from Running
    /// disarms, resets, and arms fresh.
    pub fn reenter(&mut self, ctx: &mut TickContext) {
        let id = self.current_state();
        info!("FSM re-entering {}", self.table[self.current].name);
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }
        self.state_entry_step = self.step_count;
        ctx.ticks_in_state = 0;
        if let Some(enter) = self.table[id as usize].on_enter {
            enter(ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many steps the FSM has spent in the current state.
    pub fn steps_in_current_state(&self) -> u64 {
        self.step_count - self.state_entry_step
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut TickContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.state_entry_step = self.step_count;
        ctx.ticks_in_state = 0;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
