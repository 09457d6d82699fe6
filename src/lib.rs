//! GymTimer library.
//!
//! The coordination core of the interval announcer: a lock-free event
//! queue fed from timer and GPIO callback contexts, a three-state run
//! FSM, and a port-trait boundary that keeps the domain logic testable
//! without a panel, a PCM device, or real pins. Hardware adapters are
//! gated behind the `hw` feature within `drivers`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod cue;
pub mod display;
pub mod drivers;
pub mod events;
pub mod fsm;

mod error;

pub use error::{DeviceError, Error, ResourceError, Result};
