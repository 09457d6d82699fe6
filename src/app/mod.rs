//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the coordination rules for the interval
//! announcer: run-state orchestration, per-tick side effect dispatch,
//! and error isolation. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without a panel, a PCM device, or GPIO.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
