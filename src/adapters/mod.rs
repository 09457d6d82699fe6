//! Outbound adapters for the application core's port traits.

pub mod log_sink;
