//! Unified error types for the gym timer.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. The taxonomy follows
//! the failure policy: resource and configuration errors are fatal at
//! startup, device errors mid-run are logged and the failing side effect
//! is skipped for that tick.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An asset (PCM sample, font) is missing, truncated, or unparsable.
    /// Fatal: initialization aborts before any timer is armed.
    Resource(ResourceError),
    /// Audio or display hardware rejected an operation mid-run.
    /// Non-fatal: logged, the current tick's side effect is skipped.
    Device(DeviceError),
    /// Configuration is invalid (geometry, pins, intervals).
    /// Fatal at startup.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(e) => write!(f, "resource: {e}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Resource errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The asset file could not be opened.
    NotFound(String),
    /// The asset file is shorter than its declared header.
    Truncated { path: String, len: usize, min: usize },
    /// The asset could not be parsed (e.g. BDF font).
    Unparsable(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "cannot open '{path}'"),
            Self::Truncated { path, len, min } => {
                write!(f, "'{path}' is {len} bytes, need more than {min}")
            }
            Self::Unparsable(path) => write!(f, "cannot parse '{path}'"),
        }
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The PCM device rejected a prepare or write.
    AudioWriteFailed,
    /// The PCM device could not be opened or parameterized.
    AudioSetupFailed,
    /// The panel rejected a draw or swap.
    DisplayWriteFailed,
    /// A GPIO operation failed.
    GpioFailed,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioWriteFailed => write!(f, "PCM write failed"),
            Self::AudioSetupFailed => write!(f, "PCM setup failed"),
            Self::DisplayWriteFailed => write!(f, "panel draw failed"),
            Self::GpioFailed => write!(f, "GPIO operation failed"),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_subsystem_prefix() {
        let e = Error::from(DeviceError::AudioWriteFailed);
        assert_eq!(e.to_string(), "device: PCM write failed");
        let e = Error::from(ResourceError::NotFound("tick.wav".into()));
        assert_eq!(e.to_string(), "resource: cannot open 'tick.wav'");
        let e = Error::Config("tick interval must be non-zero");
        assert!(e.to_string().starts_with("config:"));
    }

    #[test]
    fn truncated_reports_sizes() {
        let e = ResourceError::Truncated {
            path: "tick.wav".into(),
            len: 10,
            min: 44,
        };
        let msg = e.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("44"));
    }
}
