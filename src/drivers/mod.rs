//! Drivers: the tick timer and button logic (host-testable), plus the
//! Raspberry Pi hardware adapters (panel, PCM, GPIO) behind the `hw`
//! feature.

pub mod button;
pub mod tick_timer;

#[cfg(feature = "hw")]
pub mod gpio;
#[cfg(feature = "hw")]
pub mod panel;
#[cfg(feature = "hw")]
pub mod pcm;
