//! GPIO input adapter.
//!
//! Registers pull-up inputs with falling-edge callbacks for each
//! configured button. The callback does exactly one thing: record the
//! current monotonic millisecond timestamp into the button's edge slot.
//! Debounce classification and the resulting state transitions happen on
//! the main loop, never in callback context.

use std::sync::Arc;

use log::{debug, info};
use rppal::gpio::{Gpio, InputPin, Trigger};

use crate::clock::MonotonicClock;
use crate::drivers::button::{ButtonDriver, record_edge};
use crate::error::{DeviceError, Error};

/// Owns the configured input pins; dropping it deregisters the
/// callbacks and releases the pins.
pub struct InputWatcher {
    _pins: Vec<InputPin>,
}

impl InputWatcher {
    /// Claim each button's pin as a pull-up input and wire its
    /// falling-edge callback to the button's edge slot. The clock must
    /// be the same instance the main loop passes to `ButtonDriver::tick`.
    pub fn watch(buttons: &[&ButtonDriver], clock: Arc<MonotonicClock>) -> Result<Self, Error> {
        let gpio = Gpio::new().map_err(|_| Error::Device(DeviceError::GpioFailed))?;
        let mut pins = Vec::with_capacity(buttons.len());

        for button in buttons {
            let number = button.pin();
            let mut pin = gpio
                .get(number)
                .map_err(|_| Error::Device(DeviceError::GpioFailed))?
                .into_input_pullup();

            let slot = button.edge_slot();
            let clock = Arc::clone(&clock);
            pin.set_async_interrupt(Trigger::FallingEdge, move |level| {
                let now_ms = clock.now_ms();
                debug!("edge: pin={} level={:?} t={}ms", number, level, now_ms);
                // 0 is the "no edge yet" sentinel in the slot.
                record_edge(&slot, now_ms.max(1));
            })
            .map_err(|_| Error::Device(DeviceError::GpioFailed))?;

            info!("watching pin {} (pull-up, falling edge)", number);
            pins.push(pin);
        }

        Ok(Self { _pins: pins })
    }
}
