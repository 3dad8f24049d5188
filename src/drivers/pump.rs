//! Water pump driver (relay or MOSFET on one GPIO).
//!
//! On/off only.  Whether to run the pump is decided by the fire policy or
//! the operator; this driver is a dumb actuator.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::ActuatorError;

pub struct PumpDriver<P> {
    pin: P,
    active_high: bool,
    on: bool,
}

impl<P: OutputPin> PumpDriver<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self {
            pin,
            active_high,
            on: false,
        }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let level = PinState::from(on == self.active_high);
        self.pin
            .set_state(level)
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
