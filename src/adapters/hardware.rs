//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  Generic over the
//! `embedded-hal` traits, so the same adapter runs on the ESP-IDF board
//! and against mock pins in host tests.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::app::state::{DriveIntent, SensorSnapshot};
use crate::drivers::motor::{DriveTrain, Motor};
use crate::drivers::pump::PumpDriver;
use crate::error::{ActuatorError, Error};
use crate::sensors::{FlameDetector, RangeFinder, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<O, R, F, L, M, P> {
    sensor_hub: SensorHub<O, R, F>,
    drive: DriveTrain<L, M>,
    pump: PumpDriver<P>,
    actuator_faults: u32,
    last_fault: Option<Error>,
}

impl<O, R, F, L, M, P> HardwareAdapter<O, R, F, L, M, P>
where
    O: RangeFinder,
    R: RangeFinder,
    F: FlameDetector,
    L: Motor,
    M: Motor,
    P: OutputPin,
{
    pub fn new(sensor_hub: SensorHub<O, R, F>, drive: DriveTrain<L, M>, pump: PumpDriver<P>) -> Self {
        Self {
            sensor_hub,
            drive,
            pump,
            actuator_faults: 0,
            last_fault: None,
        }
    }

    /// Actuator writes that failed since start.
    pub fn actuator_faults(&self) -> u32 {
        self.actuator_faults
    }

    /// Most recent actuator failure, if any.
    pub fn last_fault(&self) -> Option<Error> {
        self.last_fault
    }

    pub fn drive_speeds(&self) -> (i16, i16) {
        self.drive.speeds()
    }

    pub fn pump_on(&self) -> bool {
        self.pump.is_on()
    }
}

impl<O, R, F, L, M, P> HardwareAdapter<O, R, F, L, M, P> {
    fn record_fault(&mut self, e: ActuatorError) {
        self.actuator_faults = self.actuator_faults.saturating_add(1);
        self.last_fault = Some(e.into());
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<O, R, F, L, M, P> SensorPort for HardwareAdapter<O, R, F, L, M, P>
where
    O: RangeFinder,
    R: RangeFinder,
    F: FlameDetector,
{
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<O, R, F, L, M, P> ActuatorPort for HardwareAdapter<O, R, F, L, M, P>
where
    L: Motor,
    M: Motor,
    P: OutputPin,
{
    fn apply_drive(&mut self, intent: &DriveIntent) {
        if let Err(e) = self.drive.apply(intent) {
            self.record_fault(e);
            error!("drive {:?}: {}", intent.direction, e);
        }
    }

    fn set_pump(&mut self, on: bool) {
        if self.pump.is_on() == on {
            return;
        }
        if let Err(e) = self.pump.set(on) {
            self.record_fault(e);
            error!("pump {}: {}", if on { "on" } else { "off" }, e);
        }
    }

    fn all_off(&mut self) {
        if let Err(e) = self.drive.stop() {
            error!("all_off drive: {}", e);
        }
        if let Err(e) = self.pump.set(false) {
            error!("all_off pump: {}", e);
        }
    }
}
