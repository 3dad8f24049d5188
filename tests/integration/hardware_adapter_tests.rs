//! HardwareAdapter against fake sensor drivers and mock pins: checks the
//! translation from domain intents to motor speeds and pump levels, and
//! that driver faults degrade to unknown readings or counted faults.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};
use firebot::adapters::hardware::HardwareAdapter;
use firebot::app::ports::{ActuatorPort, SensorPort};
use firebot::app::state::{Direction, DriveIntent, SensorSnapshot};
use firebot::drivers::motor::{DriveTrain, Motor};
use firebot::drivers::pump::PumpDriver;
use firebot::error::{ActuatorError, Error, SensorError};
use firebot::sensors::reservoir::ReservoirGauge;
use firebot::sensors::{FlameDetector, RangeFinder, SensorHub};

struct Range(Result<u16, SensorError>);
impl RangeFinder for Range {
    fn range_cm(&mut self) -> Result<u16, SensorError> {
        self.0
    }
}

struct Flame(Result<bool, SensorError>);
impl FlameDetector for Flame {
    fn flame(&mut self) -> Result<bool, SensorError> {
        self.0
    }
}

#[derive(Default)]
struct FakeMotor {
    speed: i16,
    broken: bool,
}
impl Motor for FakeMotor {
    fn set_speed(&mut self, speed: i16) -> Result<(), ActuatorError> {
        if self.broken {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.speed = speed;
        Ok(())
    }
    fn speed(&self) -> i16 {
        self.speed
    }
}

#[derive(Clone, Default)]
struct Pin(Rc<Cell<bool>>);
impl ErrorType for Pin {
    type Error = Infallible;
}
impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

type Adapter = HardwareAdapter<Range, Range, Flame, FakeMotor, FakeMotor, Pin>;

fn adapter(obstacle: Result<u16, SensorError>, flame: Result<bool, SensorError>, left_broken: bool) -> (Adapter, Pin) {
    let pump_pin = Pin::default();
    let hub = SensorHub::new(
        Range(obstacle),
        ReservoirGauge::new(Range(Ok(2)), 20, 2),
        Flame(flame),
    );
    let drive = DriveTrain::new(
        FakeMotor {
            broken: left_broken,
            ..FakeMotor::default()
        },
        FakeMotor::default(),
    );
    let hw = HardwareAdapter::new(hub, drive, PumpDriver::new(pump_pin.clone(), true));
    (hw, pump_pin)
}

#[test]
fn sensors_map_into_snapshot() {
    let (mut hw, _) = adapter(Ok(48), Ok(true), false);
    assert_eq!(
        hw.read_all(),
        SensorSnapshot {
            fire_detected: true,
            obstacle_cm: Some(48),
            reservoir_pct: Some(100),
        }
    );
}

#[test]
fn sensor_faults_read_as_unknown() {
    let (mut hw, _) = adapter(Err(SensorError::NoEcho), Err(SensorError::Absent), false);
    let snap = hw.read_all();
    assert_eq!(snap.obstacle_cm, None);
    assert!(!snap.fire_detected);
}

#[test]
fn drive_intent_reaches_both_tracks() {
    let (mut hw, _) = adapter(Ok(100), Ok(false), false);
    hw.apply_drive(&DriveIntent::new(Direction::Right, 200, 180, 255));
    assert_eq!(hw.drive_speeds(), (180, -180));
    hw.all_off();
    assert_eq!(hw.drive_speeds(), (0, 0));
    assert_eq!(hw.actuator_faults(), 0);
}

#[test]
fn failing_track_is_counted_and_other_track_still_driven() {
    let (mut hw, _) = adapter(Ok(100), Ok(false), true);
    hw.apply_drive(&DriveIntent::new(Direction::Forward, 200, 180, 255));
    assert_eq!(hw.actuator_faults(), 1);
    assert_eq!(hw.last_fault(), Some(Error::Actuator(ActuatorError::PwmWriteFailed)));
    assert_eq!(hw.drive_speeds(), (0, 200));
}

#[test]
fn pump_follows_commands() {
    let (mut hw, pin) = adapter(Ok(100), Ok(false), false);
    hw.set_pump(true);
    assert!(pin.0.get());
    assert!(hw.pump_on());
    hw.all_off();
    assert!(!pin.0.get());
    assert!(!hw.pump_on());
}
