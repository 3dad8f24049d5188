//! ESP-IDF board wiring.
//!
//! Claims the pins listed in [`crate::pins`] and assembles the
//! [`HardwareAdapter`] from `esp-idf-hal` drivers.  Everything above this
//! module only sees the port traits.

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::info;

use crate::adapters::hardware::HardwareAdapter;
use crate::adapters::time::MonotonicClock;
use crate::config::SystemConfig;
use crate::drivers::motor::{DriveTrain, HBridgeMotor};
use crate::drivers::pump::PumpDriver;
use crate::pins;
use crate::sensors::SensorHub;
use crate::sensors::flame::FlameArray;
use crate::sensors::reservoir::ReservoirGauge;
use crate::sensors::ultrasonic::Hcsr04;

type Out = PinDriver<'static, AnyOutputPin, Output>;
type In = PinDriver<'static, AnyInputPin, Input>;
type Ranger = Hcsr04<Out, In, Ets, MonotonicClock>;
type TrackMotor = HBridgeMotor<Out, Out, LedcDriver<'static>>;

/// The rover's hardware behind the port traits.
pub type BoardHardware = HardwareAdapter<Ranger, Ranger, FlameArray<In>, TrackMotor, TrackMotor, Out>;

fn output(gpio: i32) -> anyhow::Result<Out> {
    // SAFETY: every pin number comes from `pins`, where each is assigned once.
    Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
}

fn input(gpio: i32, pull: Pull) -> anyhow::Result<In> {
    // SAFETY: as above.
    let mut pin = PinDriver::input(unsafe { AnyInputPin::new(gpio) })?;
    pin.set_pull(pull)?;
    Ok(pin)
}

fn ranger(trig: i32, echo: i32, config: &SystemConfig) -> anyhow::Result<Ranger> {
    Ok(Hcsr04::new(
        output(trig)?,
        input(echo, Pull::Down)?,
        Ets,
        MonotonicClock::new(),
        config.echo_timeout_us,
    ))
}

/// Claim the peripherals and build the adapter.  Callable once per boot.
pub fn take(config: &SystemConfig) -> anyhow::Result<BoardHardware> {
    let p = Peripherals::take()?;

    let timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::new().frequency(Hertz(pins::MOTOR_PWM_FREQ_HZ)),
    )?;
    // Both track channels borrow the timer for the life of the firmware.
    let timer: &'static LedcTimerDriver<'static> = Box::leak(Box::new(timer));

    // SAFETY: PWM pins are unique in `pins`.
    let left_pwm = LedcDriver::new(p.ledc.channel0, timer, unsafe {
        AnyOutputPin::new(pins::LEFT_PWM_GPIO)
    })?;
    let right_pwm = LedcDriver::new(p.ledc.channel1, timer, unsafe {
        AnyOutputPin::new(pins::RIGHT_PWM_GPIO)
    })?;

    let drive = DriveTrain::new(
        HBridgeMotor::new(
            output(pins::LEFT_IN1_GPIO)?,
            output(pins::LEFT_IN2_GPIO)?,
            left_pwm,
            config.max_duty,
        ),
        HBridgeMotor::new(
            output(pins::RIGHT_IN1_GPIO)?,
            output(pins::RIGHT_IN2_GPIO)?,
            right_pwm,
            config.max_duty,
        ),
    );

    let mut flame_pins = Vec::with_capacity(pins::FLAME_GPIOS.len());
    for gpio in pins::FLAME_GPIOS {
        flame_pins.push(input(gpio, Pull::Up)?);
    }

    let sensors = SensorHub::new(
        ranger(pins::OBSTACLE_TRIG_GPIO, pins::OBSTACLE_ECHO_GPIO, config)?,
        ReservoirGauge::new(
            ranger(pins::RESERVOIR_TRIG_GPIO, pins::RESERVOIR_ECHO_GPIO, config)?,
            config.reservoir_empty_cm,
            config.reservoir_full_cm,
        ),
        FlameArray::new(flame_pins),
    );

    let pump = PumpDriver::new(output(pins::PUMP_GPIO)?, pins::PUMP_ACTIVE_HIGH);

    info!(
        "board ready: {} flame channels, PWM {} Hz",
        pins::FLAME_GPIOS.len(),
        pins::MOTOR_PWM_FREQ_HZ
    );
    Ok(HardwareAdapter::new(sensors, drive, pump))
}
