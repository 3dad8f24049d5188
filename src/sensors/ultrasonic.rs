//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs trigger pulse starts a measurement; the sensor answers with an
//! echo pulse whose width is the round-trip time of flight.  At ~343 m/s
//! one centimetre of range is ~58 µs of echo.
//!
//! The read is blocking and bounded by `timeout_us` on both edges, so a
//! missing target (or a disconnected sensor) costs at most two timeouts
//! and comes back as [`SensorError::NoEcho`], never as a zero distance.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::RangeFinder;
use crate::error::SensorError;

/// Echo width per centimetre of range (round trip).
pub const US_PER_CM: u64 = 58;

/// Free-running microsecond counter used to time the echo edges.
pub trait MicrosClock {
    fn now_us(&mut self) -> u64;
}

pub struct Hcsr04<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u64,
}

impl<T, E, D, C> Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    pub fn new(trigger: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us: u64::from(timeout_us),
        }
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::Absent)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::Absent)?;
        self.delay.delay_us(10);
        self.trigger.set_low().map_err(|_| SensorError::Absent)
    }

    /// Poll until the echo line reads `level`, or time out.
    fn wait_for(&mut self, level: bool, since: u64) -> Result<u64, SensorError> {
        loop {
            let high = self.echo.is_high().map_err(|_| SensorError::GpioReadFailed)?;
            if high == level {
                return Ok(self.clock.now_us());
            }
            if self.clock.now_us().saturating_sub(since) > self.timeout_us {
                return Err(SensorError::NoEcho);
            }
        }
    }
}

impl<T, E, D, C> RangeFinder for Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    fn range_cm(&mut self) -> Result<u16, SensorError> {
        self.pulse_trigger()?;
        let start = self.clock.now_us();
        let rise = self.wait_for(true, start)?;
        let fall = self.wait_for(false, rise)?;

        let cm = fall.saturating_sub(rise) / US_PER_CM;
        if cm == 0 {
            return Err(SensorError::NoEcho);
        }
        Ok(u16::try_from(cm).unwrap_or(u16::MAX))
    }
}
