//! Track motors on an L298N / TB6612-style H-bridge.
//!
//! Each motor takes two direction inputs (IN1, IN2) and one PWM enable.
//! The sign of the commanded speed selects the pin pair; the magnitude is
//! scaled onto the PWM channel's duty range.
//!
//! | speed | IN1  | IN2  | duty        |
//! |-------|------|------|-------------|
//! | > 0   | HIGH | LOW  | scaled      |
//! | < 0   | LOW  | HIGH | scaled      |
//! | 0     | LOW  | LOW  | 0 (coast)   |

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::state::DriveIntent;
use crate::error::ActuatorError;

/// A single speed-controlled motor.
pub trait Motor {
    /// Signed speed, `-max..=max`.  Values outside are clamped.
    fn set_speed(&mut self, speed: i16) -> Result<(), ActuatorError>;

    /// Last speed that was successfully applied.
    fn speed(&self) -> i16;
}

pub struct HBridgeMotor<A, B, P> {
    in1: A,
    in2: B,
    pwm: P,
    max_speed: i16,
    speed: i16,
}

impl<A, B, P> HBridgeMotor<A, B, P>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
{
    /// `max_speed` is the speed value that maps to 100 % duty.
    pub fn new(in1: A, in2: B, pwm: P, max_speed: i16) -> Self {
        Self {
            in1,
            in2,
            pwm,
            max_speed: max_speed.max(1),
            speed: 0,
        }
    }
}

impl<A, B, P> Motor for HBridgeMotor<A, B, P>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
{
    fn set_speed(&mut self, speed: i16) -> Result<(), ActuatorError> {
        let speed = speed.clamp(-self.max_speed, self.max_speed);

        // Drop the enable first so the bridge never sees a direction flip
        // under load.
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        let (in1_high, in2_high) = match speed.signum() {
            1 => (true, false),
            -1 => (false, true),
            _ => (false, false),
        };
        self.in1
            .set_state(in1_high.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.in2
            .set_state(in2_high.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)?;

        let duty = duty_for(speed, self.max_speed, self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        self.speed = speed;
        Ok(())
    }

    fn speed(&self) -> i16 {
        self.speed
    }
}

/// Scale `|speed|` onto `0..=max_duty_cycle`.
pub fn duty_for(speed: i16, max_speed: i16, max_duty_cycle: u16) -> u16 {
    let max_speed = u32::from(max_speed.unsigned_abs().max(1));
    let magnitude = u32::from(speed.unsigned_abs()).min(max_speed);
    (magnitude * u32::from(max_duty_cycle) / max_speed) as u16
}

/// Left and right tracks of a skid-steer chassis.
pub struct DriveTrain<L, R> {
    left: L,
    right: R,
}

impl<L: Motor, R: Motor> DriveTrain<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    /// Apply both track speeds.  Both sides are attempted even if the
    /// first one fails; the first error is returned.
    pub fn apply(&mut self, intent: &DriveIntent) -> Result<(), ActuatorError> {
        let left = self.left.set_speed(intent.left_speed);
        let right = self.right.set_speed(intent.right_speed);
        left.and(right)
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.apply(&DriveIntent::STOP)
    }

    pub fn speeds(&self) -> (i16, i16) {
        (self.left.speed(), self.right.speed())
    }
}
