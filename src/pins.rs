//! GPIO / peripheral pin assignments for the rover main board (ESP32-S3).
//!
//! Single source of truth — the board module references this module
//! rather than hard-coding pin numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Drive motors (dual H-bridge, one channel per track)
// ---------------------------------------------------------------------------

/// Left track direction inputs.
pub const LEFT_IN1_GPIO: i32 = 4;
pub const LEFT_IN2_GPIO: i32 = 5;
/// Left track enable (LEDC PWM channel 0).
pub const LEFT_PWM_GPIO: i32 = 6;

/// Right track direction inputs.
pub const RIGHT_IN1_GPIO: i32 = 7;
pub const RIGHT_IN2_GPIO: i32 = 15;
/// Right track enable (LEDC PWM channel 1).
pub const RIGHT_PWM_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Pump
// ---------------------------------------------------------------------------

/// Digital output to the pump MOSFET gate.
pub const PUMP_GPIO: i32 = 17;
/// `true` when the pump runs with the pin HIGH.
pub const PUMP_ACTIVE_HIGH: bool = true;

// ---------------------------------------------------------------------------
// Ultrasonic rangers (HC-SR04, echo through a 5 V → 3.3 V divider)
// ---------------------------------------------------------------------------

/// Forward-facing obstacle ranger.
pub const OBSTACLE_TRIG_GPIO: i32 = 18;
pub const OBSTACLE_ECHO_GPIO: i32 = 8;

/// Reservoir ranger, looking down at the water surface.
pub const RESERVOIR_TRIG_GPIO: i32 = 9;
pub const RESERVOIR_ECHO_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Flame detectors (LM393 comparator modules, active LOW)
// ---------------------------------------------------------------------------

pub const FLAME_GPIOS: [i32; 5] = [11, 12, 13, 14, 21];

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the motor bridges (20 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 20_000;
