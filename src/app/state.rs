//! The robot-state record and the value types it is built from.
//!
//! [`RobotState`] is the "blackboard" every control component reads and
//! writes.  Exactly one instance exists, owned by
//! [`ControlCore`](super::service::ControlCore); everything outside the
//! core only ever sees it through `&RobotState` or a [`StatusSnapshot`].

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Obstacle distance stored when the ranger produced no valid echo.
pub const NO_ECHO_CM: i32 = -1;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which component owns the drive actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Maneuver sequencer and fire policy own the actuators.
    Autonomous,
    /// Operator commands own the actuators.
    Remote,
}

impl FromStr for Mode {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "autonomous" => Ok(Self::Autonomous),
            "remote" | "manual" => Ok(Self::Remote),
            _ => Err(CommandError::InvalidMode),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autonomous => write!(f, "AUTONOMOUS"),
            Self::Remote => write!(f, "REMOTE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Drive intent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl FromStr for Direction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" | "back" => Ok(Self::Backward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "stop" => Ok(Self::Stop),
            _ => Err(CommandError::InvalidDirection),
        }
    }
}

/// Desired motion: a direction plus one signed speed per track.
///
/// Positive speed spins a track forward.  Magnitudes never exceed the
/// `max_duty` given at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveIntent {
    pub direction: Direction,
    pub left_speed: i16,
    pub right_speed: i16,
}

impl DriveIntent {
    pub const STOP: Self = Self {
        direction: Direction::Stop,
        left_speed: 0,
        right_speed: 0,
    };

    /// Build the intent for `direction`: `cruise` for straight lines,
    /// `turn` for pivots (tracks counter-rotating).
    pub fn new(direction: Direction, cruise: i16, turn: i16, max_duty: i16) -> Self {
        let cruise = cruise.clamp(0, max_duty);
        let turn = turn.clamp(0, max_duty);
        let (left_speed, right_speed) = match direction {
            Direction::Forward => (cruise, cruise),
            Direction::Backward => (-cruise, -cruise),
            Direction::Left => (-turn, turn),
            Direction::Right => (turn, -turn),
            Direction::Stop => (0, 0),
        };
        Self {
            direction,
            left_speed,
            right_speed,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.direction == Direction::Stop
    }
}

impl Default for DriveIntent {
    fn default() -> Self {
        Self::STOP
    }
}

// ---------------------------------------------------------------------------
// Avoidance phase
// ---------------------------------------------------------------------------

/// Step of the fixed-duration obstacle-escape maneuver.
/// Must stay in sync with the table built in [`crate::fsm::phases::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AvoidancePhase {
    Idle = 0,
    Retreating = 1,
    TurningAway = 2,
    Advancing = 3,
    Returning = 4,
}

impl AvoidancePhase {
    /// Total number of phases — used to size the table array.
    pub const COUNT: usize = 5;
}

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// A point-in-time reading of every sensor.  `None` means the reading is
/// unknown this tick (no echo, sensor absent), never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// OR across every flame channel that answered.
    pub fire_detected: bool,
    /// Forward ranger distance.
    pub obstacle_cm: Option<u16>,
    /// Reservoir fill level, already clamped to 0..=100.
    pub reservoir_pct: Option<u8>,
}

// ---------------------------------------------------------------------------
// RobotState
// ---------------------------------------------------------------------------

/// The single authoritative robot-state record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotState {
    // -- Sensors --
    pub fire_detected: bool,
    /// Last forward ranger reading; `<= 0` means no valid echo.
    pub obstacle_distance_cm: i32,
    pub reservoir_level_pct: u8,

    // -- Drive --
    pub mode: Mode,
    pub drive_intent: DriveIntent,
    /// Millisecond timestamp of the last accepted remote drive command.
    pub last_remote_command_at: Option<u64>,

    // -- Pump --
    pub pump_on: bool,
    /// Set by explicit pump commands; blocks automatic fire response.
    pub pump_manual_override: bool,

    // -- Maneuver --
    pub avoidance_phase: AvoidancePhase,
    pub avoidance_phase_started_at: u64,
}

impl Default for RobotState {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotState {
    /// Power-on state: remote mode, stopped, pump off.
    pub const fn new() -> Self {
        Self {
            fire_detected: false,
            obstacle_distance_cm: NO_ECHO_CM,
            reservoir_level_pct: 0,
            mode: Mode::Remote,
            drive_intent: DriveIntent::STOP,
            last_remote_command_at: None,
            pump_on: false,
            pump_manual_override: false,
            avoidance_phase: AvoidancePhase::Idle,
            avoidance_phase_started_at: 0,
        }
    }

    /// Derived from the drive intent; never stored separately.
    pub fn is_moving(&self) -> bool {
        !self.drive_intent.is_stop()
    }

    /// Forward distance, or `None` when the last read had no valid echo.
    pub fn obstacle_distance(&self) -> Option<u32> {
        u32::try_from(self.obstacle_distance_cm)
            .ok()
            .filter(|&cm| cm > 0)
    }

    /// Store a fresh sensor snapshot.  Unknown reservoir readings keep the
    /// previous level; unknown obstacle readings become [`NO_ECHO_CM`].
    pub fn apply_sensors(&mut self, snap: &SensorSnapshot) {
        self.fire_detected = snap.fire_detected;
        self.obstacle_distance_cm = snap.obstacle_cm.map_or(NO_ECHO_CM, i32::from);
        if let Some(pct) = snap.reservoir_pct {
            self.reservoir_level_pct = pct.min(100);
        }
    }

    /// Typed read-only view for the command interface.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            fire_detected: self.fire_detected,
            reservoir_level_pct: self.reservoir_level_pct,
            obstacle_distance_cm: self.obstacle_distance_cm,
            is_moving: self.is_moving(),
            drive_intent: self.drive_intent.direction,
            mode: self.mode,
            pump_on: self.pump_on,
        }
    }
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// What `get_status` returns.  Field names match the dashboard's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub fire_detected: bool,
    pub reservoir_level_pct: u8,
    pub obstacle_distance_cm: i32,
    pub is_moving: bool,
    pub drive_intent: Direction,
    pub mode: Mode,
    pub pump_on: bool,
}
