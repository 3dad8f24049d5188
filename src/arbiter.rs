//! Mode arbiter.
//!
//! Decides who owns the drive intent each tick and carries out mode
//! switches.  A switch is a hard cancellation point: every call stops the
//! drive, aborts any maneuver, and releases the pump override latch,
//! whatever the previous state was.

use log::info;

use crate::app::state::{DriveIntent, Mode, RobotState};
use crate::fsm::{ManeuverSequencer, PhaseTransition};

/// Which component writes the drive intent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOwner {
    /// The maneuver sequencer (autonomous mode).
    Sequencer,
    /// Operator drive commands (remote mode).
    Operator,
}

/// Outcome of a mode switch, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitch {
    pub from: Mode,
    pub to: Mode,
    /// Set when an in-flight maneuver was cut short.
    pub cancelled: Option<PhaseTransition>,
}

pub fn drive_owner(mode: Mode) -> DriveOwner {
    match mode {
        Mode::Autonomous => DriveOwner::Sequencer,
        Mode::Remote => DriveOwner::Operator,
    }
}

/// Switch to `requested`.  Re-requesting the current mode still stops.
pub fn set_mode(robot: &mut RobotState, requested: Mode, now_ms: u64) -> ModeSwitch {
    let from = robot.mode;

    robot.drive_intent = DriveIntent::STOP;
    let cancelled = ManeuverSequencer::cancel(robot, now_ms);
    robot.pump_manual_override = false;
    robot.last_remote_command_at = None;
    robot.mode = requested;

    info!("MODE: {} -> {} (drive stopped)", from, requested);
    if let Some(t) = cancelled {
        info!("MODE: aborted maneuver in {:?}", t.from);
    }

    ModeSwitch {
        from,
        to: requested,
        cancelled,
    }
}
