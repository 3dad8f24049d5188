//! Remote dead-man's switch.
//!
//! Runs **every tick after the fire policy**.  In remote mode the robot
//! only keeps moving while the operator keeps re-sending drive commands:
//! if the last accepted command is older than the window, the drive is
//! forced to a stop.
//!
//! ## Rules
//!
//! 1. Autonomous mode: never fires.
//! 2. Remote mode, stopped: nothing to stop.
//! 3. Remote mode, moving: fires when `now - last_command > window`
//!    (strictly greater, so a command exactly `window` ms old still holds).
//! 4. Moving without any recorded command: fires.

use log::warn;

use crate::app::state::{DriveIntent, Mode, RobotState};

/// Remote dead-man supervisor.
pub struct SafetyTimeout {
    window_ms: u64,
    /// Number of forced stops since start (diagnostics).
    trips: u32,
}

impl SafetyTimeout {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, trips: 0 }
    }

    /// Pure check: would the supervisor stop the robot right now?
    pub fn is_expired(&self, robot: &RobotState, now_ms: u64) -> bool {
        if robot.mode != Mode::Remote || !robot.is_moving() {
            return false;
        }
        match robot.last_remote_command_at {
            Some(at) => now_ms.saturating_sub(at) > self.window_ms,
            None => true,
        }
    }

    /// Evaluate and, if expired, stop the drive.  Returns the silence that
    /// caused the stop in milliseconds.
    pub fn enforce(&mut self, robot: &mut RobotState, now_ms: u64) -> Option<u64> {
        if !self.is_expired(robot, now_ms) {
            return None;
        }
        let silent_ms = robot
            .last_remote_command_at
            .map_or(now_ms, |at| now_ms.saturating_sub(at));
        warn!(
            "SAFETY STOP: no remote command for {} ms (window {} ms), was {:?}",
            silent_ms, self.window_ms, robot.drive_intent.direction
        );
        robot.drive_intent = DriveIntent::STOP;
        self.trips = self.trips.saturating_add(1);
        Some(silent_ms)
    }

    /// Forced stops since start.
    pub fn trips(&self) -> u32 {
        self.trips
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
