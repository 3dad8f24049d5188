//! Context threaded through every maneuver phase handler.
//!
//! Handlers get a mutable borrow of the robot-state record plus the
//! configuration and the tick timestamp.  Phase and phase-start live in
//! [`RobotState`] itself, so the sequencer holds no state of its own and
//! the record stays the single source of truth.

use crate::app::state::{Direction, DriveIntent, RobotState};
use crate::config::SystemConfig;

/// The shared context passed to every phase handler function.
pub struct ManeuverContext<'a> {
    /// The robot-state record being advanced.
    pub robot: &'a mut RobotState,
    /// Thresholds, durations and speeds.
    pub config: &'a SystemConfig,
    /// Timestamp of the current tick (monotonic milliseconds).
    pub now_ms: u64,
}

impl<'a> ManeuverContext<'a> {
    pub fn new(robot: &'a mut RobotState, config: &'a SystemConfig, now_ms: u64) -> Self {
        Self {
            robot,
            config,
            now_ms,
        }
    }

    /// Milliseconds elapsed since the current phase was entered.
    pub fn ms_in_phase(&self) -> u64 {
        self.now_ms
            .saturating_sub(self.robot.avoidance_phase_started_at)
    }

    /// True when the last reading is a valid echo inside the trigger band.
    /// An unknown distance never counts as an obstacle.
    pub fn obstacle_ahead(&self) -> bool {
        self.robot
            .obstacle_distance()
            .is_some_and(|cm| cm < u32::from(self.config.obstacle_threshold_cm))
    }

    /// Replace the drive intent with the configured speeds for `direction`.
    pub fn set_drive(&mut self, direction: Direction) {
        self.robot.drive_intent = DriveIntent::new(
            direction,
            self.config.cruise_speed,
            self.config.turn_speed,
            self.config.max_duty,
        );
    }
}
