//! Fire-response policy.
//!
//! Decides, once per tick after the sensor refresh, whether the pump
//! should be switched.  The decision is a pure function of four inputs;
//! applying it is the caller's job.
//!
//! | mode       | fire | pump | override | action   |
//! |------------|------|------|----------|----------|
//! | AUTONOMOUS | yes  | off  | no       | start    |
//! | AUTONOMOUS | no   | on   | no       | stop     |
//! | any        | –    | –    | yes      | none     |
//! | REMOTE     | –    | –    | –        | none     |

use crate::app::state::{Mode, RobotState};

/// What the policy wants done with the pump this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpDecision {
    Start,
    Stop,
    Hold,
}

/// Evaluate the policy.  Same inputs always give the same decision.
pub fn decide(mode: Mode, fire_detected: bool, pump_on: bool, manual_override: bool) -> PumpDecision {
    if manual_override || mode != Mode::Autonomous {
        return PumpDecision::Hold;
    }
    match (fire_detected, pump_on) {
        (true, false) => PumpDecision::Start,
        (false, true) => PumpDecision::Stop,
        _ => PumpDecision::Hold,
    }
}

/// Run the policy against the robot-state record and apply its decision.
/// Returns the decision so the caller can report a pump change.
/// The override latch is never touched here.
pub fn apply(robot: &mut RobotState) -> PumpDecision {
    let decision = decide(
        robot.mode,
        robot.fire_detected,
        robot.pump_on,
        robot.pump_manual_override,
    );
    match decision {
        PumpDecision::Start => robot.pump_on = true,
        PumpDecision::Stop => robot.pump_on = false,
        PumpDecision::Hold => {}
    }
    decision
}
