//! Outbound application events.
//!
//! The [`ControlCore`](super::service::ControlCore) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, push to a dashboard.

use super::state::{AvoidancePhase, Mode, StatusSnapshot};
use crate::error::CommandError;

/// Who flipped the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpSource {
    /// The fire-response policy.
    Policy,
    /// An explicit pump command.
    Operator,
}

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The core has started (carries the initial mode).
    Started(Mode),

    /// Operating mode switched; the drive was stopped.
    ModeChanged { from: Mode, to: Mode },

    /// The avoidance maneuver moved to another phase.
    PhaseChanged {
        from: AvoidancePhase,
        to: AvoidancePhase,
    },

    /// Pump output or override latch changed.
    PumpChanged {
        on: bool,
        manual_override: bool,
        source: PumpSource,
    },

    /// Flame presence flipped.
    FireChanged(bool),

    /// The remote dead-man switch stopped the robot.
    SafetyStop { silent_ms: u64 },

    /// A command was refused at the boundary.
    CommandRejected(CommandError),

    /// Periodic status snapshot.
    Telemetry(StatusSnapshot),
}
