//! Inbound commands to the control core.
//!
//! These represent actions requested by the outside world (remote
//! dashboard, serial console) that [`ControlCore`](super::service::ControlCore)
//! interprets and acts upon.  Values here are already validated: anything
//! malformed was rejected while parsing, before reaching the core.

use core::str::FromStr;

use super::state::{Direction, Mode, StatusSnapshot};
use crate::error::CommandError;

/// What to do with the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpAction {
    /// Switch the pump on.
    Start,
    /// Switch the pump off.
    Stop,
    /// Leave the pump as it is and hand control back to the fire policy.
    Auto,
}

impl FromStr for PumpAction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "on" => Ok(Self::Start),
            "stop" | "off" => Ok(Self::Stop),
            "auto" => Ok(Self::Auto),
            _ => Err(CommandError::InvalidAction),
        }
    }
}

/// Commands that external adapters can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Set the drive direction (applied only in remote mode).
    Drive(Direction),

    /// Switch operating mode; always stops the robot.
    SetMode(Mode),

    /// Explicit pump command.  `manual` sets the override latch.
    Pump { action: PumpAction, manual: bool },

    /// Re-poll sensors, re-run the fire policy, return a snapshot.
    GetStatus,

    /// Liveness probe, no state effect.
    Ping,
}

/// Successful outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReply {
    Ok,
    Pong,
    Status(StatusSnapshot),
}
