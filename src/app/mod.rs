//! Application core — pure domain logic, zero I/O.
//!
//! Holds the robot-state record and the control core that advances it:
//! mode arbitration, the maneuver sequencer, the fire-response policy and
//! the remote dead-man switch.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
