//! Firebot controller library.
//!
//! Exposes the control core, its ports and the adapters for integration
//! testing and for the binary.  ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod arbiter;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fire_response;
pub mod fsm;
pub mod pins;
pub mod remote;
pub mod safety;
pub mod sensors;
