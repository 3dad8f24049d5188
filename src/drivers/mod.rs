//! Actuator drivers.

pub mod motor;
pub mod pump;
