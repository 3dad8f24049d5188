//! Remote command path: text codec plus the bus into the control loop.

pub mod bus;
pub mod protocol;
