//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] each
//! tick that the control core writes into the robot-state record.

pub mod flame;
pub mod reservoir;
pub mod ultrasonic;

use log::{debug, warn};

use crate::app::state::SensorSnapshot;
use crate::error::SensorError;
use reservoir::ReservoirGauge;

/// Anything that measures a distance in centimetres.
pub trait RangeFinder {
    fn range_cm(&mut self) -> Result<u16, SensorError>;
}

/// Anything that reports flame presence.
pub trait FlameDetector {
    fn flame(&mut self) -> Result<bool, SensorError>;
}

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub<O, R, F> {
    pub obstacle: O,
    pub reservoir: ReservoirGauge<R>,
    pub flame: F,
}

impl<O, R, F> SensorHub<O, R, F>
where
    O: RangeFinder,
    R: RangeFinder,
    F: FlameDetector,
{
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(obstacle: O, reservoir: ReservoirGauge<R>, flame: F) -> Self {
        Self {
            obstacle,
            reservoir,
            flame,
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures are logged and reported as unknown — a
    /// single flaky sensor must not crash the control loop.
    pub fn read_all(&mut self) -> SensorSnapshot {
        let fire_detected = self.flame.flame().unwrap_or_else(|e| {
            warn!("flame array: {}", e);
            false
        });
        let obstacle_cm = self
            .obstacle
            .range_cm()
            .map_err(|e| debug!("obstacle ranger: {}", e))
            .ok();
        let reservoir_pct = self
            .reservoir
            .level_pct()
            .map_err(|e| debug!("reservoir gauge: {}", e))
            .ok();

        SensorSnapshot {
            fire_detected,
            obstacle_cm,
            reservoir_pct,
        }
    }
}
