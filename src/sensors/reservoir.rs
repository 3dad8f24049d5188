//! Reservoir level gauge.
//!
//! A downward-facing ranger in the tank lid measures the distance to the
//! water surface.  `empty_cm` is the reading with the tank empty,
//! `full_cm` the reading when full; anything in between maps linearly
//! onto 0–100 %.

use super::RangeFinder;
use crate::error::SensorError;

pub struct ReservoirGauge<R> {
    ranger: R,
    empty_cm: u16,
    full_cm: u16,
}

impl<R: RangeFinder> ReservoirGauge<R> {
    pub fn new(ranger: R, empty_cm: u16, full_cm: u16) -> Self {
        Self {
            ranger,
            empty_cm,
            full_cm,
        }
    }

    pub fn level_pct(&mut self) -> Result<u8, SensorError> {
        let cm = self.ranger.range_cm()?;
        Ok(level_pct(cm, self.empty_cm, self.full_cm))
    }
}

/// Map a surface distance onto a fill percentage, clamped to 0..=100.
pub fn level_pct(distance_cm: u16, empty_cm: u16, full_cm: u16) -> u8 {
    if empty_cm <= full_cm {
        return 0;
    }
    let span = u32::from(empty_cm - full_cm);
    let d = distance_cm.clamp(full_cm, empty_cm);
    let filled = u32::from(empty_cm - d);
    (filled * 100 / span) as u8
}
