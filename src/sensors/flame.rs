//! IR flame detector array.
//!
//! Each channel is a comparator module (LM393 style) whose digital output
//! is pulled LOW while it sees flame.  Fire is the OR across channels.
//! A channel that fails to read is skipped, not treated as "no fire", and
//! never masks the channels that did answer.

use embedded_hal::digital::InputPin;
use heapless::Vec;
use log::warn;

use super::FlameDetector;
use crate::error::SensorError;

/// Upper bound on detector channels.
pub const MAX_FLAME_CHANNELS: usize = 5;

pub struct FlameArray<P> {
    channels: Vec<P, MAX_FLAME_CHANNELS>,
}

impl<P: InputPin> FlameArray<P> {
    /// Build from detector pins.  Pins beyond [`MAX_FLAME_CHANNELS`] are
    /// dropped with a warning.
    pub fn new(pins: impl IntoIterator<Item = P>) -> Self {
        let mut channels = Vec::new();
        for pin in pins {
            if channels.push(pin).is_err() {
                warn!("flame array full, ignoring extra channel");
                break;
            }
        }
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl<P: InputPin> FlameDetector for FlameArray<P> {
    fn flame(&mut self) -> Result<bool, SensorError> {
        let mut answered = 0usize;
        let mut fire = false;
        for (idx, pin) in self.channels.iter_mut().enumerate() {
            match pin.is_low() {
                Ok(seen) => {
                    answered += 1;
                    fire |= seen;
                }
                Err(_) => warn!("flame channel {} read failed", idx),
            }
        }
        if answered == 0 {
            return Err(SensorError::Absent);
        }
        Ok(fire)
    }
}
