//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events as
//! single-line `TAG | k=v` records through the `log` facade (UART on the
//! board, stderr on the host).  A dashboard push adapter would implement
//! the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written since start.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | mode={} | drive={:?} moving={} | fire={} | obstacle={}cm | \
                     reservoir={}% | pump={}",
                    t.mode,
                    t.drive_intent,
                    t.is_moving,
                    t.fire_detected,
                    t.obstacle_distance_cm,
                    t.reservoir_level_pct,
                    if t.pump_on { "ON" } else { "OFF" },
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from, to);
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::PumpChanged {
                on,
                manual_override,
                source,
            } => {
                info!("PUMP | on={} override={} source={:?}", on, manual_override, source);
            }
            AppEvent::FireChanged(fire) => {
                info!("FIRE | detected={}", fire);
            }
            AppEvent::SafetyStop { silent_ms } => {
                warn!("SAFETY | remote silent {}ms, drive stopped", silent_ms);
            }
            AppEvent::CommandRejected(e) => {
                warn!("REJECT | {}", e);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
        }
    }
}
