//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.  Sensor readings
//! come from a script; once it runs out the last reading repeats.

use std::collections::VecDeque;

use firebot::app::events::AppEvent;
use firebot::app::ports::{ActuatorPort, EventSink, SensorPort};
use firebot::app::state::{Direction, DriveIntent, SensorSnapshot};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Drive(DriveIntent),
    Pump(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    script: VecDeque<SensorSnapshot>,
    current: SensorSnapshot,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            script: VecDeque::new(),
            current: SensorSnapshot::default(),
            reads: 0,
        }
    }

    /// Replace the reading returned from now on.
    pub fn set_sensors(&mut self, snapshot: SensorSnapshot) {
        self.script.clear();
        self.current = snapshot;
    }

    pub fn set_obstacle(&mut self, cm: Option<u16>) {
        self.current.obstacle_cm = cm;
    }

    pub fn set_fire(&mut self, fire: bool) {
        self.current.fire_detected = fire;
    }

    /// Queue one reading per obstacle distance, consumed one per read.
    pub fn script_obstacles(&mut self, distances: &[u16]) {
        self.script.extend(distances.iter().map(|&cm| SensorSnapshot {
            obstacle_cm: Some(cm),
            ..self.current
        }));
    }

    pub fn last_drive(&self) -> Option<DriveIntent> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Drive(d) => Some(*d),
            ActuatorCall::AllOff => Some(DriveIntent::STOP),
            ActuatorCall::Pump(_) => None,
        })
    }

    pub fn last_direction(&self) -> Direction {
        self.last_drive().map_or(Direction::Stop, |d| d.direction)
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Pump(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::Drive(_) => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.current
    }
}

impl ActuatorPort for MockHardware {
    fn apply_drive(&mut self, intent: &DriveIntent) {
        self.calls.push(ActuatorCall::Drive(*intent));
    }

    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Pump(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
