//! Host simulator — a toy world behind the sensor and actuator ports.
//!
//! The world is a single range reading ahead of the robot plus a flame
//! flag and a water tank:
//!
//! - driving forward closes the range, driving backward opens it;
//! - pivoting long enough swings the nose to open floor;
//! - the tank drains while the pump runs.
//!
//! The console can poke the world through [`SimEvent`]s (`sim fire on`,
//! `sim obstacle 15`, ...).

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::debug;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::app::state::{Direction, DriveIntent, SensorSnapshot};

/// Range reported when nothing is in front of the robot.
pub const OPEN_FLOOR_CM: u16 = 200;
/// Pivot time that swings the nose to open floor.
pub const CLEAR_TURN_MS: u64 = 400;
/// Ground speed at full duty, in cm/s.
pub const FULL_SPEED_CM_S: u64 = 50;
/// Tank drain while pumping, in ms per percent.
pub const DRAIN_MS_PER_PCT: u64 = 200;

/// Manual nudges to the simulated world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Fire(bool),
    /// `None` = no echo.
    Obstacle(Option<u16>),
    Reservoir(u8),
}

/// Channel the console uses to nudge the world.
pub type SimControl = Channel<CriticalSectionRawMutex, SimEvent, 4>;

/// Parse a `sim ...` console line.  Returns `None` when the line is not
/// addressed to the simulator.
pub fn parse_sim_line(line: &str) -> Option<Result<SimEvent, &'static str>> {
    let mut words = line.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("sim") {
        return None;
    }
    let what = words.next().map(str::to_ascii_lowercase);
    let arg = words.next().map(str::to_ascii_lowercase);
    Some(match (what.as_deref(), arg.as_deref()) {
        (Some("fire"), Some("on")) => Ok(SimEvent::Fire(true)),
        (Some("fire"), Some("off")) => Ok(SimEvent::Fire(false)),
        (Some("obstacle"), Some("none")) => Ok(SimEvent::Obstacle(None)),
        (Some("obstacle"), Some(cm)) => cm
            .parse()
            .map(|cm| SimEvent::Obstacle(Some(cm)))
            .map_err(|_| "obstacle wants centimetres or 'none'"),
        (Some("reservoir"), Some(pct)) => pct
            .parse::<u8>()
            .map(|p| SimEvent::Reservoir(p.min(100)))
            .map_err(|_| "reservoir wants a percentage"),
        _ => Err("usage: sim fire on|off | sim obstacle <cm>|none | sim reservoir <pct>"),
    })
}

pub struct SimHardware {
    obstacle_cm: Option<u16>,
    fire: bool,
    /// Reservoir in hundredths of a percent, for smooth draining.
    reservoir_centi_pct: u32,
    drive: DriveIntent,
    pump_on: bool,
    max_duty: i16,
    turning_ms: u64,
    last_step_ms: u64,
    /// Sub-centimetre travel carried between steps, in cm·ms.
    travel_rem: u64,
    drain_rem: u64,
}

impl SimHardware {
    /// Open floor, no fire, full tank.
    pub fn new(max_duty: i16) -> Self {
        Self {
            obstacle_cm: Some(OPEN_FLOOR_CM),
            fire: false,
            reservoir_centi_pct: 100 * 100,
            drive: DriveIntent::STOP,
            pump_on: false,
            max_duty: max_duty.max(1),
            turning_ms: 0,
            last_step_ms: 0,
            travel_rem: 0,
            drain_rem: 0,
        }
    }

    pub fn apply(&mut self, event: SimEvent) {
        debug!("sim: {:?}", event);
        match event {
            SimEvent::Fire(on) => self.fire = on,
            SimEvent::Obstacle(cm) => self.obstacle_cm = cm,
            SimEvent::Reservoir(pct) => self.reservoir_centi_pct = u32::from(pct.min(100)) * 100,
        }
    }

    /// Advance the world to `now_ms` under the current actuator outputs.
    pub fn step(&mut self, now_ms: u64) {
        let dt = now_ms.saturating_sub(self.last_step_ms);
        self.last_step_ms = now_ms;
        if dt == 0 {
            return;
        }

        match self.drive.direction {
            Direction::Forward | Direction::Backward => {
                self.turning_ms = 0;
                let speed = u64::from(self.drive.left_speed.unsigned_abs());
                // cm·ms travelled; 1000 cm·ms per cm.
                self.travel_rem += speed * FULL_SPEED_CM_S * dt / self.max_duty.unsigned_abs() as u64;
                let cm = self.travel_rem / 1000;
                self.travel_rem %= 1000;
                let cm = u16::try_from(cm).unwrap_or(u16::MAX);
                if let Some(range) = self.obstacle_cm {
                    self.obstacle_cm = Some(if self.drive.direction == Direction::Forward {
                        range.saturating_sub(cm).max(1)
                    } else {
                        range.saturating_add(cm).min(OPEN_FLOOR_CM)
                    });
                }
            }
            Direction::Left | Direction::Right => {
                self.turning_ms += dt;
                if self.turning_ms >= CLEAR_TURN_MS {
                    self.obstacle_cm = Some(OPEN_FLOOR_CM);
                }
            }
            Direction::Stop => self.turning_ms = 0,
        }

        if self.pump_on {
            // 100 centi-percent per DRAIN_MS_PER_PCT.
            self.drain_rem += dt * 100;
            let drained = self.drain_rem / DRAIN_MS_PER_PCT;
            self.drain_rem %= DRAIN_MS_PER_PCT;
            self.reservoir_centi_pct = self
                .reservoir_centi_pct
                .saturating_sub(u32::try_from(drained).unwrap_or(u32::MAX));
        }
    }

    pub fn drive(&self) -> DriveIntent {
        self.drive
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn reservoir_pct(&self) -> u8 {
        (self.reservoir_centi_pct / 100) as u8
    }
}

impl SensorPort for SimHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            fire_detected: self.fire,
            obstacle_cm: self.obstacle_cm,
            reservoir_pct: Some(self.reservoir_pct()),
        }
    }
}

impl ActuatorPort for SimHardware {
    fn apply_drive(&mut self, intent: &DriveIntent) {
        self.drive = *intent;
    }

    fn set_pump(&mut self, on: bool) {
        self.pump_on = on;
    }

    fn all_off(&mut self) {
        self.drive = DriveIntent::STOP;
        self.pump_on = false;
    }
}
