//! Control core — the hexagonal centre.
//!
//! [`ControlCore`] owns the robot-state record, the maneuver sequencer
//! and the dead-man supervisor.  It exposes a clean, hardware-agnostic
//! API.  All I/O flows through port traits injected at call sites, making
//! the entire core testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          ControlCore          │
//! ActuatorPort ◀──│ Arbiter · Sequencer · Policy │
//!                 │        · Safety timeout       │
//!                 └──────────────────────────────┘
//! ```
//!
//! Every method takes `&mut self`, so exactly one caller can mutate the
//! record at a time; cross-thread callers go through the
//! [`CommandBus`](crate::remote::bus::CommandBus) instead of sharing the core.

use log::{debug, info, warn};

use crate::arbiter::{self, DriveOwner};
use crate::config::SystemConfig;
use crate::error::CommandError;
use crate::fire_response::{self, PumpDecision};
use crate::fsm::context::ManeuverContext;
use crate::fsm::{ManeuverSequencer, PhaseTransition};
use crate::remote::bus::CommandBus;
use crate::safety::SafetyTimeout;

use super::commands::{AppCommand, CommandReply, PumpAction};
use super::events::{AppEvent, PumpSource};
use super::ports::{ActuatorPort, EventSink, SensorPort};
use super::state::{Direction, DriveIntent, Mode, RobotState, StatusSnapshot};

// ───────────────────────────────────────────────────────────────
// ControlCore
// ───────────────────────────────────────────────────────────────

/// The control core orchestrates all domain logic.
pub struct ControlCore {
    robot: RobotState,
    config: SystemConfig,
    sequencer: ManeuverSequencer,
    safety: SafetyTimeout,
    tick_count: u64,
    last_telemetry_ms: u64,
}

impl ControlCore {
    /// Construct the core in its power-on state (remote, stopped, pump off).
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let safety = SafetyTimeout::new(config.remote_timeout_ms);
        Self {
            robot: RobotState::new(),
            config,
            sequencer: ManeuverSequencer::new(),
            safety,
            tick_count: 0,
            last_telemetry_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every actuator in its safe state and announce the start.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started(self.robot.mode));
        info!("ControlCore started in {} mode", self.robot.mode);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle:
    /// sensors → arbitration/maneuver → fire policy → dead-man → actuators.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Read sensors via SensorPort
        self.refresh_sensors(hw, sink);

        // 2. Whoever owns the drive this tick
        match arbiter::drive_owner(self.robot.mode) {
            DriveOwner::Sequencer => {
                let mut ctx = ManeuverContext::new(&mut self.robot, &self.config, now_ms);
                if let Some(t) = self.sequencer.tick(&mut ctx) {
                    emit_phase(t, sink);
                }
            }
            DriveOwner::Operator => {
                // Intent already set by the last accepted drive command.
            }
        }

        // 3. Fire-response policy
        self.run_fire_policy(sink);

        // 4. Remote dead-man switch
        if let Some(silent_ms) = self.safety.enforce(&mut self.robot, now_ms) {
            sink.emit(&AppEvent::SafetyStop { silent_ms });
        }

        // 5. Apply actuator commands via ActuatorPort
        self.apply_actuators(hw);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one validated command.  Runs between ticks, never inside one.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> CommandReply {
        match cmd {
            AppCommand::Drive(direction) => {
                self.drive(direction, now_ms, hw);
                CommandReply::Ok
            }
            AppCommand::SetMode(mode) => {
                let switch = arbiter::set_mode(&mut self.robot, mode, now_ms);
                if let Some(t) = switch.cancelled {
                    emit_phase(t, sink);
                }
                sink.emit(&AppEvent::ModeChanged {
                    from: switch.from,
                    to: switch.to,
                });
                hw.apply_drive(&self.robot.drive_intent);
                CommandReply::Ok
            }
            AppCommand::Pump { action, manual } => {
                self.pump(action, manual, sink);
                hw.set_pump(self.robot.pump_on);
                CommandReply::Ok
            }
            AppCommand::GetStatus => {
                self.refresh_sensors(hw, sink);
                self.run_fire_policy(sink);
                hw.set_pump(self.robot.pump_on);
                CommandReply::Status(self.robot.snapshot())
            }
            AppCommand::Ping => CommandReply::Pong,
        }
    }

    /// Route a parsed command, or report why it never became one.
    pub fn dispatch(
        &mut self,
        parsed: Result<AppCommand, CommandError>,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> Result<CommandReply, CommandError> {
        match parsed {
            Ok(cmd) => Ok(self.handle_command(cmd, now_ms, hw, sink)),
            Err(e) => {
                warn!("command rejected: {}", e);
                sink.emit(&AppEvent::CommandRejected(e));
                Err(e)
            }
        }
    }

    /// Apply every command queued on `bus` since the last call.  Runs at
    /// the start of a control cycle, before [`tick`](Self::tick).
    pub fn service_bus(
        &mut self,
        bus: &CommandBus,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> usize {
        bus.drain(|parsed| self.dispatch(parsed, now_ms, &mut *hw, &mut *sink))
    }

    // ── Telemetry ─────────────────────────────────────────────

    /// Emit a telemetry snapshot if the configured interval has elapsed.
    /// An interval of zero disables telemetry.
    pub fn maybe_emit_telemetry(&mut self, now_ms: u64, sink: &mut impl EventSink) -> bool {
        let interval_ms = u64::from(self.config.telemetry_interval_secs) * 1000;
        if interval_ms == 0 || now_ms.saturating_sub(self.last_telemetry_ms) < interval_ms {
            return false;
        }
        self.last_telemetry_ms = now_ms;
        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-only view of the robot-state record.
    pub fn robot(&self) -> &RobotState {
        &self.robot
    }

    /// Snapshot of the current state without re-polling sensors.
    pub fn build_telemetry(&self) -> StatusSnapshot {
        self.robot.snapshot()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Dead-man stops since startup.
    pub fn safety_trips(&self) -> u32 {
        self.safety.trips()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn refresh_sensors(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let snapshot = hw.read_all();
        let had_fire = self.robot.fire_detected;
        self.robot.apply_sensors(&snapshot);
        debug!(
            "sensors: fire={} obstacle={}cm reservoir={}%",
            self.robot.fire_detected, self.robot.obstacle_distance_cm, self.robot.reservoir_level_pct
        );
        if self.robot.fire_detected != had_fire {
            info!("FIRE: {}", if self.robot.fire_detected { "detected" } else { "cleared" });
            sink.emit(&AppEvent::FireChanged(self.robot.fire_detected));
        }
    }

    fn run_fire_policy(&mut self, sink: &mut impl EventSink) {
        match fire_response::apply(&mut self.robot) {
            PumpDecision::Hold => {}
            decision => {
                info!("PUMP: policy {:?} (fire={})", decision, self.robot.fire_detected);
                sink.emit(&AppEvent::PumpChanged {
                    on: self.robot.pump_on,
                    manual_override: self.robot.pump_manual_override,
                    source: PumpSource::Policy,
                });
            }
        }
    }

    fn drive(&mut self, direction: Direction, now_ms: u64, hw: &mut impl ActuatorPort) {
        if self.robot.mode != Mode::Remote {
            // Accepted, but the sequencer owns the drive in autonomous mode.
            debug!("drive {:?} ignored: autonomous mode", direction);
            return;
        }
        self.robot.drive_intent = DriveIntent::new(
            direction,
            self.config.cruise_speed,
            self.config.turn_speed,
            self.config.max_duty,
        );
        self.robot.last_remote_command_at = Some(now_ms);
        hw.apply_drive(&self.robot.drive_intent);
    }

    fn pump(&mut self, action: PumpAction, manual: bool, sink: &mut impl EventSink) {
        let before = (self.robot.pump_on, self.robot.pump_manual_override);
        match action {
            PumpAction::Start => {
                self.robot.pump_on = true;
                self.robot.pump_manual_override = manual;
            }
            PumpAction::Stop => {
                self.robot.pump_on = false;
                self.robot.pump_manual_override = manual;
            }
            PumpAction::Auto => {
                self.robot.pump_manual_override = false;
            }
        }
        if (self.robot.pump_on, self.robot.pump_manual_override) != before {
            info!(
                "PUMP: operator {:?} -> on={} override={}",
                action, self.robot.pump_on, self.robot.pump_manual_override
            );
            sink.emit(&AppEvent::PumpChanged {
                on: self.robot.pump_on,
                manual_override: self.robot.pump_manual_override,
                source: PumpSource::Operator,
            });
        }
    }

    /// Translate the record's intent into port calls.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        hw.apply_drive(&self.robot.drive_intent);
        hw.set_pump(self.robot.pump_on);
    }
}

fn emit_phase(t: PhaseTransition, sink: &mut impl EventSink) {
    sink.emit(&AppEvent::PhaseChanged {
        from: t.from,
        to: t.to,
    });
}
