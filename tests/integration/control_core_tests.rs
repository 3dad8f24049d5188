//! Integration tests for the ControlCore → sequencer/policy/safety →
//! actuators pipeline, driven through the port traits only.

use firebot::app::commands::{AppCommand, CommandReply, PumpAction};
use firebot::app::events::{AppEvent, PumpSource};
use firebot::app::service::ControlCore;
use firebot::app::state::{AvoidancePhase, Direction, Mode, SensorSnapshot};
use firebot::config::SystemConfig;

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

fn make_core() -> (ControlCore, MockHardware, RecordingSink) {
    let mut core = ControlCore::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    core.start(&mut hw, &mut sink);
    (core, hw, sink)
}

fn autonomous() -> (ControlCore, MockHardware, RecordingSink) {
    let (mut core, mut hw, mut sink) = make_core();
    core.handle_command(AppCommand::SetMode(Mode::Autonomous), 0, &mut hw, &mut sink);
    (core, hw, sink)
}

fn pump(action: PumpAction, manual: bool) -> AppCommand {
    AppCommand::Pump { action, manual }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_kills_actuators_and_stays_remote() {
    let (core, hw, sink) = make_core();
    assert_eq!(hw.calls, vec![ActuatorCall::AllOff]);
    assert_eq!(sink.events, vec![AppEvent::Started(Mode::Remote)]);
    assert_eq!(core.robot().mode, Mode::Remote);
    assert!(!core.robot().is_moving());
}

// ── Obstacle escape maneuver ──────────────────────────────────

#[test]
fn obstacle_run_walks_the_full_maneuver() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.script_obstacles(&[200, 15, 15, 15, 15, 15]);

    let steps = [
        (0, AvoidancePhase::Idle, Direction::Forward),
        (50, AvoidancePhase::Retreating, Direction::Backward),
        (1050, AvoidancePhase::TurningAway, Direction::Right),
        (1550, AvoidancePhase::Advancing, Direction::Forward),
        (3550, AvoidancePhase::Returning, Direction::Left),
        (4050, AvoidancePhase::Idle, Direction::Stop),
    ];
    for (now, phase, direction) in steps {
        core.tick(now, &mut hw, &mut sink);
        assert_eq!(core.robot().avoidance_phase, phase, "phase at t={}", now);
        assert_eq!(hw.last_direction(), direction, "drive at t={}", now);
    }

    let phase_events = sink.count(|e| matches!(e, AppEvent::PhaseChanged { .. }));
    assert_eq!(phase_events, 5);
}

#[test]
fn phase_holds_until_its_duration_elapses() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_obstacle(Some(10));
    core.tick(100, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::Retreating);

    core.tick(1099, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::Retreating);
    core.tick(1100, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::TurningAway);
}

#[test]
fn unknown_distance_never_triggers_escape() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_obstacle(None);
    for t in 0..20 {
        core.tick(t * 50, &mut hw, &mut sink);
    }
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::Idle);
    assert_eq!(hw.last_direction(), Direction::Forward);
}

#[test]
fn drive_commands_mid_maneuver_are_ignored() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_obstacle(Some(10));
    core.tick(0, &mut hw, &mut sink);
    hw.set_obstacle(Some(150));

    let reply = core.handle_command(AppCommand::Drive(Direction::Left), 10, &mut hw, &mut sink);
    assert_eq!(reply, CommandReply::Ok);
    assert_eq!(core.robot().drive_intent.direction, Direction::Backward);
    assert_eq!(core.robot().last_remote_command_at, None);
}

#[test]
fn mode_switch_cancels_maneuver_and_stops() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_obstacle(Some(10));
    core.tick(0, &mut hw, &mut sink);
    core.tick(1000, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::TurningAway);

    core.handle_command(AppCommand::SetMode(Mode::Remote), 1200, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::Idle);
    assert!(!core.robot().is_moving());
    assert_eq!(hw.last_direction(), Direction::Stop);

    // Remote mode: the sequencer no longer drives, even with an obstacle.
    core.tick(1250, &mut hw, &mut sink);
    assert_eq!(core.robot().avoidance_phase, AvoidancePhase::Idle);
    assert_eq!(hw.last_direction(), Direction::Stop);
}

// ── Remote dead-man ───────────────────────────────────────────

#[test]
fn remote_silence_stops_on_following_tick() {
    let (mut core, mut hw, mut sink) = make_core();
    core.handle_command(AppCommand::Drive(Direction::Forward), 0, &mut hw, &mut sink);

    core.tick(4999, &mut hw, &mut sink);
    core.tick(5000, &mut hw, &mut sink);
    assert_eq!(hw.last_direction(), Direction::Forward);

    core.tick(5001, &mut hw, &mut sink);
    assert_eq!(hw.last_direction(), Direction::Stop);
    assert_eq!(core.safety_trips(), 1);
    assert!(sink.events.contains(&AppEvent::SafetyStop { silent_ms: 5001 }));
}

#[test]
fn repeated_drive_commands_keep_the_robot_moving() {
    let (mut core, mut hw, mut sink) = make_core();
    for t in (0..20_000).step_by(1000) {
        core.handle_command(AppCommand::Drive(Direction::Right), t, &mut hw, &mut sink);
        core.tick(t + 500, &mut hw, &mut sink);
    }
    assert_eq!(hw.last_direction(), Direction::Right);
    assert_eq!(core.safety_trips(), 0);
}

#[test]
fn autonomous_motion_never_times_out() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_obstacle(Some(150));
    for t in 0..10 {
        core.tick(t * 10_000, &mut hw, &mut sink);
    }
    assert_eq!(hw.last_direction(), Direction::Forward);
    assert_eq!(core.safety_trips(), 0);
}

// ── Fire response ─────────────────────────────────────────────

#[test]
fn autonomous_fire_starts_pump_next_tick() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_fire(true);
    core.tick(50, &mut hw, &mut sink);
    assert!(core.robot().pump_on);
    assert!(hw.pump_on());
    assert!(sink.events.contains(&AppEvent::PumpChanged {
        on: true,
        manual_override: false,
        source: PumpSource::Policy,
    }));

    hw.set_fire(false);
    core.tick(100, &mut hw, &mut sink);
    assert!(!hw.pump_on());
}

#[test]
fn remote_fire_leaves_pump_alone() {
    let (mut core, mut hw, mut sink) = make_core();
    hw.set_fire(true);
    core.tick(50, &mut hw, &mut sink);
    assert!(!core.robot().pump_on);

    core.handle_command(pump(PumpAction::Start, true), 60, &mut hw, &mut sink);
    hw.set_fire(false);
    core.tick(100, &mut hw, &mut sink);
    assert!(core.robot().pump_on);
}

#[test]
fn manual_override_latches_until_released() {
    let (mut core, mut hw, mut sink) = autonomous();
    hw.set_fire(true);
    core.handle_command(pump(PumpAction::Stop, true), 10, &mut hw, &mut sink);
    for t in 1..10 {
        core.tick(t * 50, &mut hw, &mut sink);
        assert!(!core.robot().pump_on, "latched pump toggled at tick {}", t);
    }

    core.handle_command(pump(PumpAction::Auto, false), 600, &mut hw, &mut sink);
    core.tick(650, &mut hw, &mut sink);
    assert!(core.robot().pump_on);
}

#[test]
fn mode_change_releases_override() {
    let (mut core, mut hw, mut sink) = make_core();
    hw.set_fire(true);
    core.handle_command(pump(PumpAction::Stop, true), 0, &mut hw, &mut sink);
    assert!(core.robot().pump_manual_override);

    core.handle_command(AppCommand::SetMode(Mode::Autonomous), 10, &mut hw, &mut sink);
    assert!(!core.robot().pump_manual_override);
    core.tick(50, &mut hw, &mut sink);
    assert!(core.robot().pump_on);
}

// ── Status ────────────────────────────────────────────────────

#[test]
fn status_repolls_sensors() {
    let (mut core, mut hw, mut sink) = make_core();
    hw.set_sensors(SensorSnapshot {
        fire_detected: false,
        obstacle_cm: Some(33),
        reservoir_pct: Some(64),
    });
    let reads = hw.reads;
    let CommandReply::Status(status) = core.handle_command(AppCommand::GetStatus, 0, &mut hw, &mut sink) else {
        panic!("status expected");
    };
    assert_eq!(hw.reads, reads + 1);
    assert_eq!(status.obstacle_distance_cm, 33);
    assert_eq!(status.reservoir_level_pct, 64);
    assert_eq!(status.mode, Mode::Remote);
    assert!(!status.is_moving);
}

#[test]
fn status_reports_no_echo_as_minus_one() {
    let (mut core, mut hw, mut sink) = make_core();
    hw.set_obstacle(None);
    let CommandReply::Status(status) = core.handle_command(AppCommand::GetStatus, 0, &mut hw, &mut sink) else {
        panic!("status expected");
    };
    assert_eq!(status.obstacle_distance_cm, -1);
}
