//! End-to-end command path: text line → protocol → CommandBus →
//! ControlCore, with replies rendered back to text.

use firebot::app::events::AppEvent;
use firebot::app::service::ControlCore;
use firebot::app::state::{Direction, Mode};
use firebot::config::SystemConfig;
use firebot::error::CommandError;
use firebot::remote::bus::CommandBus;
use firebot::remote::protocol::{parse_line, render_reply};

use crate::mock_hw::{MockHardware, RecordingSink};

/// Submit each line, run one control cycle, collect rendered replies.
fn cycle(
    core: &mut ControlCore,
    bus: &CommandBus,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    now_ms: u64,
    lines: &[&str],
) -> Vec<String> {
    for line in lines {
        bus.submit_parsed(parse_line(line)).unwrap();
    }
    core.service_bus(bus, now_ms, hw, sink);
    core.tick(now_ms, hw, sink);
    std::iter::from_fn(|| bus.take_reply())
        .map(|r| render_reply(&r.outcome))
        .collect()
}

fn setup() -> (ControlCore, CommandBus, MockHardware, RecordingSink) {
    let mut core = ControlCore::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    core.start(&mut hw, &mut sink);
    (core, CommandBus::new(), hw, sink)
}

#[test]
fn queued_commands_apply_before_the_tick() {
    let (mut core, bus, mut hw, mut sink) = setup();
    let replies = cycle(&mut core, &bus, &mut hw, &mut sink, 0, &["ping", "forward"]);
    assert_eq!(replies, vec!["pong", "ok"]);
    assert_eq!(hw.last_direction(), Direction::Forward);
}

#[test]
fn commands_run_in_submission_order() {
    let (mut core, bus, mut hw, mut sink) = setup();
    // The later mode switch must undo the earlier drive.
    let replies = cycle(&mut core, &bus, &mut hw, &mut sink, 0, &["left", "mode remote"]);
    assert_eq!(replies, vec!["ok", "ok"]);
    assert!(!core.robot().is_moving());
}

#[test]
fn bad_lines_are_rejected_without_side_effects() {
    let (mut core, bus, mut hw, mut sink) = setup();
    let before = core.robot().clone();
    let replies = cycle(
        &mut core,
        &bus,
        &mut hw,
        &mut sink,
        0,
        &["sideways", "mode turbo", "pump spray", "drive"],
    );
    assert_eq!(
        replies,
        vec![
            "error: unknown command",
            "error: invalid mode",
            "error: invalid pump action",
            "error: invalid direction",
        ]
    );
    assert_eq!(core.robot(), &before);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CommandRejected(_))),
        4
    );
    assert!(sink.events.contains(&AppEvent::CommandRejected(CommandError::InvalidMode)));
}

#[test]
fn status_line_returns_dashboard_json() {
    let (mut core, bus, mut hw, mut sink) = setup();
    hw.set_obstacle(Some(120));
    let replies = cycle(&mut core, &bus, &mut hw, &mut sink, 0, &["mode auto", "status"]);
    assert_eq!(replies[0], "ok");

    let v: serde_json::Value = serde_json::from_str(&replies[1]).unwrap();
    assert_eq!(v["mode"], "AUTONOMOUS");
    assert_eq!(v["obstacleDistanceCm"], 120);
    assert_eq!(v["isMoving"], false);
    assert_eq!(v["pumpOn"], false);
    assert_eq!(core.robot().mode, Mode::Autonomous);
}

#[test]
fn full_bus_reports_busy() {
    let (_core, bus, _hw, _sink) = setup();
    let mut results = Vec::new();
    for _ in 0..20 {
        results.push(bus.submit_parsed(parse_line("ping")));
    }
    assert!(results.iter().any(|r| *r == Err(CommandError::Busy)));
    assert_eq!(render_reply(&Err(CommandError::Busy)), "error: command queue full");
}
