//! Firebot — Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter / SimHardware   LogEventSink   MonotonicClock │
//! │  (Sensor+Actuator)               (EventSink)    (ClockPort)    │
//! │  Console thread ──▶ CommandBus                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlCore (pure logic)                  │    │
//! │  │  Arbiter · Sequencer · Fire policy · Safety timeout    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use firebot::adapters::console;
use firebot::adapters::log_sink::LogEventSink;
use firebot::adapters::time::MonotonicClock;
use firebot::app::ports::{ActuatorPort, ClockPort, SensorPort};
use firebot::app::service::ControlCore;
use firebot::config::SystemConfig;
use firebot::remote::bus::CommandBus;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    info!("Firebot v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    info!(
        "Config: loop={}ms threshold={}cm remote_timeout={}ms",
        config.control_loop_interval_ms, config.obstacle_threshold_cm, config.remote_timeout_ms
    );

    // ── 3. Transport ──────────────────────────────────────────
    let bus = Arc::new(CommandBus::new());

    run(config, bus)
}

/// Defaults, or a JSON file named by the first argument.
#[cfg(not(target_os = "espidf"))]
fn load_config() -> Result<SystemConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("No config file given, using defaults");
        return Ok(SystemConfig::default());
    };
    let text = std::fs::read_to_string(&path)?;
    let config = SystemConfig::from_json(&text)?;
    info!("Config loaded from {}", path);
    Ok(config)
}

#[cfg(target_os = "espidf")]
fn load_config() -> Result<SystemConfig> {
    let config = SystemConfig::default();
    config.validate()?;
    Ok(config)
}

#[cfg(not(target_os = "espidf"))]
fn run(config: SystemConfig, bus: Arc<CommandBus>) -> Result<()> {
    use firebot::adapters::sim::{SimControl, SimHardware};

    let sim_ctl = Arc::new(SimControl::new());
    let mut hw = SimHardware::new(config.max_duty);
    let console = console::spawn(
        Arc::clone(&bus),
        Some(Arc::clone(&sim_ctl)),
        std::io::BufReader::new(std::io::stdin()),
        std::io::stdout(),
    )?;

    info!("Simulator ready. Type commands (forward, mode auto, sim fire on, status, ...)");
    control_loop(config, &bus, &mut hw, |hw, now_ms| {
        while let Ok(ev) = sim_ctl.try_receive() {
            hw.apply(ev);
        }
        hw.step(now_ms);
        !console.is_finished()
    });
    info!("Console closed, shutting down");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn run(config: SystemConfig, bus: Arc<CommandBus>) -> Result<()> {
    let mut hw = firebot::adapters::board::take(&config)?;
    let _console = console::spawn(Arc::clone(&bus), None, std::io::BufReader::new(std::io::stdin()), std::io::stdout())?;

    info!("System ready. Entering control loop.");
    control_loop(config, &bus, &mut hw, |_, _| true);
    Ok(())
}

/// Fixed-rate cycle: commands, then one tick, then telemetry.
/// `before_cycle` runs first each time; returning `false` ends the loop.
fn control_loop<H>(
    config: SystemConfig,
    bus: &CommandBus,
    hw: &mut H,
    mut before_cycle: impl FnMut(&mut H, u64) -> bool,
) where
    H: SensorPort + ActuatorPort,
{
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let mut core = ControlCore::new(config);
    core.start(hw, &mut sink);

    loop {
        let now_ms = clock.now_ms();
        if !before_cycle(hw, now_ms) {
            break;
        }
        core.service_bus(bus, now_ms, hw, &mut sink);
        core.tick(now_ms, hw, &mut sink);
        core.maybe_emit_telemetry(now_ms, &mut sink);
        std::thread::sleep(interval);
    }

    hw.all_off();
    info!(
        "Stopped after {} ticks, {} safety stops, {} events",
        core.tick_count(),
        core.safety_trips(),
        sink.emitted()
    );
}
