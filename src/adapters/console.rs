//! Serial / stdin console transport.
//!
//! A reader thread turns each input line into a bus request, waits for
//! the control loop to answer, and prints the rendered reply.  Lines
//! starting with `sim` go to the simulator instead when one is attached.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::adapters::sim::{SimControl, parse_sim_line};
use crate::error::CommandError;
use crate::remote::bus::CommandBus;
use crate::remote::protocol::{parse_line, render_reply};

/// How long the console waits for the control loop to answer.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);
const REPLY_POLL: Duration = Duration::from_millis(5);

/// Spawn the reader thread on `input`, writing replies to `output`.
pub fn spawn<I, O>(
    bus: Arc<CommandBus>,
    sim: Option<Arc<SimControl>>,
    input: I,
    output: O,
) -> std::io::Result<thread::JoinHandle<()>>
where
    I: BufRead + Send + 'static,
    O: Write + Send + 'static,
{
    thread::Builder::new()
        .name("console".into())
        .spawn(move || run(&bus, sim.as_deref(), input, output))
}

/// Serve lines until `input` hits EOF or `output` fails.
pub fn run<I: BufRead, O: Write>(bus: &CommandBus, sim: Option<&SimControl>, input: I, mut output: O) {
    info!("console ready");
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(bus, sim, &line);
        if writeln!(output, "{}", reply).and_then(|()| output.flush()).is_err() {
            break;
        }
    }
    info!("console closed");
}

fn handle_line(bus: &CommandBus, sim: Option<&SimControl>, line: &str) -> String {
    if let (Some(ctl), Some(parsed)) = (sim, parse_sim_line(line)) {
        return match parsed {
            Ok(ev) => match ctl.try_send(ev) {
                Ok(()) => "ok".to_string(),
                Err(_) => render_reply(&Err(CommandError::Busy)),
            },
            Err(usage) => format!("error: {}", usage),
        };
    }

    let id = match bus.submit_parsed(parse_line(line)) {
        Ok(id) => id,
        Err(e) => {
            warn!("console: {}", e);
            return render_reply(&Err(e));
        }
    };

    let deadline = Instant::now() + REPLY_TIMEOUT;
    while Instant::now() < deadline {
        match bus.take_reply() {
            Some(reply) if reply.id == id => return render_reply(&reply.outcome),
            Some(stale) => warn!("console: dropping stale reply {}", stale.id),
            None => thread::sleep(REPLY_POLL),
        }
    }
    "error: no reply from control loop".to_string()
}
