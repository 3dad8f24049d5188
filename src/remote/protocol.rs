//! Text line protocol.
//!
//! One command per line, whitespace-separated, case-insensitive:
//!
//! ```text
//! forward | backward | left | right | stop
//! mode auto | mode remote
//! pump start|stop|auto [manual]
//! status
//! ping
//! ```
//!
//! Replies are `ok`, `pong`, `error: <reason>`, or the status snapshot as
//! one line of JSON.

use crate::app::commands::{AppCommand, CommandReply, PumpAction};
use crate::app::state::{Direction, Mode};
use crate::error::CommandError;

/// Parse one input line into a command.
pub fn parse_line(line: &str) -> Result<AppCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::UnknownCommand);
    };
    let head = head.to_ascii_lowercase();

    let cmd = match head.as_str() {
        "forward" | "backward" | "back" | "left" | "right" | "stop" => {
            AppCommand::Drive(head.parse::<Direction>()?)
        }
        "drive" => {
            let dir = words.next().ok_or(CommandError::InvalidDirection)?;
            AppCommand::Drive(dir.parse()?)
        }
        "mode" => {
            let mode = words.next().ok_or(CommandError::InvalidMode)?;
            AppCommand::SetMode(mode.parse::<Mode>()?)
        }
        "pump" => {
            let action = words.next().ok_or(CommandError::InvalidAction)?;
            let action = action.parse::<PumpAction>()?;
            let manual = match words.next() {
                None => false,
                Some(w) if w.eq_ignore_ascii_case("manual") => true,
                Some(_) => return Err(CommandError::InvalidAction),
            };
            AppCommand::Pump { action, manual }
        }
        "status" => AppCommand::GetStatus,
        "ping" => AppCommand::Ping,
        _ => return Err(CommandError::UnknownCommand),
    };

    if words.next().is_some() {
        return Err(match cmd {
            AppCommand::Drive(_) => CommandError::InvalidDirection,
            AppCommand::SetMode(_) => CommandError::InvalidMode,
            AppCommand::Pump { .. } => CommandError::InvalidAction,
            AppCommand::GetStatus | AppCommand::Ping => CommandError::UnknownCommand,
        });
    }
    Ok(cmd)
}

/// Render a command outcome as a single reply line.
pub fn render_reply(outcome: &Result<CommandReply, CommandError>) -> String {
    match outcome {
        Ok(CommandReply::Ok) => "ok".to_string(),
        Ok(CommandReply::Pong) => "pong".to_string(),
        Ok(CommandReply::Status(status)) => serde_json::to_string(status)
            .unwrap_or_else(|e| format!("error: status encoding failed ({})", e)),
        Err(e) => format!("error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::StatusSnapshot;

    #[test]
    fn parses_bare_directions() {
        assert_eq!(parse_line("forward"), Ok(AppCommand::Drive(Direction::Forward)));
        assert_eq!(parse_line("  STOP \n"), Ok(AppCommand::Drive(Direction::Stop)));
        assert_eq!(parse_line("drive left"), Ok(AppCommand::Drive(Direction::Left)));
        assert_eq!(parse_line("drive sideways"), Err(CommandError::InvalidDirection));
    }

    #[test]
    fn parses_mode() {
        assert_eq!(parse_line("mode auto"), Ok(AppCommand::SetMode(Mode::Autonomous)));
        assert_eq!(parse_line("mode Remote"), Ok(AppCommand::SetMode(Mode::Remote)));
        assert_eq!(parse_line("mode turbo"), Err(CommandError::InvalidMode));
        assert_eq!(parse_line("mode"), Err(CommandError::InvalidMode));
    }

    #[test]
    fn parses_pump_with_optional_manual() {
        assert_eq!(
            parse_line("pump start manual"),
            Ok(AppCommand::Pump {
                action: PumpAction::Start,
                manual: true
            })
        );
        assert_eq!(
            parse_line("pump stop"),
            Ok(AppCommand::Pump {
                action: PumpAction::Stop,
                manual: false
            })
        );
        assert_eq!(parse_line("pump spray"), Err(CommandError::InvalidAction));
        assert_eq!(parse_line("pump start now"), Err(CommandError::InvalidAction));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(parse_line(""), Err(CommandError::UnknownCommand));
        assert_eq!(parse_line("jump"), Err(CommandError::UnknownCommand));
        assert_eq!(parse_line("ping twice"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn renders_replies() {
        assert_eq!(render_reply(&Ok(CommandReply::Ok)), "ok");
        assert_eq!(render_reply(&Ok(CommandReply::Pong)), "pong");
        assert_eq!(render_reply(&Err(CommandError::Busy)), "error: command queue full");
    }

    #[test]
    fn status_renders_camel_case_json() {
        let status = StatusSnapshot {
            fire_detected: true,
            reservoir_level_pct: 40,
            obstacle_distance_cm: -1,
            is_moving: false,
            drive_intent: Direction::Stop,
            mode: Mode::Remote,
            pump_on: false,
        };
        let line = render_reply(&Ok(CommandReply::Status(status)));
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["fireDetected"], true);
        assert_eq!(v["reservoirLevelPct"], 40);
        assert_eq!(v["obstacleDistanceCm"], -1);
        assert_eq!(v["driveIntent"], "STOP");
        assert_eq!(v["mode"], "REMOTE");
    }
}
