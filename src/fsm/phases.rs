//! Concrete phase handler functions and table builder.
//!
//! Each phase is three plain `fn` pointers.  Completion is purely
//! duration-based: once a phase starts, the maneuver runs open-loop to
//! the end and does not re-sense the obstacle.
//!
//! ```text
//!  IDLE ──[0 < d < threshold]──▶ RETREATING ──[retreat_ms]──▶ TURNING_AWAY
//!    ▲   (no obstacle: cruise)    (backward)                    (right)
//!    │                                                             │
//!    │                                                     [turn_away_ms]
//!    │                                                             ▼
//!    └────[return_ms]──── RETURNING ◀──────[advance_ms]────── ADVANCING
//!          (stop)          (left)                              (forward)
//! ```

use super::context::ManeuverContext;
use super::PhaseDescriptor;
use crate::app::state::{AvoidancePhase, Direction};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; AvoidancePhase::COUNT] {
    [
        // Index 0 — Idle
        PhaseDescriptor {
            id: AvoidancePhase::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_update: idle_update,
        },
        // Index 1 — Retreating
        PhaseDescriptor {
            id: AvoidancePhase::Retreating,
            name: "Retreating",
            on_enter: Some(retreating_enter),
            on_update: retreating_update,
        },
        // Index 2 — TurningAway
        PhaseDescriptor {
            id: AvoidancePhase::TurningAway,
            name: "TurningAway",
            on_enter: Some(turning_away_enter),
            on_update: turning_away_update,
        },
        // Index 3 — Advancing
        PhaseDescriptor {
            id: AvoidancePhase::Advancing,
            name: "Advancing",
            on_enter: Some(advancing_enter),
            on_update: advancing_update,
        },
        // Index 4 — Returning
        PhaseDescriptor {
            id: AvoidancePhase::Returning,
            name: "Returning",
            on_enter: Some(returning_enter),
            on_update: returning_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE — cruising, watching for an obstacle
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut ManeuverContext<'_>) {
    ctx.set_drive(Direction::Stop);
    info!("AVOID: maneuver complete, stopped");
}

fn idle_update(ctx: &mut ManeuverContext<'_>) -> Option<AvoidancePhase> {
    if ctx.obstacle_ahead() {
        info!(
            "AVOID: obstacle at {} cm (< {} cm), escaping",
            ctx.robot.obstacle_distance_cm, ctx.config.obstacle_threshold_cm
        );
        return Some(AvoidancePhase::Retreating);
    }

    if ctx.robot.drive_intent.direction != Direction::Forward {
        debug!("AVOID: path clear, cruising forward");
    }
    ctx.set_drive(Direction::Forward);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RETREATING — back away from the obstacle
// ═══════════════════════════════════════════════════════════════════════════

fn retreating_enter(ctx: &mut ManeuverContext<'_>) {
    ctx.set_drive(Direction::Backward);
}

fn retreating_update(ctx: &mut ManeuverContext<'_>) -> Option<AvoidancePhase> {
    (ctx.ms_in_phase() >= ctx.config.retreat_ms).then_some(AvoidancePhase::TurningAway)
}

// ═══════════════════════════════════════════════════════════════════════════
//  TURNING_AWAY — pivot right
// ═══════════════════════════════════════════════════════════════════════════

fn turning_away_enter(ctx: &mut ManeuverContext<'_>) {
    ctx.set_drive(Direction::Right);
}

fn turning_away_update(ctx: &mut ManeuverContext<'_>) -> Option<AvoidancePhase> {
    (ctx.ms_in_phase() >= ctx.config.turn_away_ms).then_some(AvoidancePhase::Advancing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ADVANCING — drive past the obstacle
// ═══════════════════════════════════════════════════════════════════════════

fn advancing_enter(ctx: &mut ManeuverContext<'_>) {
    ctx.set_drive(Direction::Forward);
}

fn advancing_update(ctx: &mut ManeuverContext<'_>) -> Option<AvoidancePhase> {
    (ctx.ms_in_phase() >= ctx.config.advance_ms).then_some(AvoidancePhase::Returning)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RETURNING — pivot left back onto the original heading
// ═══════════════════════════════════════════════════════════════════════════

fn returning_enter(ctx: &mut ManeuverContext<'_>) {
    ctx.set_drive(Direction::Left);
}

fn returning_update(ctx: &mut ManeuverContext<'_>) -> Option<AvoidancePhase> {
    (ctx.ms_in_phase() >= ctx.config.return_ms).then_some(AvoidancePhase::Idle)
}
