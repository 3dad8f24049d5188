//! Function-pointer state machine for the obstacle-escape maneuver.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  PhaseTable                                            │
//! │  ┌──────────────┬───────────┬────────────────────────┐ │
//! │  │ Phase        │ on_enter  │ on_update              │ │
//! │  ├──────────────┼───────────┼────────────────────────┤ │
//! │  │ Idle         │ fn(ctx)   │ fn(ctx) -> Option<>    │ │
//! │  │ Retreating   │ fn(ctx)   │ fn(ctx) -> Option<>    │ │
//! │  │ TurningAway  │ fn(ctx)   │ fn(ctx) -> Option<>    │ │
//! │  │ Advancing    │ fn(ctx)   │ fn(ctx) -> Option<>    │ │
//! │  │ Returning    │ fn(ctx)   │ fn(ctx) -> Option<>    │ │
//! │  └──────────────┴───────────┴────────────────────────┘ │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Each autonomous tick the engine calls `on_update` for the phase stored
//! in `RobotState.avoidance_phase`.  If it returns `Some(next)`, the engine
//! stamps `avoidance_phase_started_at`, stores the new phase and runs its
//! `on_enter`, which sets exactly one drive intent.  The machine is
//! resumable: nothing ever sleeps, so a multi-second maneuver is just a
//! phase plus a start timestamp advanced once per tick.

pub mod context;
pub mod phases;

use context::ManeuverContext;
use log::info;

use crate::app::state::{AvoidancePhase, RobotState};

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.  Runs exactly once per transition.
pub type PhaseActionFn = fn(&mut ManeuverContext<'_>);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type PhaseUpdateFn = fn(&mut ManeuverContext<'_>) -> Option<AvoidancePhase>;

// ---------------------------------------------------------------------------
// Phase descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single maneuver phase.
pub struct PhaseDescriptor {
    pub id: AvoidancePhase,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_update: PhaseUpdateFn,
}

/// A phase change reported back to the caller for event emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: AvoidancePhase,
    pub to: AvoidancePhase,
}

// ---------------------------------------------------------------------------
// Sequencer engine
// ---------------------------------------------------------------------------

/// The maneuver sequencer.  Owns only the immutable phase table; the
/// current phase lives in the robot-state record.
pub struct ManeuverSequencer {
    /// Fixed-size table indexed by `AvoidancePhase as usize`.
    table: [PhaseDescriptor; AvoidancePhase::COUNT],
}

impl Default for ManeuverSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManeuverSequencer {
    pub fn new() -> Self {
        Self {
            table: phases::build_phase_table(),
        }
    }

    /// Advance the maneuver by one tick.
    ///
    /// 1. Call `on_update` for the current phase.
    /// 2. If it returns `Some(next)`: restart the phase timer, store the
    ///    phase, run `on_enter(next)`.
    ///
    /// At most one transition happens per tick, so a fresh obstacle
    /// trigger is only evaluated on the tick after `Idle` is re-entered.
    pub fn tick(&self, ctx: &mut ManeuverContext<'_>) -> Option<PhaseTransition> {
        let current = ctx.robot.avoidance_phase;
        let next = (self.descriptor(current).on_update)(ctx)?;
        self.transition(next, ctx);
        Some(PhaseTransition {
            from: current,
            to: next,
        })
    }

    /// Abort any in-flight maneuver.  Drops straight to `Idle` without
    /// running its `on_enter`; the caller decides the drive intent.
    pub fn cancel(robot: &mut RobotState, now_ms: u64) -> Option<PhaseTransition> {
        let from = robot.avoidance_phase;
        robot.avoidance_phase = AvoidancePhase::Idle;
        robot.avoidance_phase_started_at = now_ms;
        (from != AvoidancePhase::Idle).then_some(PhaseTransition {
            from,
            to: AvoidancePhase::Idle,
        })
    }

    /// Human-readable phase name from the table.
    pub fn phase_name(&self, phase: AvoidancePhase) -> &'static str {
        self.descriptor(phase).name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn descriptor(&self, phase: AvoidancePhase) -> &PhaseDescriptor {
        let row = &self.table[phase as usize];
        debug_assert_eq!(row.id, phase, "phase table out of order");
        row
    }

    fn transition(&self, next: AvoidancePhase, ctx: &mut ManeuverContext<'_>) {
        info!(
            "AVOID transition: {} -> {} (after {} ms)",
            self.phase_name(ctx.robot.avoidance_phase),
            self.phase_name(next),
            ctx.ms_in_phase()
        );

        ctx.robot.avoidance_phase = next;
        ctx.robot.avoidance_phase_started_at = ctx.now_ms;

        if let Some(enter) = self.descriptor(next).on_enter {
            enter(ctx);
        }
    }
}
