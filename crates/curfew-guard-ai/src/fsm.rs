//! Guard behavior finite state machine.
//!
//! Pure functions that compute per-tick actions and command-driven
//! transitions for guard agents. No ECS dependency — operates on plain
//! data; the sim crate applies the results to the world.

use glam::DVec3;

use curfew_core::commands::GuardCommand;
use curfew_core::enums::GuardState;

/// Input to the guard FSM for a single agent on one tick.
pub struct GuardSituation {
    pub state: GuardState,
    pub position: DVec3,
    pub destination: DVec3,
    /// The location to relay onward once an investigation arrives.
    pub alert_origin: Option<DVec3>,
    /// Arrival distance for patrol waypoints (meters).
    pub arrival_threshold: f64,
    /// Extra tolerance for investigation arrival (meters).
    pub investigate_slack: f64,
}

/// What the guard should do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardAction {
    /// Keep walking toward the current destination.
    Hold,
    /// Arrived at a patrol waypoint: select the next route point and
    /// issue it as the new destination.
    AdvanceRoute,
    /// Arrived at the alert area: relay `origin` to the nearest peer,
    /// return to patrolling, and re-issue the current route point.
    RelayAndResume { origin: DVec3 },
    /// Pursuing: re-issue the target's current position as destination.
    /// Pursuit never completes on its own.
    FollowTarget,
}

/// Evaluate one guard for one tick.
pub fn step(s: &GuardSituation) -> GuardAction {
    match s.state {
        GuardState::Patrolling => {
            if s.position.distance(s.destination) < s.arrival_threshold {
                GuardAction::AdvanceRoute
            } else {
                GuardAction::Hold
            }
        }
        GuardState::Investigating => {
            let tolerance = s.arrival_threshold + s.investigate_slack;
            if s.position.distance(s.destination) < tolerance {
                // A missing origin degenerates to relaying the spot the
                // guard was sent to.
                let origin = s.alert_origin.unwrap_or(s.destination);
                GuardAction::RelayAndResume { origin }
            } else {
                GuardAction::Hold
            }
        }
        GuardState::Chasing => GuardAction::FollowTarget,
        GuardState::Idle => GuardAction::Hold,
    }
}

/// Result of applying a [`GuardCommand`] to a guard in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command is not valid from the current state: idempotent no-op.
    Ignored,
    /// Enter the given state (data effects are applied by the caller).
    Transition(GuardState),
    /// Idle guard keeps its authored route and simply resumes it,
    /// transitioning to `Patrolling` exactly once.
    ResumeRoute,
    /// The route is replaced; the behavioral state is unchanged.
    ReplaceRoute,
}

/// The single transition function for guard commands.
///
/// Priority ordering: **Chase > Investigate > Patrol > Idle**.
///
/// | command     | Patrolling     | Investigating    | Chasing        | Idle          |
/// |-------------|----------------|------------------|----------------|---------------|
/// | Investigate | Investigating  | Investigating¹   | ignored        | Investigating |
/// | Chase       | Chasing        | Chasing          | ignored²       | Chasing       |
/// | Patrol      | ignored²       | Patrolling       | Patrolling     | ignored³      |
/// | Reassign    | replace route  | replace route    | replace route  | resume route⁴ |
///
/// ¹ the newest alert wins; the destination and origin are re-set.
/// ² already there; re-entering would only duplicate events.
/// ³ idle coverage is left in place until a reassignment arrives.
/// ⁴ the authored route is kept; the current destination is re-issued.
pub fn apply_command(current: GuardState, command: &GuardCommand) -> CommandOutcome {
    match command {
        GuardCommand::Investigate { .. } => match current {
            GuardState::Chasing => CommandOutcome::Ignored,
            _ => CommandOutcome::Transition(GuardState::Investigating),
        },
        GuardCommand::Chase => match current {
            GuardState::Chasing => CommandOutcome::Ignored,
            _ => CommandOutcome::Transition(GuardState::Chasing),
        },
        GuardCommand::Patrol => match current {
            GuardState::Investigating | GuardState::Chasing => {
                CommandOutcome::Transition(GuardState::Patrolling)
            }
            GuardState::Patrolling | GuardState::Idle => CommandOutcome::Ignored,
        },
        GuardCommand::Reassign { .. } => match current {
            GuardState::Idle => CommandOutcome::ResumeRoute,
            _ => CommandOutcome::ReplaceRoute,
        },
    }
}
