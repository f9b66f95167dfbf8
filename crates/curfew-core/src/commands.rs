//! Commands consumed by the simulation at tick boundaries.
//!
//! Guard transitions go through [`GuardCommand`], a tagged union applied
//! by a single transition function in the guard-ai crate. There is no
//! overloaded entry point whose meaning depends on the current state.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::{GuardId, RoutePointId};

/// A state-machine command addressed to one guard.
///
/// Priority ordering: Chase > Investigate > Patrol > Idle. A command
/// that is not valid from the guard's current state is an idempotent
/// no-op; see `curfew_guard_ai::fsm::apply_command` for the full table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GuardCommand {
    /// Move to `destination`, then relay `origin` to the nearest peer.
    /// Ignored while chasing.
    Investigate { destination: DVec3, origin: DVec3 },
    /// Pursue the target until explicitly called off.
    Chase,
    /// Return to (or resume) the patrol route.
    Patrol,
    /// Replace the patrol route. Delivered while idle this keeps the
    /// authored route and merely resumes it.
    Reassign { route: Vec<RoutePointId> },
}

/// External inputs to the session, queued and processed at the next
/// tick boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Freeze the simulation.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Discard all state and rebuild the level from authored defaults.
    Reset,
    /// The world collaborator reporting where the target is.
    SetTargetPosition { position: DVec3 },
    /// Raise an alert at `location` (e.g. a tripped mechanism): the
    /// nearest guard is sent to investigate and will relay `origin`.
    TriggerAlarm { location: DVec3, origin: DVec3 },
    /// Address a state-machine command to a specific guard.
    Guard { guard: GuardId, command: GuardCommand },
}
