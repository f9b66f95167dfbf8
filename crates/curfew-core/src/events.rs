//! Events emitted by the simulation, drained into each snapshot.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::GuardId;

/// One-shot notifications produced during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A guard sighted the target and switched to pursuit.
    ChaseStarted { guard: GuardId },
    /// An investigating guard reached the alert area and is relaying it.
    AlertRaised { guard: GuardId, origin: DVec3 },
    /// The relay reassigned the nearest peer toward the alert origin.
    /// `from` and `to` may be the same guard.
    AlertRelayed { from: GuardId, to: GuardId },
    /// A guard's route was replaced with `points` route points.
    RouteReassigned { guard: GuardId, points: usize },
    /// The target tripped a mechanism.
    MechanismTripped { index: usize },
    /// The exposure meter saturated. Fired at most once per session.
    TargetDetected,
    /// The target reached the exit zone. Fired at most once per session.
    LevelComplete,
}
