//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Behavioral state of a guard. Exactly one is active per guard at any
/// time; transitions go through the guard-ai command table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardState {
    /// Walking the assigned route, scanning for the target.
    #[default]
    Patrolling,
    /// Moving toward an alert origin before relaying it to a peer.
    Investigating,
    /// Actively pursuing the target. Ended only by an explicit command.
    Chasing,
    /// Holding position to preserve author-placed coverage until
    /// explicitly reassigned.
    Idle,
}

/// Waypoint selection policy, fixed per guard at level authoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolPolicy {
    /// Advance through the route in order, wrapping past the last point.
    #[default]
    Sequential,
    /// Uniform random draw that never repeats the immediately preceding
    /// index. Single-point routes degenerate to a fixed point.
    Random,
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running.
    #[default]
    Active,
    /// Simulation frozen; resumable.
    Paused,
    /// The exposure meter saturated. Terminal until reset.
    Detected,
    /// The target reached the exit zone. Terminal until reset.
    Complete,
}

impl GamePhase {
    /// Whether the session has reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Detected | GamePhase::Complete)
    }
}
