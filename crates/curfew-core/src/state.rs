//! Level state snapshot — the complete visible state produced each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{GamePhase, GuardState};
use crate::events::SimEvent;
use crate::types::{GuardId, SimTime};

/// Complete session state emitted after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub guards: Vec<GuardView>,
    pub target: TargetView,
    pub exposure: ExposureView,
    pub mechanisms: Vec<MechanismView>,
    /// Events raised during this tick, in order.
    pub events: Vec<SimEvent>,
}

/// One guard as seen from outside the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardView {
    pub id: GuardId,
    pub state: GuardState,
    pub position: DVec3,
    pub destination: DVec3,
    pub facing: DVec3,
    /// Index of the route point currently being walked to.
    pub route_index: usize,
    pub route_len: usize,
    pub target_visible: bool,
}

/// The evading target as the simulation sees it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetView {
    pub position: DVec3,
    pub concealed: bool,
}

/// Exposure meter state for UI display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExposureView {
    pub value: u32,
    pub max_steps: u32,
    /// Seconds until the next sample.
    pub next_sample_secs: f64,
    pub detected: bool,
}

/// Mechanism actuation state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MechanismView {
    pub tripped: bool,
    /// Actuation progress in [0, 1].
    pub progress: f64,
    /// How far the linked gate has dropped (meters).
    pub gate_drop: f64,
}
