//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Simulation logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{GuardState, PatrolPolicy};
use crate::types::{GuardId, RoutePointId};

/// Marks an entity as a guard and carries its stable identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Guard {
    pub id: GuardId,
}

/// World position. Written only by the movement system; everything else
/// reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// Navigation state: the fire-and-forget destination handed to the
/// movement layer, plus the direction the guard is facing.
/// Arrival is polled by distance, never signalled back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NavAgent {
    pub destination: DVec3,
    /// Walking speed (m/s).
    pub speed: f64,
    /// Unit direction the guard faces; follows the travel direction.
    pub facing: DVec3,
}

/// The route a guard patrols and its position within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolRoute {
    /// Ordered route point references. Never empty.
    pub points: Vec<RoutePointId>,
    /// Index of the route point currently being walked to.
    /// Always a valid index into `points`.
    pub index: usize,
    /// Index selected immediately before `index`, for no-repeat draws.
    pub previous: usize,
    pub policy: PatrolPolicy,
}

/// Behavioral state driven by the guard state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BehaviorState {
    pub state: GuardState,
    /// The location an investigating guard will relay to the nearest
    /// peer on arrival.
    pub alert_origin: Option<DVec3>,
}

/// Per-guard vision parameters, fixed at level authoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisionCone {
    /// Full field-of-view angle (degrees).
    pub field_of_view_deg: f64,
    /// Range of the direct-view shortcut (meters).
    pub close_range: f64,
    /// Maximum line-of-sight ray length (meters).
    pub max_ray_range: f64,
}

/// Latest perception result for this guard, recomputed every tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Perception {
    pub target_visible: bool,
}
