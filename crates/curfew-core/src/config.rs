//! Level authoring: the declarative description a simulation is built
//! from, and its validation.
//!
//! Everything the engine needs is injected through [`LevelConfig`] at
//! construction; the core never looks collaborators up by name at
//! runtime.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{GuardState, PatrolPolicy};
use crate::error::ConfigError;
use crate::types::GuardId;

/// A sphere used for obstacles, concealment zones, and the exit zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereSpec {
    pub center: DVec3,
    pub radius: f64,
}

impl SphereSpec {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside (or on) the sphere.
    pub fn contains(&self, point: DVec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// A labeled patrol waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePointSpec {
    pub label: String,
    pub position: DVec3,
}

/// Per-guard vision parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionSpec {
    pub field_of_view_deg: f64,
    pub close_range: f64,
    pub max_ray_range: f64,
}

impl Default for VisionSpec {
    fn default() -> Self {
        Self {
            field_of_view_deg: DEFAULT_FIELD_OF_VIEW_DEG,
            close_range: DEFAULT_CLOSE_RANGE,
            max_ray_range: DEFAULT_MAX_RAY_RANGE,
        }
    }
}

/// One authored guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpec {
    pub position: DVec3,
    /// Indices into [`LevelConfig::route_points`]. Must be non-empty.
    pub route: Vec<usize>,
    #[serde(default)]
    pub policy: PatrolPolicy,
    /// `Patrolling` (the default) or `Idle`; other states cannot be
    /// authored as starting states.
    #[serde(default)]
    pub starting_state: GuardState,
    #[serde(default)]
    pub vision: VisionSpec,
    /// Initial facing direction. Defaults to facing the first
    /// destination; idle guards should usually be aimed explicitly.
    #[serde(default)]
    pub facing: Option<DVec3>,
}

/// A lever-style mechanism linked to a gate. Tripping it raises an
/// alert that sends the nearest guard to investigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismSpec {
    pub position: DVec3,
    /// The location relayed onward to peers (the linked gate).
    pub linked_origin: DVec3,
    pub trigger_range: f64,
    /// Actuation time for the lever throw and gate drop (seconds).
    pub action_secs: f64,
}

impl MechanismSpec {
    pub fn new(position: DVec3, linked_origin: DVec3) -> Self {
        Self {
            position,
            linked_origin,
            trigger_range: DEFAULT_MECHANISM_TRIGGER_RANGE,
            action_secs: DEFAULT_MECHANISM_ACTION_SECS,
        }
    }
}

/// Exposure meter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Saturation level; reaching it ends the session.
    pub max_steps: u32,
    /// Seconds between samples.
    pub sample_interval_secs: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_EXPOSURE_MAX_STEPS,
            sample_interval_secs: DEFAULT_EXPOSURE_INTERVAL_SECS,
        }
    }
}

/// Level-wide tunables shared by every guard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub arrival_threshold: f64,
    pub investigate_slack: f64,
    pub guard_speed: f64,
    /// Route points handed to a reassigned guard, nearest-first.
    pub alert_fanout: usize,
    pub exposure: ExposureConfig,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
            investigate_slack: DEFAULT_INVESTIGATE_SLACK,
            guard_speed: DEFAULT_GUARD_SPEED,
            alert_fanout: DEFAULT_ALERT_FANOUT,
            exposure: ExposureConfig::default(),
        }
    }
}

/// The complete authored level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub guards: Vec<GuardSpec>,
    pub route_points: Vec<RoutePointSpec>,
    #[serde(default)]
    pub mechanisms: Vec<MechanismSpec>,
    /// Spherical occluders that block line-of-sight rays.
    #[serde(default)]
    pub obstacles: Vec<SphereSpec>,
    /// Zones inside which the target counts as concealed.
    #[serde(default)]
    pub concealment_zones: Vec<SphereSpec>,
    /// Reaching this zone completes the level for the target.
    #[serde(default)]
    pub exit_zone: Option<SphereSpec>,
    #[serde(default)]
    pub target_start: DVec3,
    #[serde(default)]
    pub settings: LevelSettings,
}

impl LevelConfig {
    /// Check the level for authoring errors.
    ///
    /// Empty routes are rejected for every guard, not only patrolling
    /// starters: an idle guard can be promoted to patrolling by a
    /// reassignment and would then index an empty route.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.guard_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.settings.guard_speed));
        }
        if self.settings.arrival_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveArrivalThreshold(
                self.settings.arrival_threshold,
            ));
        }
        if self.settings.exposure.max_steps == 0 {
            return Err(ConfigError::ZeroExposureSteps);
        }
        if self.settings.exposure.sample_interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveSampleInterval(
                self.settings.exposure.sample_interval_secs,
            ));
        }

        for (i, guard) in self.guards.iter().enumerate() {
            let id = GuardId(i as u32);
            if guard.route.is_empty() {
                return Err(ConfigError::EmptyRoute { guard: id });
            }
            for &index in &guard.route {
                if index >= self.route_points.len() {
                    return Err(ConfigError::RoutePointOutOfRange {
                        guard: id,
                        index,
                        count: self.route_points.len(),
                    });
                }
            }
            if guard.vision.field_of_view_deg <= 0.0 {
                return Err(ConfigError::InvalidFieldOfView {
                    guard: id,
                    value: guard.vision.field_of_view_deg,
                });
            }
            if !matches!(
                guard.starting_state,
                GuardState::Patrolling | GuardState::Idle
            ) {
                return Err(ConfigError::InvalidStartingState {
                    guard: id,
                    state: guard.starting_state,
                });
            }
        }

        Ok(())
    }
}
