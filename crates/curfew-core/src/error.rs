//! Level-configuration errors.
//!
//! Configuration problems are fatal at initialization: the engine
//! refuses to start rather than fail later with an out-of-range access.

use thiserror::Error;

use crate::enums::GuardState;
use crate::types::GuardId;

/// Rejections produced by [`crate::config::LevelConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{guard} has an empty patrol route")]
    EmptyRoute { guard: GuardId },

    #[error("{guard} references route point index {index}, but only {count} are registered")]
    RoutePointOutOfRange {
        guard: GuardId,
        index: usize,
        count: usize,
    },

    #[error("{guard} has a non-positive field of view ({value} degrees)")]
    InvalidFieldOfView { guard: GuardId, value: f64 },

    #[error("{guard} cannot start in the {state:?} state")]
    InvalidStartingState { guard: GuardId, state: GuardState },

    #[error("guard speed must be positive, got {0}")]
    NonPositiveSpeed(f64),

    #[error("arrival threshold must be positive, got {0}")]
    NonPositiveArrivalThreshold(f64),

    #[error("exposure meter needs at least one step")]
    ZeroExposureSteps,

    #[error("exposure sample interval must be positive, got {0}")]
    NonPositiveSampleInterval(f64),
}
