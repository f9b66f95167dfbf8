//! Simulation constants and default tuning parameters.
//!
//! Per-level values live in [`crate::config::LevelConfig`]; the defaults
//! here seed that configuration.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Patrol ---

/// How close a guard must get to a destination before it counts as
/// arrived and the next route point is selected (meters).
pub const DEFAULT_ARRIVAL_THRESHOLD: f64 = 1.5;

/// Extra arrival tolerance while investigating: the exact spot need not
/// be reached before the alert is relayed (meters).
pub const DEFAULT_INVESTIGATE_SLACK: f64 = 5.0;

/// Guard walking speed (m/s).
pub const DEFAULT_GUARD_SPEED: f64 = 3.5;

// --- Vision ---

/// Full field-of-view angle (degrees). Inside this angle and within
/// close range the target is seen without an occlusion check.
pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 60.0;

/// Range of the direct-view shortcut (meters).
pub const DEFAULT_CLOSE_RANGE: f64 = 5.0;

/// Maximum length of the line-of-sight ray (meters).
pub const DEFAULT_MAX_RAY_RANGE: f64 = 40.0;

/// Radius of the target body for ray hits (meters).
pub const TARGET_BODY_RADIUS: f64 = 0.5;

// --- Alerts ---

/// Number of route points handed to a reassigned guard, nearest-first.
pub const DEFAULT_ALERT_FANOUT: usize = 5;

// --- Exposure meter ---

/// Samples-with-sighting needed to saturate the meter and end the session.
pub const DEFAULT_EXPOSURE_MAX_STEPS: u32 = 5;

/// Seconds between exposure samples.
pub const DEFAULT_EXPOSURE_INTERVAL_SECS: f64 = 1.0;

// --- Mechanisms ---

/// Range at which the target trips a mechanism (meters).
pub const DEFAULT_MECHANISM_TRIGGER_RANGE: f64 = 2.0;

/// Duration of a mechanism's actuation, lever throw and gate drop alike
/// (seconds).
pub const DEFAULT_MECHANISM_ACTION_SECS: f64 = 1.5;

/// How far a gate sinks once its mechanism has fully actuated (meters).
pub const GATE_DROP_DISTANCE: f64 = 5.0;
