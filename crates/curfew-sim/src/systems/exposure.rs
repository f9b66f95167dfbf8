//! Exposure meter — the level-wide detector.
//!
//! Samples the OR of every guard's perception result on a fixed
//! interval and accumulates it with hysteresis: sightings push the
//! meter up, quiet samples bleed it down. Saturation is terminal and
//! idempotent.

use curfew_core::config::ExposureConfig;

/// Bounded, hysteretic exposure accumulator.
#[derive(Debug, Clone)]
pub struct ExposureMeter {
    value: u32,
    max_steps: u32,
    sample_interval_secs: f64,
    timer: f64,
    detected: bool,
}

impl ExposureMeter {
    pub fn new(config: &ExposureConfig) -> Self {
        Self {
            value: 0,
            max_steps: config.max_steps,
            sample_interval_secs: config.sample_interval_secs,
            timer: config.sample_interval_secs,
            detected: false,
        }
    }

    /// Advance the sample timer by `dt`; when it expires, fold in one
    /// sample of `any_sighting` and rearm.
    ///
    /// Returns `true` exactly once: on the sample that saturates the
    /// meter. Once saturated the meter is frozen and further calls are
    /// no-ops.
    pub fn tick(&mut self, dt: f64, any_sighting: bool) -> bool {
        if self.detected {
            return false;
        }

        self.timer -= dt;
        if self.timer > 0.0 {
            return false;
        }
        self.timer = self.sample_interval_secs;

        if any_sighting {
            self.value = (self.value + 1).min(self.max_steps);
        } else {
            self.value = self.value.saturating_sub(1);
        }

        if self.value >= self.max_steps {
            self.detected = true;
            return true;
        }
        false
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Seconds until the next sample (0 while frozen).
    pub fn next_sample_secs(&self) -> f64 {
        if self.detected {
            0.0
        } else {
            self.timer.max(0.0)
        }
    }
}
