//! Lever-style mechanisms and their linked gates.
//!
//! Actuation is explicit progress state advanced once per tick
//! (`elapsed / duration`, clamped at 1.0), never suspended control
//! flow. Tripping is one-shot and raises an alert toward the nearest
//! guard.

use glam::DVec3;

use curfew_core::config::MechanismSpec;
use curfew_core::constants::GATE_DROP_DISTANCE;
use curfew_core::events::SimEvent;

/// Runtime state of one authored mechanism.
#[derive(Debug, Clone)]
pub struct MechanismState {
    pub spec: MechanismSpec,
    pub tripped: bool,
    /// Actuation progress in [0, 1]; covers the lever throw and the
    /// linked gate's drop alike.
    pub progress: f64,
}

impl MechanismState {
    pub fn new(spec: MechanismSpec) -> Self {
        Self {
            spec,
            tripped: false,
            progress: 0.0,
        }
    }

    /// How far the linked gate has dropped (meters).
    pub fn gate_drop(&self) -> f64 {
        self.progress * GATE_DROP_DISTANCE
    }
}

/// An alert to dispatch: send the nearest guard to `location`, to
/// relay `origin` onward.
#[derive(Debug, Clone, Copy)]
pub struct AlarmDispatch {
    pub location: DVec3,
    pub origin: DVec3,
}

/// Check trips and advance actuation. Returns the alarms raised this
/// tick.
pub fn run(
    mechanisms: &mut [MechanismState],
    target_position: DVec3,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> Vec<AlarmDispatch> {
    let mut dispatches = Vec::new();

    for (index, m) in mechanisms.iter_mut().enumerate() {
        if !m.tripped {
            let reach_sq = m.spec.trigger_range * m.spec.trigger_range;
            if m.spec.position.distance_squared(target_position) <= reach_sq {
                m.tripped = true;
                events.push(SimEvent::MechanismTripped { index });
                dispatches.push(AlarmDispatch {
                    location: m.spec.position,
                    origin: m.spec.linked_origin,
                });
            }
        }

        if m.tripped && m.progress < 1.0 {
            m.progress = (m.progress + dt / m.spec.action_secs).min(1.0);
        }
    }

    dispatches
}
