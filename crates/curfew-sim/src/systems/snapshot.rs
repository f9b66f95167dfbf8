//! Snapshot assembly — the complete visible state after each tick.

use hecs::World;

use curfew_core::components::{BehaviorState, Guard, NavAgent, PatrolRoute, Perception, Position};
use curfew_core::enums::GamePhase;
use curfew_core::events::SimEvent;
use curfew_core::state::{
    ExposureView, GuardView, LevelStateSnapshot, MechanismView, TargetView,
};
use curfew_core::types::SimTime;

use crate::engine::TargetState;
use crate::systems::exposure::ExposureMeter;
use crate::systems::mechanism::MechanismState;

/// Build the snapshot for the tick that just ran.
pub fn build(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    target: &TargetState,
    exposure: &ExposureMeter,
    mechanisms: &[MechanismState],
    events: Vec<SimEvent>,
) -> LevelStateSnapshot {
    let mut guards: Vec<GuardView> = Vec::new();
    {
        let mut query = world.query::<(
            &Guard,
            &Position,
            &NavAgent,
            &BehaviorState,
            &PatrolRoute,
            &Perception,
        )>();
        for (_entity, (guard, pos, nav, behavior, route, perception)) in query.iter() {
            guards.push(GuardView {
                id: guard.id,
                state: behavior.state,
                position: pos.0,
                destination: nav.destination,
                facing: nav.facing,
                route_index: route.index,
                route_len: route.points.len(),
                target_visible: perception.target_visible,
            });
        }
    }
    // hecs iteration order is not part of the contract; keep the
    // snapshot stream byte-stable across runs.
    guards.sort_by_key(|g| g.id);

    LevelStateSnapshot {
        time: *time,
        phase,
        guards,
        target: TargetView {
            position: target.position,
            concealed: target.concealed,
        },
        exposure: ExposureView {
            value: exposure.value(),
            max_steps: exposure.max_steps(),
            next_sample_secs: exposure.next_sample_secs(),
            detected: exposure.detected(),
        },
        mechanisms: mechanisms
            .iter()
            .map(|m| MechanismView {
                tripped: m.tripped,
                progress: m.progress,
                gate_drop: m.gate_drop(),
            })
            .collect(),
        events,
    }
}
