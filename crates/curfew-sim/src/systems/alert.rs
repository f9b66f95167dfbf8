//! Alert relay between guards.
//!
//! When an investigating guard reaches the alert area it raises an
//! [`AlertMessage`]; this system consumes each message exactly once by
//! reassigning the guard nearest to the origin onto the route points
//! surrounding it, re-converging patrol coverage on the area.
//!
//! The alerting guard is deliberately not excluded from the nearest
//! query: a guard nearest to its own alert origin reassigns itself.

use glam::DVec3;
use hecs::World;

use curfew_core::commands::GuardCommand;
use curfew_core::events::SimEvent;
use curfew_core::types::{GuardId, RoutePointId};
use curfew_spatial::SpatialDirectory;

use crate::systems::guard_ai;

/// An investigation arrival to relay to the nearest peer. Produced by
/// the guard system, consumed here in the same tick.
#[derive(Debug, Clone, Copy)]
pub struct AlertMessage {
    pub origin_agent: GuardId,
    pub origin_location: DVec3,
}

/// Relay each raised alert to the guard nearest its origin.
///
/// An empty agent registry or an empty route-point population makes
/// the relay a no-op, never an error.
pub fn run(
    world: &mut World,
    directory: &SpatialDirectory,
    messages: Vec<AlertMessage>,
    fanout: usize,
    target_position: DVec3,
    events: &mut Vec<SimEvent>,
) {
    for message in messages {
        let Ok(nearest) = directory.nearest_agent(message.origin_location) else {
            continue;
        };

        let route: Vec<RoutePointId> = directory
            .k_nearest_route_points(message.origin_location, fanout)
            .iter()
            .map(|rp| rp.id)
            .collect();
        if route.is_empty() {
            continue;
        }

        let Some(entity) = guard_ai::find_guard(world, nearest) else {
            continue;
        };

        events.push(SimEvent::AlertRelayed {
            from: message.origin_agent,
            to: nearest,
        });
        guard_ai::apply_command_to(
            world,
            entity,
            &GuardCommand::Reassign { route },
            target_position,
            directory,
            events,
        );
    }
}
