//! Perception system.
//!
//! Each tick, classifies the target against every guard's vision cone,
//! resolves cone hits with the line-of-sight ray and the concealment
//! flag, and stores the result on the guard. A sighting while
//! patrolling or investigating escalates to a chase; losing sight
//! never de-escalates one.

use glam::DVec3;
use hecs::{Entity, World};

use curfew_core::commands::GuardCommand;
use curfew_core::components::{BehaviorState, NavAgent, Perception, Position, VisionCone};
use curfew_core::config::SphereSpec;
use curfew_core::enums::GuardState;
use curfew_core::events::SimEvent;
use curfew_guard_ai::perception::{classify_view, ViewCheck};
use curfew_spatial::SpatialDirectory;

use crate::los;
use crate::systems::guard_ai;

/// Evaluate perception for every guard and escalate sightings.
pub fn run(
    world: &mut World,
    obstacles: &[SphereSpec],
    target_position: DVec3,
    target_concealed: bool,
    directory: &SpatialDirectory,
    events: &mut Vec<SimEvent>,
) {
    // Pass 1: evaluate and record, buffering escalations.
    let mut escalate: Vec<Entity> = Vec::new();
    {
        let mut query = world.query::<(
            &Position,
            &NavAgent,
            &VisionCone,
            &BehaviorState,
            &mut Perception,
        )>();
        for (entity, (pos, nav, vision, behavior, perception)) in query.iter() {
            let visible = match classify_view(vision, pos.0, nav.facing, target_position) {
                // Close range bypasses the occlusion check entirely.
                ViewCheck::DirectView => true,
                ViewCheck::RequiresRay => {
                    !target_concealed
                        && los::ray_hits_target(
                            pos.0,
                            target_position,
                            vision.max_ray_range,
                            obstacles,
                        )
                }
                ViewCheck::OutOfView => false,
            };

            perception.target_visible = visible;

            if visible
                && matches!(
                    behavior.state,
                    GuardState::Patrolling | GuardState::Investigating
                )
            {
                escalate.push(entity);
            }
        }
    }

    // Pass 2: escalate through the command table (chase outranks both
    // patrolling and investigating).
    for entity in escalate {
        guard_ai::apply_command_to(
            world,
            entity,
            &GuardCommand::Chase,
            target_position,
            directory,
            events,
        );
    }
}

/// Whether any guard's latest perception result sees the target.
pub fn any_sighting(world: &World) -> bool {
    let mut query = world.query::<&Perception>();
    query.iter().any(|(_, p)| p.target_visible)
}
