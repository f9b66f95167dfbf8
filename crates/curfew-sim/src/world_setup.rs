//! Entity spawn factories for setting up the level.
//!
//! Builds the guard population and the spatial directory from a
//! validated [`LevelConfig`].

use glam::DVec3;
use hecs::World;
use rand_chacha::ChaCha8Rng;

use curfew_core::components::{BehaviorState, Guard, NavAgent, PatrolRoute, Perception, Position, VisionCone};
use curfew_core::config::LevelConfig;
use curfew_core::enums::{GuardState, PatrolPolicy};
use curfew_core::types::{GuardId, RoutePointId};
use curfew_guard_ai::waypoint;
use curfew_spatial::SpatialDirectory;

/// Populate the world and directory from level data.
///
/// The config must have passed [`LevelConfig::validate`] — route
/// references are assumed in range here.
pub fn setup_level(
    world: &mut World,
    directory: &mut SpatialDirectory,
    level: &LevelConfig,
    rng: &mut ChaCha8Rng,
) {
    for spec in &level.route_points {
        directory.register_route_point(spec.label.clone(), spec.position);
    }

    for (i, spec) in level.guards.iter().enumerate() {
        let id = GuardId(i as u32);
        let points: Vec<RoutePointId> = spec
            .route
            .iter()
            .map(|&index| RoutePointId(index as u32))
            .collect();

        // Random-policy guards draw their opening waypoint through the
        // same no-repeat selection they patrol with.
        let index = match spec.policy {
            PatrolPolicy::Sequential => 0,
            PatrolPolicy::Random => waypoint::pick_random(rng, points.len(), 0),
        };

        // Idle guards stand their post: destination pinned to the spawn
        // position until a reassignment resumes the route.
        let destination = if spec.starting_state == GuardState::Idle {
            spec.position
        } else {
            directory
                .route_point(points[index])
                .map(|rp| rp.position)
                .unwrap_or(spec.position)
        };

        let facing = initial_facing(spec.facing, spec.position, destination);

        world.spawn((
            Guard { id },
            Position(spec.position),
            NavAgent {
                destination,
                speed: level.settings.guard_speed,
                facing,
            },
            PatrolRoute {
                points,
                index,
                previous: index,
                policy: spec.policy,
            },
            BehaviorState {
                state: spec.starting_state,
                alert_origin: None,
            },
            VisionCone {
                field_of_view_deg: spec.vision.field_of_view_deg,
                close_range: spec.vision.close_range,
                max_ray_range: spec.vision.max_ray_range,
            },
            Perception::default(),
        ));

        directory.register_agent(id, spec.position);
    }
}

fn initial_facing(authored: Option<DVec3>, position: DVec3, destination: DVec3) -> DVec3 {
    if let Some(facing) = authored {
        let normalized = facing.normalize_or_zero();
        if normalized != DVec3::ZERO {
            return normalized;
        }
    }
    let toward_destination = (destination - position).normalize_or_zero();
    if toward_destination != DVec3::ZERO {
        toward_destination
    } else {
        DVec3::Y
    }
}
