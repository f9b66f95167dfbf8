//! Kinematic seek toward the current destination.
//!
//! Stands in for the external navigation collaborator at its
//! interface boundary: destinations are fire-and-forget, positions
//! advance toward them at walking speed, and arrival is only ever
//! observed by distance polling. Facing follows the travel direction.

use hecs::World;

use curfew_core::components::{NavAgent, Position};

/// Advance every guard toward its destination by one tick.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, nav)) in world.query_mut::<(&mut Position, &mut NavAgent)>() {
        let delta = nav.destination - pos.0;
        let distance = delta.length();
        if distance < f64::EPSILON {
            continue;
        }
        let direction = delta / distance;
        let step = nav.speed * dt;
        if step >= distance {
            pos.0 = nav.destination;
        } else {
            pos.0 += direction * step;
        }
        nav.facing = direction;
    }
}
