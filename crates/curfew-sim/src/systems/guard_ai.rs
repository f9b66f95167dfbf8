//! Guard state machine system.
//!
//! Evaluates the pure FSM from curfew-guard-ai for each guard, then
//! applies the resulting actions and any addressed commands to the
//! world. Updates are buffered before application to keep query
//! borrows disjoint.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use curfew_core::commands::GuardCommand;
use curfew_core::components::{BehaviorState, Guard, NavAgent, PatrolRoute, Position};
use curfew_core::config::LevelSettings;
use curfew_core::enums::{GuardState, PatrolPolicy};
use curfew_core::events::SimEvent;
use curfew_core::types::GuardId;
use curfew_guard_ai::fsm::{self, CommandOutcome, GuardAction, GuardSituation};
use curfew_guard_ai::waypoint;
use curfew_spatial::SpatialDirectory;

use crate::systems::alert::AlertMessage;

/// Look up a guard entity by its stable id.
pub fn find_guard(world: &World, id: GuardId) -> Option<Entity> {
    let mut query = world.query::<&Guard>();
    query
        .iter()
        .find(|(_, guard)| guard.id == id)
        .map(|(entity, _)| entity)
}

/// Run the per-tick state machine for every guard. Returns the alert
/// messages raised by investigation arrivals, for the relay system to
/// consume this same tick.
pub fn run(
    world: &mut World,
    directory: &SpatialDirectory,
    target_position: DVec3,
    settings: &LevelSettings,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) -> Vec<AlertMessage> {
    // Pass 1: evaluate, buffering the non-trivial actions.
    let mut pending: Vec<(Entity, GuardAction)> = Vec::new();
    {
        let mut query = world.query::<(&Guard, &Position, &NavAgent, &BehaviorState)>();
        for (entity, (_guard, pos, nav, behavior)) in query.iter() {
            let situation = GuardSituation {
                state: behavior.state,
                position: pos.0,
                destination: nav.destination,
                alert_origin: behavior.alert_origin,
                arrival_threshold: settings.arrival_threshold,
                investigate_slack: settings.investigate_slack,
            };
            let action = fsm::step(&situation);
            if action != GuardAction::Hold {
                pending.push((entity, action));
            }
        }
    }

    // Pass 2: apply.
    let mut alerts = Vec::new();
    for (entity, action) in pending {
        let Ok((guard, behavior, nav, route)) = world
            .query_one_mut::<(&Guard, &mut BehaviorState, &mut NavAgent, &mut PatrolRoute)>(entity)
        else {
            continue;
        };
        match action {
            GuardAction::Hold => {}
            GuardAction::AdvanceRoute => {
                let len = route.points.len();
                let next = match route.policy {
                    PatrolPolicy::Sequential => waypoint::advance_sequential(route.index, len),
                    PatrolPolicy::Random => waypoint::pick_random(rng, len, route.index),
                };
                route.previous = route.index;
                route.index = next;
                if let Some(rp) = directory.route_point(route.points[next]) {
                    nav.destination = rp.position;
                }
            }
            GuardAction::RelayAndResume { origin } => {
                alerts.push(AlertMessage {
                    origin_agent: guard.id,
                    origin_location: origin,
                });
                events.push(SimEvent::AlertRaised {
                    guard: guard.id,
                    origin,
                });
                behavior.state = GuardState::Patrolling;
                behavior.alert_origin = None;
                if let Some(rp) = directory.route_point(route.points[route.index]) {
                    nav.destination = rp.position;
                }
            }
            GuardAction::FollowTarget => {
                nav.destination = target_position;
            }
        }
    }

    alerts
}

/// Apply one [`GuardCommand`] to one guard through the FSM transition
/// table. Invalid transitions are idempotent no-ops.
pub fn apply_command_to(
    world: &mut World,
    entity: Entity,
    command: &GuardCommand,
    target_position: DVec3,
    directory: &SpatialDirectory,
    events: &mut Vec<SimEvent>,
) {
    let Ok((guard, behavior, nav, route)) = world
        .query_one_mut::<(&Guard, &mut BehaviorState, &mut NavAgent, &mut PatrolRoute)>(entity)
    else {
        return;
    };

    match fsm::apply_command(behavior.state, command) {
        CommandOutcome::Ignored => {}
        CommandOutcome::Transition(next) => {
            behavior.state = next;
            match (next, command) {
                (GuardState::Investigating, GuardCommand::Investigate { destination, origin }) => {
                    behavior.alert_origin = Some(*origin);
                    nav.destination = *destination;
                }
                (GuardState::Chasing, _) => {
                    behavior.alert_origin = None;
                    nav.destination = target_position;
                    events.push(SimEvent::ChaseStarted { guard: guard.id });
                }
                (GuardState::Patrolling, _) => {
                    behavior.alert_origin = None;
                    if let Some(rp) = directory.route_point(route.points[route.index]) {
                        nav.destination = rp.position;
                    }
                }
                _ => {}
            }
        }
        CommandOutcome::ResumeRoute => {
            // Idle: the authored route survives; the current destination
            // is simply re-issued and the guard starts patrolling.
            behavior.state = GuardState::Patrolling;
        }
        CommandOutcome::ReplaceRoute => {
            let GuardCommand::Reassign { route: new_route } = command else {
                return;
            };
            if new_route.is_empty() {
                return;
            }
            route.points = new_route.clone();
            route.index = 0;
            route.previous = 0;
            if behavior.state == GuardState::Patrolling {
                if let Some(rp) = directory.route_point(route.points[0]) {
                    nav.destination = rp.position;
                }
            }
            events.push(SimEvent::RouteReassigned {
                guard: guard.id,
                points: route.points.len(),
            });
        }
    }
}
