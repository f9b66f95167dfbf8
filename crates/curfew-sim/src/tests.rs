//! Tests for the simulation engine: patrol cycles, perception and
//! escalation, the alert relay, the exposure meter, mechanisms, and
//! session lifecycle.

use glam::DVec3;

use curfew_core::commands::{GuardCommand, SessionCommand};
use curfew_core::config::*;
use curfew_core::enums::{GamePhase, GuardState, PatrolPolicy};
use curfew_core::error::ConfigError;
use curfew_core::events::SimEvent;
use curfew_core::state::LevelStateSnapshot;
use curfew_core::types::{GuardId, RoutePointId};

use crate::engine::{SimConfig, SimulationEngine};

fn p(x: f64, y: f64) -> DVec3 {
    DVec3::new(x, y, 0.0)
}

fn point(label: &str, x: f64, y: f64) -> RoutePointSpec {
    RoutePointSpec {
        label: label.to_string(),
        position: p(x, y),
    }
}

fn guard_at(x: f64, y: f64, route: Vec<usize>) -> GuardSpec {
    GuardSpec {
        position: p(x, y),
        route,
        policy: PatrolPolicy::Sequential,
        starting_state: GuardState::Patrolling,
        vision: VisionSpec::default(),
        facing: None,
    }
}

/// A level with the target parked far away so perception stays quiet
/// unless a test moves it.
fn level(guards: Vec<GuardSpec>, route_points: Vec<RoutePointSpec>) -> LevelConfig {
    LevelConfig {
        guards,
        route_points,
        target_start: p(1000.0, 1000.0),
        ..Default::default()
    }
}

fn engine(level: LevelConfig) -> SimulationEngine {
    SimulationEngine::new(SimConfig { seed: 42, level }).expect("level should validate")
}

fn guard_view(snapshot: &LevelStateSnapshot, id: u32) -> &curfew_core::state::GuardView {
    snapshot
        .guards
        .iter()
        .find(|g| g.id == GuardId(id))
        .expect("guard in snapshot")
}

// ---- Patrol ----

#[test]
fn test_arrival_selects_next_route_point_in_order() {
    // Route [A, B, C]; guard starts within the arrival threshold of A,
    // so the first tick must select B — not C.
    let mut lvl = level(
        vec![guard_at(0.5, 0.0, vec![0, 1, 2])],
        vec![
            point("a", 0.0, 0.0),
            point("b", 10.0, 0.0),
            point("c", 10.0, 10.0),
        ],
    );
    lvl.settings.arrival_threshold = 1.0;
    let mut sim = engine(lvl);

    let snap = sim.tick();
    let guard = guard_view(&snap, 0);
    assert_eq!(guard.route_index, 1);
    assert_eq!(guard.destination, p(10.0, 0.0));
    assert_eq!(guard.state, GuardState::Patrolling);
}

#[test]
fn test_patrol_cycles_through_route_and_wraps() {
    let lvl = level(
        vec![guard_at(0.0, 0.0, vec![0, 1, 2])],
        vec![
            point("a", 0.0, 0.0),
            point("b", 8.0, 0.0),
            point("c", 8.0, 8.0),
        ],
    );
    let mut sim = engine(lvl);

    let mut indices_seen = std::collections::BTreeSet::new();
    for _ in 0..900 {
        let snap = sim.tick();
        indices_seen.insert(guard_view(&snap, 0).route_index);
    }
    // One full loop at 3.5 m/s covers all three indices and the wrap.
    assert_eq!(indices_seen.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
}

// ---- Perception and escalation ----

#[test]
fn test_direct_view_sighting_starts_chase() {
    // Guard walking north; target 3.2m ahead, just off-axis: direct
    // view, no ray needed.
    let lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("north", 0.0, 100.0)],
    );
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(1.0, 3.0),
    });

    let snap = sim.tick();
    let guard = guard_view(&snap, 0);
    assert_eq!(guard.state, GuardState::Chasing);
    assert!(guard.target_visible);
    assert!(snap
        .events
        .contains(&SimEvent::ChaseStarted { guard: GuardId(0) }));
    assert_eq!(guard.destination, p(1.0, 3.0));
}

#[test]
fn test_cone_sighting_requires_clear_ray() {
    let mut lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("north", 0.0, 100.0)],
    );
    // A wall between the guard and a target 15m ahead.
    lvl.obstacles.push(SphereSpec::new(p(0.0, 8.0), 2.0));
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(0.0, 15.0),
    });

    for _ in 0..5 {
        let snap = sim.tick();
        let guard = guard_view(&snap, 0);
        assert_eq!(guard.state, GuardState::Patrolling, "wall blocks the ray");
        assert!(!guard.target_visible);
    }
}

#[test]
fn test_close_range_bypasses_occlusion() {
    // Same wall geometry, but the target stands inside close range:
    // the direct-view shortcut skips the ray entirely.
    let mut lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("north", 0.0, 100.0)],
    );
    lvl.obstacles.push(SphereSpec::new(p(0.0, 1.5), 0.4));
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(0.0, 3.0),
    });

    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).state, GuardState::Chasing);
}

#[test]
fn test_concealment_suppresses_cone_sighting() {
    let mut lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("north", 0.0, 100.0)],
    );
    lvl.concealment_zones.push(SphereSpec::new(p(0.0, 15.0), 3.0));
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(0.0, 15.0),
    });

    let snap = sim.tick();
    let guard = guard_view(&snap, 0);
    assert!(snap.target.concealed);
    assert!(!guard.target_visible, "concealment overrides a clear ray");
    assert_eq!(guard.state, GuardState::Patrolling);
}

#[test]
fn test_chase_follows_moving_target_and_never_self_reverts() {
    let lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("north", 0.0, 100.0)],
    );
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::Guard {
        guard: GuardId(0),
        command: GuardCommand::Chase,
    });
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(50.0, 50.0),
    });
    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).state, GuardState::Chasing);
    assert_eq!(guard_view(&snap, 0).destination, p(50.0, 50.0));

    // Destination re-tracks the target every tick.
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(-40.0, 10.0),
    });
    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).destination, p(-40.0, 10.0));

    // Sight is long lost; the chase persists until called off.
    for _ in 0..50 {
        let snap = sim.tick();
        assert_eq!(guard_view(&snap, 0).state, GuardState::Chasing);
    }

    // Investigate cannot preempt a chase.
    sim.queue_command(SessionCommand::Guard {
        guard: GuardId(0),
        command: GuardCommand::Investigate {
            destination: p(5.0, 5.0),
            origin: p(6.0, 6.0),
        },
    });
    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).state, GuardState::Chasing);

    // Only an explicit patrol command ends it. The target slips out of
    // sight first, or the next sighting would just restart the chase.
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(1000.0, 1000.0),
    });
    sim.tick();
    sim.queue_command(SessionCommand::Guard {
        guard: GuardId(0),
        command: GuardCommand::Patrol,
    });
    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).state, GuardState::Patrolling);
    assert_eq!(guard_view(&snap, 0).destination, p(0.0, 100.0));
}

// ---- Alarms and the relay ----

#[test]
fn test_alarm_dispatches_nearest_guard_only() {
    let lvl = level(
        vec![
            guard_at(0.0, 0.0, vec![0]),
            guard_at(100.0, 0.0, vec![1]),
        ],
        vec![point("west", 0.0, 0.0), point("east", 100.0, 0.0)],
    );
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::TriggerAlarm {
        location: p(90.0, 0.0),
        origin: p(95.0, 0.0),
    });

    let snap = sim.tick();
    assert_eq!(guard_view(&snap, 0).state, GuardState::Patrolling);
    assert_eq!(guard_view(&snap, 1).state, GuardState::Investigating);
    assert_eq!(guard_view(&snap, 1).destination, p(90.0, 0.0));
}

#[test]
fn test_relay_reassigns_agent_nearest_to_origin() {
    // Alert origin at (100, 0); candidate guards at distances 4 and 10.
    // Only the distance-4 guard is reassigned.
    let lvl = level(
        vec![
            guard_at(0.0, 0.0, vec![0]),
            guard_at(104.0, 0.0, vec![1]),
            guard_at(110.0, 0.0, vec![2]),
        ],
        vec![
            point("base", 0.0, 0.0),
            point("mid", 104.0, 0.0),
            point("far", 110.0, 0.0),
            point("gate-n", 100.0, 5.0),
            point("gate-s", 100.0, -5.0),
            point("gate-e", 102.0, 0.0),
        ],
    );
    let mut sim = engine(lvl);
    // Guard 0 is already within investigation tolerance of the alarm
    // spot, so the relay fires on the very next tick.
    sim.queue_command(SessionCommand::TriggerAlarm {
        location: p(2.0, 0.0),
        origin: p(100.0, 0.0),
    });

    let snap = sim.tick();
    assert!(snap.events.contains(&SimEvent::AlertRaised {
        guard: GuardId(0),
        origin: p(100.0, 0.0),
    }));
    assert!(snap.events.contains(&SimEvent::AlertRelayed {
        from: GuardId(0),
        to: GuardId(1),
    }));

    let reassigned = guard_view(&snap, 1);
    assert_eq!(reassigned.route_len, 5, "fan-out of nearest route points");
    assert_eq!(reassigned.route_index, 0);
    // Nearest route point to the origin is "gate-e".
    assert_eq!(reassigned.destination, p(102.0, 0.0));

    // The farther candidate keeps its authored route.
    let untouched = guard_view(&snap, 2);
    assert_eq!(untouched.route_len, 1);
    assert_eq!(untouched.destination, p(110.0, 0.0));

    // The alerting guard returned to patrol.
    assert_eq!(guard_view(&snap, 0).state, GuardState::Patrolling);
}

#[test]
fn test_relay_can_select_the_alerting_guard_itself() {
    // A lone guard nearest to its own alert origin reassigns itself.
    let lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![
            point("home", 0.0, 0.0),
            point("gate-a", 20.0, 0.0),
            point("gate-b", 22.0, 0.0),
        ],
    );
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::TriggerAlarm {
        location: p(1.0, 0.0),
        origin: p(21.0, 0.0),
    });

    let snap = sim.tick();
    assert!(snap.events.contains(&SimEvent::AlertRelayed {
        from: GuardId(0),
        to: GuardId(0),
    }));
    let guard = guard_view(&snap, 0);
    assert_eq!(guard.route_len, 3);
    assert_eq!(guard.state, GuardState::Patrolling);
}

#[test]
fn test_alarm_with_no_guards_is_a_noop() {
    let mut sim = engine(LevelConfig::default());
    sim.queue_command(SessionCommand::TriggerAlarm {
        location: p(1.0, 0.0),
        origin: p(2.0, 0.0),
    });
    let snap = sim.tick();
    assert!(snap.events.is_empty());
    assert!(snap.guards.is_empty());
}

// ---- Idle guards ----

#[test]
fn test_idle_guard_holds_position_until_reassigned() {
    let mut spec = guard_at(5.0, 5.0, vec![0, 1]);
    spec.starting_state = GuardState::Idle;
    let lvl = level(
        vec![spec],
        vec![point("a", 0.0, 0.0), point("b", 10.0, 0.0)],
    );
    let mut sim = engine(lvl);

    for _ in 0..30 {
        let snap = sim.tick();
        let guard = guard_view(&snap, 0);
        assert_eq!(guard.state, GuardState::Idle);
        assert_eq!(guard.position, p(5.0, 5.0));
    }
}

#[test]
fn test_idle_reassignment_resumes_authored_route_exactly_once() {
    let mut spec = guard_at(5.0, 5.0, vec![0, 1]);
    spec.starting_state = GuardState::Idle;
    let lvl = level(
        vec![spec],
        vec![point("a", 0.0, 0.0), point("b", 10.0, 0.0)],
    );
    let mut sim = engine(lvl);
    sim.tick();

    // First reassignment: the authored route is preserved, the current
    // destination is re-issued, and the guard starts patrolling.
    sim.queue_command(SessionCommand::Guard {
        guard: GuardId(0),
        command: GuardCommand::Reassign {
            route: vec![RoutePointId(1)],
        },
    });
    let snap = sim.tick();
    let guard = guard_view(&snap, 0);
    assert_eq!(guard.state, GuardState::Patrolling);
    assert_eq!(guard.route_len, 2, "authored route survives");
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::RouteReassigned { .. })));

    // Second reassignment hits a patrolling guard and replaces the route.
    sim.queue_command(SessionCommand::Guard {
        guard: GuardId(0),
        command: GuardCommand::Reassign {
            route: vec![RoutePointId(1)],
        },
    });
    let snap = sim.tick();
    let guard = guard_view(&snap, 0);
    assert_eq!(guard.route_len, 1);
    assert!(snap.events.contains(&SimEvent::RouteReassigned {
        guard: GuardId(0),
        points: 1,
    }));
}

// ---- Exposure meter ----

/// An idle guard aimed north with the target in its cone: a stable,
/// motionless sighting for meter tests.
fn staring_contest() -> SimulationEngine {
    let mut spec = guard_at(0.0, 0.0, vec![0]);
    spec.starting_state = GuardState::Idle;
    spec.facing = Some(DVec3::Y);
    let lvl = level(vec![spec], vec![point("here", 0.0, 0.0)]);
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(0.0, 10.0),
    });
    sim
}

#[test]
fn test_exposure_rises_with_sighting_and_decays_without() {
    let mut sim = staring_contest();

    // ~1.17s per block of 35 ticks: exactly one sample each.
    for _ in 0..35 {
        sim.tick();
    }
    assert_eq!(sim.current_exposure(), 1);
    for _ in 0..30 {
        sim.tick();
    }
    assert_eq!(sim.current_exposure(), 2);
    for _ in 0..30 {
        sim.tick();
    }
    assert_eq!(sim.current_exposure(), 3);

    // Break line of sight: the next sample bleeds the meter down.
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(0.0, -10.0),
    });
    for _ in 0..30 {
        sim.tick();
    }
    assert_eq!(sim.current_exposure(), 2);
    assert_eq!(sim.phase(), GamePhase::Active);
}

#[test]
fn test_saturation_ends_the_session_exactly_once() {
    let mut sim = staring_contest();

    let mut detected_events = 0;
    for _ in 0..400 {
        let snap = sim.tick();
        detected_events += snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::TargetDetected))
            .count();
    }

    assert_eq!(detected_events, 1);
    assert_eq!(sim.phase(), GamePhase::Detected);
    assert_eq!(sim.current_exposure(), 5, "meter frozen at saturation");

    // Terminal: time no longer advances.
    let before = sim.time().tick;
    sim.tick();
    assert_eq!(sim.time().tick, before);
}

// ---- Mechanisms and exit ----

#[test]
fn test_mechanism_trips_once_and_dispatches_investigation() {
    let mut lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![
            point("home", 0.0, 0.0),
            point("gate-a", 20.0, 1.0),
            point("gate-b", 20.0, -1.0),
        ],
    );
    lvl.mechanisms
        .push(MechanismSpec::new(p(5.0, 0.0), p(20.0, 0.0)));
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(5.5, 0.0),
    });

    let snap = sim.tick();
    assert!(snap
        .events
        .contains(&SimEvent::MechanismTripped { index: 0 }));
    assert!(snap.mechanisms[0].tripped);

    // The target slips away; the guard must not chase it mid-errand.
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(1000.0, 1000.0),
    });

    let mut trip_events = 0;
    let mut last = snap;
    for _ in 0..90 {
        last = sim.tick();
        trip_events += last
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::MechanismTripped { .. }))
            .count();
    }
    assert_eq!(trip_events, 0, "tripping is one-shot");
    assert_eq!(last.mechanisms[0].progress, 1.0);
    assert_eq!(
        last.mechanisms[0].gate_drop,
        curfew_core::constants::GATE_DROP_DISTANCE
    );

    // The lone guard investigated the lever and relayed the gate
    // location to itself: its route now hugs the gate.
    let guard = guard_view(&last, 0);
    assert_eq!(guard.state, GuardState::Patrolling);
    assert_eq!(guard.route_len, 3);
}

#[test]
fn test_exit_zone_completes_the_level() {
    let mut lvl = level(
        vec![guard_at(0.0, 0.0, vec![0])],
        vec![point("home", 0.0, 0.0)],
    );
    lvl.exit_zone = Some(SphereSpec::new(p(50.0, 0.0), 2.0));
    let mut sim = engine(lvl);
    sim.queue_command(SessionCommand::SetTargetPosition {
        position: p(50.0, 0.0),
    });

    let snap = sim.tick();
    assert_eq!(snap.phase, GamePhase::Complete);
    assert!(snap.events.contains(&SimEvent::LevelComplete));

    // Terminal and one-shot.
    let snap = sim.tick();
    assert_eq!(snap.phase, GamePhase::Complete);
    assert!(snap.events.is_empty());
}

// ---- Session lifecycle ----

#[test]
fn test_pause_and_resume() {
    let lvl = level(
        vec![guard_at(0.0, 0.0, vec![0, 1])],
        vec![point("a", 0.0, 0.0), point("b", 10.0, 0.0)],
    );
    let mut sim = engine(lvl);
    sim.tick();

    sim.queue_command(SessionCommand::Pause);
    let snap = sim.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    let paused_tick = snap.time.tick;

    let snap = sim.tick();
    assert_eq!(snap.time.tick, paused_tick);

    sim.queue_command(SessionCommand::Resume);
    let snap = sim.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.time.tick > paused_tick);
}

#[test]
fn test_reset_restores_authored_defaults() {
    let mut sim = staring_contest();

    // Let the meter climb and the session end.
    for _ in 0..400 {
        sim.tick();
    }
    assert_eq!(sim.phase(), GamePhase::Detected);

    sim.queue_command(SessionCommand::Reset);
    let snap = sim.tick();
    assert_eq!(sim.phase(), GamePhase::Active);
    assert_eq!(snap.exposure.value, 0);
    assert!(!snap.exposure.detected);
    assert_eq!(snap.time.tick, 1, "clock restarted");

    let guard = guard_view(&snap, 0);
    assert_eq!(guard.state, GuardState::Idle);
    assert_eq!(guard.position, p(0.0, 0.0));
    // The target is back at its authored start, far from the guard.
    assert_eq!(snap.target.position, p(1000.0, 1000.0));
}

#[test]
fn test_engine_refuses_invalid_level() {
    let lvl = level(vec![guard_at(0.0, 0.0, vec![])], vec![]);
    let err = SimulationEngine::new(SimConfig { seed: 1, level: lvl }).unwrap_err();
    assert_eq!(err, ConfigError::EmptyRoute { guard: GuardId(0) });
}

// ---- Determinism ----

fn patrol_level_with_random_guard() -> LevelConfig {
    let mut wanderer = guard_at(0.0, 0.0, vec![0, 1, 2, 3]);
    wanderer.policy = PatrolPolicy::Random;
    level(
        vec![wanderer, guard_at(30.0, 30.0, vec![0, 1, 2, 3])],
        vec![
            point("nw", 0.0, 10.0),
            point("ne", 10.0, 10.0),
            point("se", 10.0, 0.0),
            point("sw", 0.0, 0.0),
        ],
    )
}

#[test]
fn test_determinism_same_seed() {
    let mut sim_a = engine(patrol_level_with_random_guard());
    let mut sim_b = engine(patrol_level_with_random_guard());

    for i in 0..600 {
        if i == 200 {
            let cmd = SessionCommand::SetTargetPosition {
                position: p(5.0, 5.0),
            };
            sim_a.queue_command(cmd.clone());
            sim_b.queue_command(cmd);
        }
        let json_a = serde_json::to_string(&sim_a.tick()).unwrap();
        let json_b = serde_json::to_string(&sim_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged at tick {i}");
    }
}

#[test]
fn test_determinism_different_seeds_diverge() {
    let mut sim_a = SimulationEngine::new(SimConfig {
        seed: 111,
        level: patrol_level_with_random_guard(),
    })
    .unwrap();
    let mut sim_b = SimulationEngine::new(SimConfig {
        seed: 222,
        level: patrol_level_with_random_guard(),
    })
    .unwrap();

    // Random waypoint draws differ between seeds; over many arrivals
    // the wandering guard's routes must diverge.
    let mut diverged = false;
    for _ in 0..1500 {
        let json_a = serde_json::to_string(&sim_a.tick()).unwrap();
        let json_b = serde_json::to_string(&sim_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should produce divergent output");
}
