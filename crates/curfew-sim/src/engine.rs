//! Simulation engine — the core of the session.
//!
//! `SimulationEngine` owns the hecs world, the spatial directory, the
//! exposure meter, and the mechanism states; processes session
//! commands at tick boundaries; runs all systems in order; and
//! produces a `LevelStateSnapshot` per tick.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use curfew_core::commands::{GuardCommand, SessionCommand};
use curfew_core::components::{Guard, Position};
use curfew_core::config::LevelConfig;
use curfew_core::constants::DT;
use curfew_core::enums::GamePhase;
use curfew_core::error::ConfigError;
use curfew_core::events::SimEvent;
use curfew_core::state::LevelStateSnapshot;
use curfew_core::types::SimTime;
use curfew_spatial::SpatialDirectory;

use crate::systems;
use crate::systems::exposure::ExposureMeter;
use crate::systems::mechanism::MechanismState;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub level: LevelConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            level: LevelConfig::default(),
        }
    }
}

/// The evading target as reported by the world collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetState {
    pub position: DVec3,
    /// Recomputed from concealment-zone membership every tick.
    pub concealed: bool,
}

/// The simulation engine. Owns all session state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    seed: u64,
    level: LevelConfig,
    directory: SpatialDirectory,
    exposure: ExposureMeter,
    mechanisms: Vec<MechanismState>,
    target: TargetState,
    command_queue: VecDeque<SessionCommand>,
    events: Vec<SimEvent>,
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("time", &self.time)
            .field("phase", &self.phase)
            .field("seed", &self.seed)
            .field("exposure", &self.exposure)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl SimulationEngine {
    /// Create an engine for the given level.
    ///
    /// Refuses to start on invalid authoring rather than failing later
    /// with an out-of-range access.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.level.validate()?;

        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            exposure: ExposureMeter::new(&config.level.settings.exposure),
            mechanisms: Vec::new(),
            target: TargetState::default(),
            level: config.level,
            directory: SpatialDirectory::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        };
        engine.rebuild();
        Ok(engine)
    }

    /// Queue a session command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting
    /// snapshot.
    pub fn tick(&mut self) -> LevelStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build(
            &self.world,
            &self.time,
            self.phase,
            &self.target,
            &self.exposure,
            &self.mechanisms,
            events,
        )
    }

    /// Reinitialize every guard, route assignment, mechanism, the
    /// target, and the meter to level-authored defaults.
    pub fn reset_all(&mut self) {
        self.events.clear();
        self.rebuild();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Current exposure meter value, for UI display.
    pub fn current_exposure(&self) -> u32 {
        self.exposure.value()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the spatial directory.
    pub fn directory(&self) -> &SpatialDirectory {
        &self.directory
    }

    /// Discard all core state and rebuild it from the authored level.
    fn rebuild(&mut self) {
        self.world = World::new();
        self.directory = SpatialDirectory::new();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
        self.exposure = ExposureMeter::new(&self.level.settings.exposure);
        self.mechanisms = self
            .level
            .mechanisms
            .iter()
            .cloned()
            .map(MechanismState::new)
            .collect();
        self.target = TargetState {
            position: self.level.target_start,
            concealed: false,
        };
        world_setup::setup_level(
            &mut self.world,
            &mut self.directory,
            &self.level,
            &mut self.rng,
        );
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single session command.
    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            SessionCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            SessionCommand::Reset => {
                self.reset_all();
            }
            SessionCommand::SetTargetPosition { position } => {
                self.target.position = position;
            }
            SessionCommand::TriggerAlarm { location, origin } => {
                self.dispatch_alarm(location, origin);
            }
            SessionCommand::Guard { guard, command } => {
                if let Some(entity) = systems::guard_ai::find_guard(&self.world, guard) {
                    systems::guard_ai::apply_command_to(
                        &mut self.world,
                        entity,
                        &command,
                        self.target.position,
                        &self.directory,
                        &mut self.events,
                    );
                }
            }
        }
    }

    /// Send the guard nearest to `location` to investigate it. A level
    /// with no guards makes this a no-op.
    fn dispatch_alarm(&mut self, location: DVec3, origin: DVec3) {
        let Ok(nearest) = self.directory.nearest_agent(location) else {
            return;
        };
        let Some(entity) = systems::guard_ai::find_guard(&self.world, nearest) else {
            return;
        };
        systems::guard_ai::apply_command_to(
            &mut self.world,
            entity,
            &GuardCommand::Investigate {
                destination: location,
                origin,
            },
            self.target.position,
            &self.directory,
            &mut self.events,
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // Refresh the spatial registry with current positions so every
        // nearest-agent query this tick agrees with the world.
        {
            let mut query = self.world.query::<(&Guard, &Position)>();
            for (_entity, (guard, pos)) in query.iter() {
                self.directory.update_agent(guard.id, pos.0);
            }
        }

        // Concealment follows zone membership.
        self.target.concealed = self
            .level
            .concealment_zones
            .iter()
            .any(|zone| zone.contains(self.target.position));

        // 1. Mechanism trips raise alarms toward the nearest guard.
        let alarms = systems::mechanism::run(
            &mut self.mechanisms,
            self.target.position,
            DT,
            &mut self.events,
        );
        for alarm in alarms {
            self.dispatch_alarm(alarm.location, alarm.origin);
        }

        // 2. Perception for every guard — complete before the detector
        // samples, so exposure never sees a half-updated tick.
        systems::perception::run(
            &mut self.world,
            &self.level.obstacles,
            self.target.position,
            self.target.concealed,
            &self.directory,
            &mut self.events,
        );

        // 3. Guard state machines (arrivals, waypoint selection, pursuit).
        let alerts = systems::guard_ai::run(
            &mut self.world,
            &self.directory,
            self.target.position,
            &self.level.settings,
            &mut self.rng,
            &mut self.events,
        );

        // 4. Alert relay, consuming this tick's arrivals.
        systems::alert::run(
            &mut self.world,
            &self.directory,
            alerts,
            self.level.settings.alert_fanout,
            self.target.position,
            &mut self.events,
        );

        // 5. Exposure sampling.
        let any_sighting = systems::perception::any_sighting(&self.world);
        if self.exposure.tick(DT, any_sighting) {
            self.events.push(SimEvent::TargetDetected);
            self.phase = GamePhase::Detected;
        }

        // 6. Movement integration.
        systems::movement::run(&mut self.world, DT);

        // 7. Exit zone.
        if let Some(zone) = &self.level.exit_zone {
            if zone.contains(self.target.position) {
                self.phase = GamePhase::Complete;
                self.events.push(SimEvent::LevelComplete);
            }
        }
    }
}
