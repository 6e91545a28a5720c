//! Simulation engine, the host world around the faction AI.
//!
//! `SimulationEngine` owns the hecs ECS world, processes arena commands,
//! runs all systems in a fixed order, and produces `ArenaSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nebula_core::commands::ArenaCommand;
use nebula_core::components::Transform;
use nebula_core::enums::{EntityKind, GamePhase};
use nebula_core::events::GameEvent;
use nebula_core::state::ArenaSnapshot;
use nebula_core::types::{DVec2, EntityId, SimTime};
use nebula_faction_ai::AiCoordinator;
use nebula_procgen::WaveGenerator;

use crate::config::{ConfigError, SimConfig};
use crate::ids::{entity_id, hecs_entity};
use crate::systems;
use crate::systems::wave_spawner::WaveScheduler;
use crate::world_setup;

/// Next wave queued after a completion.
#[derive(Debug, Clone, Copy)]
struct PendingWave {
    wave_number: u32,
    timer_ms: f64,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<ArenaCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    player: Option<Entity>,
    coordinator: AiCoordinator,
    generator: WaveGenerator,
    scheduler: WaveScheduler,
    pending_wave: Option<PendingWave>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let generator = WaveGenerator::new(config.wave_tuning.clone(), config.bounds)
            .with_spawn_order(config.spawn_order);
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            player: None,
            coordinator: AiCoordinator::default(),
            generator,
            scheduler: WaveScheduler::default(),
            pending_wave: None,
            config,
        }
    }

    /// Validate `config`, then create the engine.
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: ArenaCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = ArenaCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> ArenaSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt_ms = self.time.dt_ms() * self.config.time_scale;
            self.run_systems(dt_ms);
            self.time.advance_by(dt_ms);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.phase, self.scheduler.view(), events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player.map(entity_id)
    }

    /// Spawn an enemy outside the wave schedule (for testing).
    #[cfg(test)]
    pub fn spawn_test_enemy(&mut self, faction: nebula_core::enums::FactionTag, position: DVec2) -> EntityId {
        let entity = world_setup::spawn_enemy(&mut self.world, faction, position, DVec2::ZERO, 1.0)
            .unwrap_or_else(|| world_setup::spawn_raw_enemy(&mut self.world, faction, position));
        entity_id(entity)
    }

    #[cfg(test)]
    pub fn coordinator(&self) -> &AiCoordinator {
        &self.coordinator
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
        self.arm_next_wave();
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: ArenaCommand) {
        match command {
            ArenaCommand::StartGame => {
                if self.phase == GamePhase::MainMenu {
                    self.player = Some(world_setup::setup_arena(&mut self.world, &mut self.rng, &self.config));
                    self.coordinator = AiCoordinator::default();
                    self.scheduler = WaveScheduler::default();
                    self.pending_wave = None;
                    self.time = SimTime::default();
                    self.phase = GamePhase::Active;
                    info!("game started with seed {}", self.config.seed);
                    self.start_wave(self.config.first_wave);
                }
            }
            ArenaCommand::StartWave { wave_number } => {
                if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
                    self.clear_combatants();
                    self.pending_wave = None;
                    self.start_wave(wave_number);
                }
            }
            ArenaCommand::ReportKill { entity } => self.report_kill(entity),
            ArenaCommand::SetPlayerPosition { x, y } => {
                let Some(player) = self.player else {
                    return;
                };
                if let Ok(mut transform) = self.world.get::<&mut Transform>(player) {
                    transform.position = self.config.bounds.clamp(DVec2::new(x, y), 0.0);
                }
            }
            ArenaCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            ArenaCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn start_wave(&mut self, wave_number: u32) {
        // Failures are logged by the scheduler, which stays idle.
        let _ = self
            .scheduler
            .start_wave(&self.generator, wave_number, &mut self.rng, &mut self.events);
    }

    /// Despawn a confirmed kill and count it against the current wave.
    fn report_kill(&mut self, id: EntityId) {
        let Some(entity) = hecs_entity(id) else {
            debug!("kill report for unknown id {id:?} ignored");
            return;
        };
        let is_enemy = self
            .world
            .get::<&EntityKind>(entity)
            .is_ok_and(|kind| *kind == EntityKind::Enemy);
        if !is_enemy {
            debug!("kill report for {id:?} ignored: not a live enemy");
            return;
        }

        let _ = self.world.despawn(entity);
        self.coordinator.forget(id);
        self.events.push(GameEvent::EnemyKilled { entity: id });
        self.scheduler.record_kill(&mut self.events);
    }

    /// Despawn every enemy and projectile.
    fn clear_combatants(&mut self) {
        self.despawn_buffer.clear();
        for (entity, kind) in self.world.query_mut::<&EntityKind>() {
            if matches!(kind, EntityKind::Enemy | EntityKind::Projectile) {
                self.despawn_buffer.push(entity);
            }
        }
        for entity in self.despawn_buffer.drain(..) {
            self.coordinator.forget(entity_id(entity));
            let _ = self.world.despawn(entity);
        }
    }

    /// Queue the next wave if one just completed.
    fn arm_next_wave(&mut self) {
        let Some(completed) = self.scheduler.take_completed() else {
            return;
        };
        if self.config.auto_advance {
            self.pending_wave = Some(PendingWave {
                wave_number: completed + 1,
                timer_ms: self.config.inter_wave_delay_ms,
            });
        }
    }

    /// Run all systems in order for one tick of `dt_ms`.
    fn run_systems(&mut self, dt_ms: f64) {
        // 1. Wave scheduler (spawn requests, boss phase)
        self.scheduler.update(dt_ms, &mut self.events);
        // 2. Faction AI
        systems::faction_ai::run(
            &mut self.world,
            self.player,
            &mut self.coordinator,
            &mut self.rng,
            &mut self.events,
            dt_ms,
            self.time.elapsed_ms,
        );
        // 3. Requests (enemy spawns, shots, shockwaves)
        systems::requests::run(&mut self.world, &mut self.events);
        // 4. Weapon cooldowns and projectile lifetimes
        systems::weapons::run(&mut self.world, dt_ms);
        // 5. Health regen and invulnerability
        systems::vitals::run(&mut self.world, dt_ms);
        // 6. Gravity wells
        systems::gravity::run(&mut self.world);
        // 7. Movement integration
        systems::movement::run(&mut self.world, dt_ms);
        // 8. Cleanup (expired and OOB projectiles, arena walls)
        for id in systems::cleanup::run(&mut self.world, &self.config.bounds, &mut self.despawn_buffer) {
            self.coordinator.forget(id);
        }
        // 9. Inter-wave pacing
        self.arm_next_wave();
        self.advance_pending_wave(dt_ms);
    }

    fn advance_pending_wave(&mut self, dt_ms: f64) {
        let Some(pending) = self.pending_wave.as_mut() else {
            return;
        };
        pending.timer_ms -= dt_ms;
        if pending.timer_ms <= 0.0 {
            let wave_number = pending.wave_number;
            self.pending_wave = None;
            self.start_wave(wave_number);
        }
    }
}
