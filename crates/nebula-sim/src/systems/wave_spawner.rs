//! Wave scheduler: releases a generated wave one spawn at a time and tracks
//! it to completion.

use log::{debug, info, warn};
use rand::Rng;

use nebula_core::constants::BOSS_PHASE_DELAY_MS;
use nebula_core::enums::WavePhase;
use nebula_core::events::{EventSink, GameEvent};
use nebula_core::state::WaveView;
use nebula_core::types::DVec2;
use nebula_procgen::{SpawnEntry, WaveConfig, WaveError, WaveGenerator};

#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    config: Option<WaveConfig>,
    phase: WavePhase,
    next_entry: usize,
    spawn_clock_ms: f64,
    spawns_remaining: u32,
    enemies_remaining: u32,
    /// Countdown to `BossPhaseStart`, tagged with its wave.
    boss_timer: Option<(u32, f64)>,
    /// Wave that completed since the last `take_completed`.
    completed: Option<u32>,
}

impl WaveScheduler {
    /// Generate and start `wave_number`, replacing any wave in progress.
    ///
    /// On failure the scheduler is left idle.
    pub fn start_wave<R: Rng + ?Sized>(
        &mut self,
        generator: &WaveGenerator,
        wave_number: u32,
        rng: &mut R,
        events: &mut dyn EventSink,
    ) -> Result<(), WaveError> {
        let config = match generator.generate(wave_number, rng) {
            Ok(config) => config,
            Err(err) => {
                warn!("wave {wave_number} could not be generated: {err}");
                self.config = None;
                self.phase = WavePhase::Idle;
                self.spawns_remaining = 0;
                self.enemies_remaining = 0;
                return Err(err);
            }
        };

        info!(
            "wave {} starting: {} enemies, {} ms apart{}",
            config.wave_number,
            config.total_enemies,
            config.spawn_delay_ms,
            if config.boss_wave { " (boss wave)" } else { "" }
        );

        events.emit(GameEvent::WaveAnnounced {
            wave_number: config.wave_number,
            total_enemies: config.total_enemies,
            boss_wave: config.boss_wave,
        });
        events.emit(GameEvent::WaveStart {
            wave_number: config.wave_number,
        });

        self.phase = WavePhase::Spawning;
        self.next_entry = 0;
        self.spawn_clock_ms = 0.0;
        self.spawns_remaining = config.total_enemies;
        self.enemies_remaining = config.total_enemies;
        self.completed = None;
        self.config = Some(config);

        if self.spawns_remaining == 0 {
            self.phase = WavePhase::Clearing;
            self.check_wave_complete(events);
        }
        Ok(())
    }

    /// Advance the spawn clock by `dt_ms`.
    ///
    /// Releases at most one entry per call, as a `SpawnEnemyRequest`. Also
    /// counts down a pending boss phase.
    pub fn update(&mut self, dt_ms: f64, events: &mut dyn EventSink) -> Option<SpawnEntry> {
        let spawned = self.release_spawn(dt_ms, events);

        if let Some((wave_number, timer_ms)) = self.boss_timer.as_mut() {
            *timer_ms -= dt_ms;
            if *timer_ms <= 0.0 {
                info!("boss phase for wave {wave_number}");
                events.emit(GameEvent::BossPhaseStart {
                    wave_number: *wave_number,
                });
                self.boss_timer = None;
            }
        }

        spawned
    }

    fn release_spawn(&mut self, dt_ms: f64, events: &mut dyn EventSink) -> Option<SpawnEntry> {
        if self.phase != WavePhase::Spawning {
            return None;
        }
        let config = self.config.as_ref()?;

        self.spawn_clock_ms += dt_ms;
        if self.spawn_clock_ms < config.spawn_delay_ms {
            return None;
        }
        self.spawn_clock_ms -= config.spawn_delay_ms;

        let entry = config.entries.get(self.next_entry).copied();
        if let Some(entry) = entry {
            self.next_entry += 1;
            self.spawns_remaining = self.spawns_remaining.saturating_sub(1);
            events.emit(GameEvent::SpawnEnemyRequest {
                faction: entry.faction,
                position: entry.position,
                velocity: DVec2::ZERO,
                strength_multiplier: config.strength_multiplier,
            });
        }

        if self.spawns_remaining == 0 || entry.is_none() {
            self.spawns_remaining = 0;
            self.phase = WavePhase::Clearing;
            debug!("wave {} fully spawned", config.wave_number);
            self.check_wave_complete(events);
        }
        entry
    }

    /// Count one enemy of the current wave as destroyed.
    pub fn record_kill(&mut self, events: &mut dyn EventSink) {
        if !matches!(self.phase, WavePhase::Spawning | WavePhase::Clearing) {
            return;
        }
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        self.check_wave_complete(events);
    }

    /// Complete the wave once nothing is left to spawn or kill.
    ///
    /// Emits `WaveComplete` exactly once per wave; returns whether this call
    /// completed it.
    pub fn check_wave_complete(&mut self, events: &mut dyn EventSink) -> bool {
        if !matches!(self.phase, WavePhase::Spawning | WavePhase::Clearing)
            || self.spawns_remaining > 0
            || self.enemies_remaining > 0
        {
            return false;
        }
        let Some(config) = self.config.as_ref() else {
            return false;
        };

        self.phase = WavePhase::Complete;
        self.completed = Some(config.wave_number);
        info!("wave {} complete", config.wave_number);
        events.emit(GameEvent::WaveComplete {
            wave_number: config.wave_number,
        });
        if config.boss_wave {
            self.boss_timer = Some((config.wave_number, BOSS_PHASE_DELAY_MS));
        }
        true
    }

    /// The wave completed since the last call, if any.
    pub fn take_completed(&mut self) -> Option<u32> {
        self.completed.take()
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn wave_number(&self) -> u32 {
        self.config.as_ref().map_or(0, |c| c.wave_number)
    }

    pub fn spawns_remaining(&self) -> u32 {
        self.spawns_remaining
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn config(&self) -> Option<&WaveConfig> {
        self.config.as_ref()
    }

    pub fn view(&self) -> WaveView {
        let Some(config) = self.config.as_ref() else {
            return WaveView {
                phase: self.phase,
                ..WaveView::default()
            };
        };
        WaveView {
            wave_number: config.wave_number,
            phase: self.phase,
            total_enemies: config.total_enemies,
            spawns_remaining: self.spawns_remaining,
            enemies_remaining: self.enemies_remaining,
            boss_wave: config.boss_wave,
            strength_multiplier: config.strength_multiplier,
        }
    }
}
