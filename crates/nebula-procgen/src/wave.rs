//! Wave composition and spawn list generation.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nebula_core::constants::BOSS_WAVE_INTERVAL;
use nebula_core::enums::{FactionTag, SpawnOrder};
use nebula_core::types::{ArenaBounds, DVec2};

use crate::layout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveError {
    #[error("wave numbers start at 1, got {0}")]
    InvalidWaveNumber(u32),
}

/// Exponential per-faction growth: `floor(base × growth^(n−1))`, capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    pub base: f64,
    pub growth: f64,
    pub cap: u32,
}

impl GrowthCurve {
    pub const fn new(base: f64, growth: f64, cap: u32) -> Self {
        Self { base, growth, cap }
    }

    pub fn count(&self, wave_number: u32) -> u32 {
        let exponent = wave_number.saturating_sub(1) as i32;
        let raw = (self.base * self.growth.powi(exponent)).floor();
        (raw.max(0.0) as u32).min(self.cap)
    }
}

/// Tuning for composition, pacing and scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub swarm: GrowthCurve,
    pub sentinel: GrowthCurve,
    pub phantom: GrowthCurve,
    pub titan: GrowthCurve,
    /// Spawn delay on wave 1 (ms).
    pub base_spawn_delay_ms: f64,
    /// Spawn delay reduction per wave (ms).
    pub spawn_delay_step_ms: f64,
    pub min_spawn_delay_ms: f64,
    /// Strength multiplier gained per wave after the first.
    pub strength_per_wave: f64,
    pub boss_wave_interval: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            swarm: GrowthCurve::new(6.0, 1.25, 120),
            sentinel: GrowthCurve::new(3.0, 1.15, 40),
            phantom: GrowthCurve::new(2.0, 1.18, 40),
            titan: GrowthCurve::new(1.0, 1.12, 12),
            base_spawn_delay_ms: 800.0,
            spawn_delay_step_ms: 40.0,
            min_spawn_delay_ms: 150.0,
            strength_per_wave: 0.15,
            boss_wave_interval: BOSS_WAVE_INTERVAL,
        }
    }
}

impl WaveTuning {
    /// Enemy count per faction, in spawn pass order.
    pub fn composition(&self, wave_number: u32) -> [(FactionTag, u32); 4] {
        [
            (FactionTag::Swarm, self.swarm.count(wave_number)),
            (FactionTag::Sentinel, self.sentinel.count(wave_number)),
            (FactionTag::Phantom, self.phantom.count(wave_number)),
            (FactionTag::Titan, self.titan.count(wave_number)),
        ]
    }

    pub fn spawn_delay_ms(&self, wave_number: u32) -> f64 {
        let step = wave_number.saturating_sub(1) as f64 * self.spawn_delay_step_ms;
        (self.base_spawn_delay_ms - step).max(self.min_spawn_delay_ms)
    }

    pub fn strength_multiplier(&self, wave_number: u32) -> f64 {
        1.0 + self.strength_per_wave * wave_number.saturating_sub(1) as f64
    }

    pub fn is_boss_wave(&self, wave_number: u32) -> bool {
        self.boss_wave_interval > 0 && wave_number > 0 && wave_number % self.boss_wave_interval == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub faction: FactionTag,
    pub position: DVec2,
}

/// A fully generated wave, consumed entry by entry by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub wave_number: u32,
    pub total_enemies: u32,
    pub entries: Vec<SpawnEntry>,
    pub spawn_delay_ms: f64,
    pub boss_wave: bool,
    pub strength_multiplier: f64,
    pub spawn_order: SpawnOrder,
}

/// Produces a [`WaveConfig`] for a wave number.
#[derive(Debug, Clone, Default)]
pub struct WaveGenerator {
    pub tuning: WaveTuning,
    pub bounds: ArenaBounds,
    pub spawn_order: SpawnOrder,
}

impl WaveGenerator {
    pub fn new(tuning: WaveTuning, bounds: ArenaBounds) -> Self {
        Self {
            tuning,
            bounds,
            spawn_order: SpawnOrder::default(),
        }
    }

    pub fn with_spawn_order(mut self, spawn_order: SpawnOrder) -> Self {
        self.spawn_order = spawn_order;
        self
    }

    /// Compose and lay out wave `wave_number` (1-based).
    pub fn generate<R: Rng + ?Sized>(&self, wave_number: u32, rng: &mut R) -> Result<WaveConfig, WaveError> {
        if wave_number == 0 {
            return Err(WaveError::InvalidWaveNumber(wave_number));
        }

        let composition = self.tuning.composition(wave_number);
        let mut entries = Vec::new();
        for (faction, count) in composition {
            let count = count as usize;
            let positions = match faction {
                FactionTag::Swarm => layout::cluster(count, &self.bounds, rng),
                FactionTag::Sentinel => layout::edge_line(count, &self.bounds, rng),
                FactionTag::Titan => layout::sectors(count, &self.bounds, rng),
                _ => layout::scattered(count, &self.bounds, rng),
            };
            entries.extend(positions.into_iter().map(|position| SpawnEntry { faction, position }));
        }

        if self.spawn_order == SpawnOrder::Interleaved {
            entries.shuffle(rng);
        }

        debug!("wave {wave_number} composition: {composition:?}");

        Ok(WaveConfig {
            wave_number,
            total_enemies: entries.len() as u32,
            entries,
            spawn_delay_ms: self.tuning.spawn_delay_ms(wave_number),
            boss_wave: self.tuning.is_boss_wave(wave_number),
            strength_multiplier: self.tuning.strength_multiplier(wave_number),
            spawn_order: self.spawn_order,
        })
    }
}
