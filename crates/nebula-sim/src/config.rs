//! Simulation configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nebula_core::constants::{DEFAULT_PLANET_COUNT, DEFAULT_VORTEX_COUNT, INTER_WAVE_DELAY_MS};
use nebula_core::enums::SpawnOrder;
use nebula_core::types::ArenaBounds;
use nebula_procgen::WaveTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration for starting a new simulation.
///
/// Every field has a default, so a config file only names what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Simulated time per tick as a multiple of the fixed step.
    pub time_scale: f64,
    pub bounds: ArenaBounds,
    pub spawn_order: SpawnOrder,
    /// Wave started by `StartGame`.
    pub first_wave: u32,
    /// Start the next wave automatically after a wave completes.
    pub auto_advance: bool,
    pub inter_wave_delay_ms: f64,
    pub planet_count: u32,
    pub vortex_count: u32,
    pub wave_tuning: WaveTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            bounds: ArenaBounds::default(),
            spawn_order: SpawnOrder::default(),
            first_wave: 1,
            auto_advance: true,
            inter_wave_delay_ms: INTER_WAVE_DELAY_MS,
            planet_count: DEFAULT_PLANET_COUNT,
            vortex_count: DEFAULT_VORTEX_COUNT,
            wave_tuning: WaveTuning::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if !positive(self.bounds.width) || !positive(self.bounds.height) {
            return Err(invalid("bounds", format!("{:?} must be positive", self.bounds)));
        }
        if self.first_wave == 0 {
            return Err(invalid("first_wave", "waves start at 1".to_string()));
        }
        if !(0.0..=4.0).contains(&self.time_scale) {
            return Err(invalid("time_scale", format!("{} is outside 0..=4", self.time_scale)));
        }
        if !self.inter_wave_delay_ms.is_finite() || self.inter_wave_delay_ms < 0.0 {
            return Err(invalid(
                "inter_wave_delay_ms",
                format!("{} must be a non-negative duration", self.inter_wave_delay_ms),
            ));
        }
        if !positive(self.wave_tuning.min_spawn_delay_ms) {
            return Err(invalid(
                "wave_tuning.min_spawn_delay_ms",
                format!("{} must be positive", self.wave_tuning.min_spawn_delay_ms),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
