//! Snapshot of visible state returned by the engine after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{DVec2, EntityId, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: WaveView,
    pub enemies: Vec<EnemyView>,
    pub projectile_count: u32,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave_number: u32,
    pub phase: WavePhase,
    pub total_enemies: u32,
    pub spawns_remaining: u32,
    pub enemies_remaining: u32,
    pub boss_wave: bool,
    pub strength_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub entity: EntityId,
    pub faction: FactionTag,
    pub state: AiState,
    pub position: DVec2,
    pub velocity: DVec2,
    pub alpha: f64,
    pub health: f64,
}
