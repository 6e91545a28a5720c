//! Events produced by the AI and wave core for their host collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::FactionTag;
use crate::types::{DVec2, EntityId};

/// Requests and lifecycle notifications emitted during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Ask the host to fire the shooter's weapon at an angle (radians).
    EnemyShootRequest { shooter: EntityId, angle: f64 },
    /// Ask the host to create an enemy.
    SpawnEnemyRequest {
        faction: FactionTag,
        position: DVec2,
        velocity: DVec2,
        strength_multiplier: f64,
    },
    /// Area-effect push from a titan slam.
    TitanShockwave {
        source: EntityId,
        position: DVec2,
        radius: f64,
        force: f64,
    },
    /// Cosmetic screen shake.
    CameraShake { intensity: f64, duration_ms: f64 },
    /// A wave has been generated and is about to start.
    WaveAnnounced {
        wave_number: u32,
        total_enemies: u32,
        boss_wave: bool,
    },
    WaveStart { wave_number: u32 },
    WaveComplete { wave_number: u32 },
    /// Fired a fixed delay after a boss wave completes.
    BossPhaseStart { wave_number: u32 },
    EnemySpawned {
        entity: EntityId,
        faction: FactionTag,
        position: DVec2,
    },
    EnemyKilled { entity: EntityId },
}

/// Destination for events. The core never learns whether a request was
/// honored.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
