//! Commands sent from outside collaborators to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArenaCommand {
    /// Build the arena and start the configured first wave.
    StartGame,
    /// Abandon the current wave and start a specific one.
    StartWave { wave_number: u32 },
    /// The combat collaborator confirmed an enemy death.
    ReportKill { entity: EntityId },
    /// Move the player (the host does not simulate player input).
    SetPlayerPosition { x: f64, y: f64 },
    Pause,
    Resume,
}
