//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Category tag carried by every entity in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    Planet,
    Powerup,
    /// Vortex-style environmental hazard.
    Catastrophe,
}

/// Faction tag on an `Ai` component.
///
/// `Neutral` and `Player` are reserved tags that never get a behavior.
/// Tags the simulation does not know deserialize to `Unknown` and leave the
/// entity inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionTag {
    Swarm,
    Sentinel,
    Phantom,
    Titan,
    Neutral,
    Player,
    #[serde(other)]
    Unknown,
}

impl FactionTag {
    /// The four factions that have a behavior controller, in dispatch order.
    pub const HOSTILE: [FactionTag; 4] = [
        FactionTag::Swarm,
        FactionTag::Sentinel,
        FactionTag::Phantom,
        FactionTag::Titan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactionTag::Swarm => "swarm",
            FactionTag::Sentinel => "sentinel",
            FactionTag::Phantom => "phantom",
            FactionTag::Titan => "titan",
            FactionTag::Neutral => "neutral",
            FactionTag::Player => "player",
            FactionTag::Unknown => "unknown",
        }
    }

    /// Display color (0xRRGGBB) used by renderers.
    pub fn color(self) -> u32 {
        match self {
            FactionTag::Swarm => 0xff_44_44,
            FactionTag::Sentinel => 0x44_88_ff,
            FactionTag::Phantom => 0xaa_44_ff,
            FactionTag::Titan => 0xff_aa_00,
            FactionTag::Player => 0x44_ff_88,
            FactionTag::Neutral | FactionTag::Unknown => 0x88_88_88,
        }
    }
}

/// High-level AI state. Each faction uses its own subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,

    // --- Swarm ---
    /// Has a target; the fine-grained phase lives in swarm memory.
    Engaging,

    // --- Sentinel ---
    Patrolling,
    Orbiting,
    Responding,

    // --- Phantom ---
    Approaching,
    Attacking,
    Retreating,
    Hunting,

    // --- Titan ---
    Seeking,
    Advancing,
    SprintCharging,
    PreparingSlam,
    Slamming,
}

/// Swarm attack cycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwarmPhase {
    #[default]
    Circling,
    Diving,
    Buzzing,
}

/// Gravity hazard category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Planet,
    Vortex,
}

/// Formation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationKind {
    Circle,
    Line,
}

/// Order in which a generated wave's spawn entries are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOrder {
    /// All of one faction's pattern before the next, in generation order.
    #[default]
    Blocked,
    /// The whole spawn list shuffled across factions.
    Interleaved,
}

/// Wave scheduler lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave loaded.
    #[default]
    Idle,
    /// Spawns still queued.
    Spawning,
    /// Everything spawned, waiting for kills.
    Clearing,
    /// Both counters reached zero.
    Complete,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
}
