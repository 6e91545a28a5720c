//! ECS components for host entities.
//!
//! Components are plain data structs with no behavior beyond constructors.
//! Game logic lives in the faction AI crate and in the host systems.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::memory::FactionMemory;
use crate::types::{DVec2, EntityId};

/// Position, rotation and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec2,
    /// Radians.
    pub rotation: f64,
    pub scale: f64,
}

impl Transform {
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Rigid-body state the AI steers through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub velocity: DVec2,
    pub mass: f64,
    pub radius: f64,
    /// Fraction of velocity kept per second, 0..=1.
    pub damping: f64,
    pub max_speed: f64,
    /// Acceleration accumulated this tick, cleared by integration.
    pub acceleration: DVec2,
}

impl Physics {
    pub fn new(mass: f64, radius: f64, max_speed: f64) -> Self {
        Self {
            velocity: DVec2::ZERO,
            mass,
            radius,
            damping: 0.9,
            max_speed,
            acceleration: DVec2::ZERO,
        }
    }

    /// Accumulate a force, converting it to acceleration by mass.
    pub fn apply_force(&mut self, force: DVec2) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }
}

/// AI controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ai {
    pub faction: FactionTag,
    pub state: AiState,
    /// Faction-local scratch state, `None` until first seen by its behavior.
    pub memory: Option<FactionMemory>,
    /// Countdown (ms) until the next decision pass.
    pub decision_timer_ms: f64,
    pub aggression: f64,
    pub fear: f64,
}

impl Ai {
    pub fn new(faction: FactionTag) -> Self {
        Self {
            faction,
            state: AiState::Idle,
            memory: None,
            decision_timer_ms: 0.0,
            aggression: 0.5,
            fear: 0.0,
        }
    }
}

/// Ranged weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: f64,
    /// Time (ms) until the weapon may fire again; fires only when ≤ 0.
    pub cooldown_ms: f64,
    /// Cooldown applied after each shot (ms).
    pub fire_interval_ms: f64,
    pub charge: f64,
    pub max_charge_ms: f64,
    pub projectile_speed: f64,
}

impl Weapon {
    pub fn new(damage: f64, fire_interval_ms: f64, projectile_speed: f64) -> Self {
        Self {
            damage,
            cooldown_ms: 0.0,
            fire_interval_ms,
            charge: 0.0,
            max_charge_ms: 0.0,
            projectile_speed,
        }
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    pub invulnerable_ms: f64,
    /// Points regenerated per second.
    pub regen_rate: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self {
            current: max,
            max,
            invulnerable_ms: 0.0,
            regen_rate: 0.0,
        }
    }
}

/// Faction identity and alliances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub name: FactionTag,
    pub color: u32,
    pub allies: Vec<FactionTag>,
}

impl Faction {
    pub fn of(name: FactionTag) -> Self {
        Self {
            name,
            color: name.color(),
            allies: Vec::new(),
        }
    }

    pub fn is_allied_with(&self, other: FactionTag) -> bool {
        self.name == other || self.allies.contains(&other)
    }
}

/// Render alpha and whether other entities may target this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub alpha: f64,
    pub targetable: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            targetable: true,
        }
    }
}

/// Gravity-affecting hazard (planet or vortex).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityWell {
    pub kind: HazardKind,
    pub strength: f64,
    /// Radius inside which the hazard pulls on entities.
    pub influence_radius: f64,
    /// Planet body radius or vortex event horizon.
    pub core_radius: f64,
}

/// A fired projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Option<EntityId>,
    pub damage: f64,
    pub lifetime_ms: f64,
}

/// Multiplier applied to an enemy's stats at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strength(pub f64);
