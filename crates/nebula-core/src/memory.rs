//! Per-faction scratch memory stored on the `Ai` component.
//!
//! Each faction behavior owns exactly one variant. A missing or mismatched
//! variant means the entity has not been seen by its behavior yet.

use serde::{Deserialize, Serialize};

use crate::enums::SwarmPhase;
use crate::types::{DVec2, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactionMemory {
    Swarm(SwarmMemory),
    Sentinel(SentinelMemory),
    Phantom(PhantomMemory),
    Titan(TitanMemory),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmMemory {
    pub phase: SwarmPhase,
    /// Remaining time in the current dive or buzz phase (ms).
    pub phase_timer_ms: f64,
    /// Countdown until the next dive is allowed (ms).
    pub dive_timer_ms: f64,
    pub dive_target: Option<DVec2>,
    pub target: Option<EntityId>,
    pub target_position: Option<DVec2>,
    pub orbit_angle: f64,
    /// +1 or -1.
    pub orbit_direction: f64,
    /// Per-entity offset so jitter is not in lockstep across the swarm.
    pub jitter_phase: f64,
    pub wander_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelMemory {
    pub group_id: u32,
    pub leader: Option<EntityId>,
    pub formation_offset: DVec2,
    pub patrol_center: DVec2,
    pub patrol_angle: f64,
    pub target: Option<EntityId>,
    pub target_position: Option<DVec2>,
    /// Where an ally asked this sentinel to go.
    pub response_position: Option<DVec2>,
    pub response_timer_ms: f64,
    /// Countdown before this sentinel may call for backup again (ms).
    pub backup_cooldown_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhantomMemory {
    pub target: Option<EntityId>,
    pub target_position: Option<DVec2>,
    pub last_known_position: Option<DVec2>,
    /// Countdown to the next dash evaluation (ms).
    pub dash_check_timer_ms: f64,
    /// Remaining dash duration (ms); dashing while > 0.
    pub dash_timer_ms: f64,
    pub dash_cooldown_ms: f64,
    pub dash_direction: DVec2,
    /// Countdown to the next visibility toggle (ms).
    pub phase_timer_ms: f64,
    pub phased: bool,
    /// +1 or -1, side used when strafing.
    pub strafe_direction: f64,
    pub base_max_speed: f64,
    pub hunt_point: Option<DVec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitanMemory {
    pub target: Option<EntityId>,
    pub target_position: Option<DVec2>,
    /// Remaining charge time (ms).
    pub charge_timer_ms: f64,
    pub charge_direction: DVec2,
    pub charge_cooldown_ms: f64,
    pub slam_timer_ms: f64,
    pub base_max_speed: f64,
}
