//! Faction-specific stat and cadence profiles.
//!
//! Consolidates the per-faction numbers shared by the behaviors and by the
//! host when it spawns an enemy.

use nebula_core::enums::FactionTag;

/// Stat and cadence profile for a hostile faction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionProfile {
    /// Interval between decision passes (ms).
    pub decision_interval_ms: f64,
    /// Target acquisition range.
    pub detection_range: f64,
    /// Maximum distance at which the faction fires.
    pub shoot_range: f64,
    /// Steering acceleration cap (units/s²).
    pub max_accel: f64,
    /// Cruise speed cap (units/s).
    pub max_speed: f64,
    pub mass: f64,
    pub radius: f64,
    pub health: f64,
    /// Damage per projectile.
    pub damage: f64,
    /// Weapon cooldown after each shot (ms).
    pub fire_interval_ms: f64,
    /// Scale on the gravity-avoidance contribution.
    pub gravity_responsiveness: f64,
}

pub const SWARM_PROFILE: FactionProfile = FactionProfile {
    decision_interval_ms: 300.0,
    detection_range: 900.0,
    shoot_range: 350.0,
    max_accel: 420.0,
    max_speed: 260.0,
    mass: 1.0,
    radius: 10.0,
    health: 20.0,
    damage: 5.0,
    fire_interval_ms: 1200.0,
    gravity_responsiveness: 1.5,
};

pub const SENTINEL_PROFILE: FactionProfile = FactionProfile {
    decision_interval_ms: 800.0,
    detection_range: 700.0,
    shoot_range: 550.0,
    max_accel: 240.0,
    max_speed: 150.0,
    mass: 3.0,
    radius: 18.0,
    health: 60.0,
    damage: 10.0,
    fire_interval_ms: 1500.0,
    gravity_responsiveness: 1.0,
};

pub const PHANTOM_PROFILE: FactionProfile = FactionProfile {
    decision_interval_ms: 500.0,
    detection_range: 1000.0,
    shoot_range: 450.0,
    max_accel: 360.0,
    max_speed: 220.0,
    mass: 1.5,
    radius: 12.0,
    health: 35.0,
    damage: 8.0,
    fire_interval_ms: 900.0,
    gravity_responsiveness: 1.2,
};

/// Heavy and slow; barely reacts to ordinary gravity.
pub const TITAN_PROFILE: FactionProfile = FactionProfile {
    decision_interval_ms: 1000.0,
    detection_range: 1400.0,
    shoot_range: 600.0,
    max_accel: 140.0,
    max_speed: 110.0,
    mass: 8.0,
    radius: 34.0,
    health: 250.0,
    damage: 25.0,
    fire_interval_ms: 2500.0,
    gravity_responsiveness: 0.35,
};

/// Profile for a faction tag, `None` for reserved or unknown tags.
pub fn get_profile(faction: FactionTag) -> Option<FactionProfile> {
    match faction {
        FactionTag::Swarm => Some(SWARM_PROFILE),
        FactionTag::Sentinel => Some(SENTINEL_PROFILE),
        FactionTag::Phantom => Some(PHANTOM_PROFILE),
        FactionTag::Titan => Some(TITAN_PROFILE),
        FactionTag::Neutral | FactionTag::Player | FactionTag::Unknown => None,
    }
}
