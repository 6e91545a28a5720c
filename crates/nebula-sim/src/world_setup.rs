//! Entity factories for the arena: player, gravity hazards, enemies and
//! projectiles.

use hecs::{Entity, World};
use log::warn;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use nebula_core::components::*;
use nebula_core::constants::*;
use nebula_core::enums::{EntityKind, FactionTag, HazardKind};
use nebula_core::types::{ArenaBounds, DVec2, EntityId};
use nebula_faction_ai::profiles::get_profile;

use crate::config::SimConfig;

/// Player ship top speed, used only by host-side integration.
const PLAYER_MAX_SPEED: f64 = 400.0;

/// Sampling attempts when placing a hazard away from the player.
const HAZARD_PLACEMENT_ATTEMPTS: usize = 16;

/// Clearance between a hazard's pull and the arena center.
const HAZARD_CENTER_CLEARANCE: f64 = 150.0;

/// Clear the world and lay out a fresh arena. Returns the player entity.
pub fn setup_arena(world: &mut World, rng: &mut ChaCha8Rng, config: &SimConfig) -> Entity {
    world.clear();
    let player = spawn_player(world, config.bounds.center());

    for _ in 0..config.planet_count {
        let body_radius = rng.gen_range(60.0..140.0);
        spawn_hazard(world, rng, &config.bounds, HazardKind::Planet, body_radius);
    }
    for _ in 0..config.vortex_count {
        let horizon = rng.gen_range(40.0..70.0);
        spawn_hazard(world, rng, &config.bounds, HazardKind::Vortex, horizon);
    }

    player
}

pub fn spawn_player(world: &mut World, position: DVec2) -> Entity {
    world.spawn((
        EntityKind::Player,
        Transform::at(position),
        Physics::new(1.0, PLAYER_RADIUS, PLAYER_MAX_SPEED),
        Health::full(PLAYER_MAX_HEALTH),
        Faction::of(FactionTag::Player),
    ))
}

/// Place a planet or vortex at a random point clear of the arena center.
pub fn spawn_hazard(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    bounds: &ArenaBounds,
    kind: HazardKind,
    core_radius: f64,
) -> Entity {
    let (influence_factor, strength, tag) = match kind {
        HazardKind::Planet => (PLANET_INFLUENCE_FACTOR, core_radius * 2.0, EntityKind::Planet),
        HazardKind::Vortex => (VORTEX_INFLUENCE_FACTOR, core_radius * 8.0, EntityKind::Catastrophe),
    };
    let influence_radius = core_radius * influence_factor;
    let center = bounds.center();
    let inset = core_radius.min(bounds.width.min(bounds.height) * 0.5);

    let mut position = center;
    for _ in 0..HAZARD_PLACEMENT_ATTEMPTS {
        position = DVec2::new(
            rng.gen_range(inset..=bounds.width - inset),
            rng.gen_range(inset..=bounds.height - inset),
        );
        if position.distance(center) > influence_radius + HAZARD_CENTER_CLEARANCE {
            break;
        }
    }

    world.spawn((
        tag,
        Transform::at(position),
        GravityWell {
            kind,
            strength,
            influence_radius,
            core_radius,
        },
    ))
}

/// Spawn a faction enemy scaled by `strength`.
///
/// Returns `None` for factions without a profile.
pub fn spawn_enemy(
    world: &mut World,
    faction: FactionTag,
    position: DVec2,
    velocity: DVec2,
    strength: f64,
) -> Option<Entity> {
    let Some(profile) = get_profile(faction) else {
        warn!("no profile for faction {}; enemy not spawned", faction.name());
        return None;
    };

    let mut physics = Physics::new(profile.mass, profile.radius, profile.max_speed);
    physics.velocity = velocity;

    let entity = world.spawn((
        EntityKind::Enemy,
        Transform::at(position),
        physics,
        Ai::new(faction),
        Weapon::new(
            profile.damage * strength,
            profile.fire_interval_ms,
            ENEMY_PROJECTILE_SPEED,
        ),
        Health::full(profile.health * strength),
        Faction::of(faction),
        Visibility::default(),
        Strength(strength),
    ));
    Some(entity)
}

/// Spawn a projectile traveling at `angle` from `origin`.
pub fn spawn_projectile(
    world: &mut World,
    owner: Option<EntityId>,
    origin: DVec2,
    angle: f64,
    speed: f64,
    damage: f64,
) -> Entity {
    let mut physics = Physics::new(0.1, PROJECTILE_RADIUS, speed);
    physics.velocity = DVec2::from_angle(angle) * speed;
    physics.damping = 1.0;

    world.spawn((
        EntityKind::Projectile,
        Transform {
            position: origin,
            rotation: angle,
            scale: 1.0,
        },
        physics,
        Projectile {
            owner,
            damage,
            lifetime_ms: ENEMY_PROJECTILE_LIFETIME_MS,
        },
    ))
}

/// Spawn an enemy with an arbitrary `Ai` faction tag and no profile.
#[cfg(test)]
pub fn spawn_raw_enemy(world: &mut World, faction: FactionTag, position: DVec2) -> Entity {
    world.spawn((
        EntityKind::Enemy,
        Transform::at(position),
        Physics::new(1.0, 10.0, 100.0),
        Ai::new(faction),
        Faction::of(faction),
        Visibility::default(),
    ))
}
