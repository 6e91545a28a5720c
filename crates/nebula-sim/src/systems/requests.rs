//! Request system: honors the spawn, fire and shockwave requests emitted
//! earlier in the tick.

use hecs::World;
use log::debug;

use nebula_core::components::{Physics, Transform, Weapon};
use nebula_core::constants::PROJECTILE_RADIUS;
use nebula_core::enums::EntityKind;
use nebula_core::events::GameEvent;
use nebula_core::types::{DVec2, EntityId};

use crate::ids::{entity_id, hecs_entity};
use crate::world_setup;

/// Process every request currently in `events`, appending the resulting
/// lifecycle events.
pub fn run(world: &mut World, events: &mut Vec<GameEvent>) {
    let requests: Vec<GameEvent> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                GameEvent::SpawnEnemyRequest { .. }
                    | GameEvent::EnemyShootRequest { .. }
                    | GameEvent::TitanShockwave { .. }
            )
        })
        .cloned()
        .collect();

    for request in requests {
        match request {
            GameEvent::SpawnEnemyRequest {
                faction,
                position,
                velocity,
                strength_multiplier,
            } => {
                if let Some(entity) =
                    world_setup::spawn_enemy(world, faction, position, velocity, strength_multiplier)
                {
                    events.push(GameEvent::EnemySpawned {
                        entity: entity_id(entity),
                        faction,
                        position,
                    });
                }
            }
            GameEvent::EnemyShootRequest { shooter, angle } => fire(world, shooter, angle),
            GameEvent::TitanShockwave {
                source,
                position,
                radius,
                force,
            } => shockwave(world, source, position, radius, force),
            _ => {}
        }
    }
}

/// Launch a projectile from the shooter's hull along `angle`.
fn fire(world: &mut World, shooter: EntityId, angle: f64) {
    let Some(entity) = hecs_entity(shooter) else {
        return;
    };
    let launch = {
        let Ok(transform) = world.get::<&Transform>(entity) else {
            debug!("shooter {shooter:?} is gone; shot dropped");
            return;
        };
        let radius = world.get::<&Physics>(entity).map_or(0.0, |p| p.radius);
        let Ok(weapon) = world.get::<&Weapon>(entity) else {
            return;
        };
        let origin = transform.position + DVec2::from_angle(angle) * (radius + PROJECTILE_RADIUS);
        (origin, weapon.projectile_speed, weapon.damage)
    };

    let (origin, speed, damage) = launch;
    world_setup::spawn_projectile(world, Some(shooter), origin, angle, speed, damage);
}

/// Push every movable ship within `radius` away from `position`, falling off
/// linearly to zero at the edge.
fn shockwave(world: &mut World, source: EntityId, position: DVec2, radius: f64, force: f64) {
    if radius <= 0.0 {
        return;
    }
    for (entity, (kind, transform, physics)) in
        world.query_mut::<(&EntityKind, &Transform, &mut Physics)>()
    {
        if entity_id(entity) == source || !matches!(kind, EntityKind::Player | EntityKind::Enemy) {
            continue;
        }
        let offset = transform.position - position;
        let distance = offset.length();
        if distance >= radius {
            continue;
        }
        let direction = offset.try_normalize().unwrap_or(DVec2::X);
        physics.velocity += direction * force * (1.0 - distance / radius);
    }
}
