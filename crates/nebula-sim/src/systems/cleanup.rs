//! Cleanup system: removes spent projectiles and keeps ships in the arena.

use hecs::{Entity, World};

use nebula_core::components::{Physics, Projectile, Transform};
use nebula_core::constants::OOB_MARGIN;
use nebula_core::enums::EntityKind;
use nebula_core::types::{ArenaBounds, EntityId};

use crate::ids::entity_id;

/// Despawn expired or out-of-bounds projectiles and pull stray ships back
/// inside the arena. Returns the ids of despawned entities.
///
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, bounds: &ArenaBounds, despawn_buffer: &mut Vec<Entity>) -> Vec<EntityId> {
    despawn_buffer.clear();

    for (entity, (transform, projectile)) in world.query_mut::<(&Transform, &Projectile)>() {
        if projectile.lifetime_ms <= 0.0 || !bounds.contains(transform.position, OOB_MARGIN) {
            despawn_buffer.push(entity);
        }
    }

    // Ships are never despawned here; the wave relies on kills to finish.
    for (_entity, (kind, transform, physics)) in
        world.query_mut::<(&EntityKind, &mut Transform, &mut Physics)>()
    {
        if !matches!(kind, EntityKind::Player | EntityKind::Enemy) {
            continue;
        }
        let clamped = bounds.clamp(transform.position, 0.0);
        if clamped != transform.position {
            if clamped.x != transform.position.x {
                physics.velocity.x = 0.0;
            }
            if clamped.y != transform.position.y {
                physics.velocity.y = 0.0;
            }
            transform.position = clamped;
        }
    }

    let despawned = despawn_buffer.iter().copied().map(entity_id).collect();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    despawned
}
