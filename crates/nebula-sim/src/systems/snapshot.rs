//! Snapshot system: queries the ECS world and builds an `ArenaSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use nebula_core::components::*;
use nebula_core::enums::{EntityKind, GamePhase};
use nebula_core::events::GameEvent;
use nebula_core::state::{ArenaSnapshot, EnemyView, WaveView};
use nebula_core::types::SimTime;

use crate::ids::entity_id;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    wave: WaveView,
    events: Vec<GameEvent>,
) -> ArenaSnapshot {
    ArenaSnapshot {
        time: *time,
        phase,
        wave,
        enemies: build_enemies(world),
        projectile_count: world.query::<&Projectile>().iter().count() as u32,
        events,
    }
}

/// Every AI-controlled enemy, ordered by entity id.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(
            &EntityKind,
            &Ai,
            &Transform,
            &Physics,
            Option<&Health>,
            Option<&Visibility>,
        )>()
        .iter()
        .filter(|(_, (kind, ..))| **kind == EntityKind::Enemy)
        .map(|(entity, (_, ai, transform, physics, health, visibility))| EnemyView {
            entity: entity_id(entity),
            faction: ai.faction,
            state: ai.state,
            position: transform.position,
            velocity: physics.velocity,
            alpha: visibility.map_or(1.0, |v| v.alpha),
            health: health.map_or(0.0, |h| h.current),
        })
        .collect();

    enemies.sort_by_key(|e| e.entity);
    enemies
}
