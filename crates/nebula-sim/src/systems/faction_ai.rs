//! Faction AI system: runs the coordinator over every AI-controlled entity.
//!
//! Entities are copied into `Agent`s, updated by their faction behavior
//! against a read-only view of the world, then written back.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use nebula_core::components::*;
use nebula_core::enums::{EntityKind, FactionTag};
use nebula_core::events::GameEvent;
use nebula_core::types::{DVec2, EntityId};
use nebula_faction_ai::{Agent, AiContext, AiCoordinator, SpatialQuery};

use crate::ids::{entity_id, hecs_entity};

/// [`SpatialQuery`] over a hecs world.
pub struct WorldQuery<'w> {
    world: &'w World,
    player: Option<Entity>,
}

impl<'w> WorldQuery<'w> {
    pub fn new(world: &'w World, player: Option<Entity>) -> Self {
        Self { world, player }
    }

    fn component<T: Copy + Send + Sync + 'static>(&self, id: EntityId) -> Option<T> {
        let entity = hecs_entity(id)?;
        self.world.get::<&T>(entity).ok().map(|c| *c)
    }
}

impl SpatialQuery for WorldQuery<'_> {
    fn player(&self) -> Option<EntityId> {
        self.player
            .filter(|&player| self.world.contains(player))
            .map(entity_id)
    }

    fn alliance(&self, id: EntityId) -> Option<Faction> {
        let entity = hecs_entity(id)?;
        self.world.get::<&Faction>(entity).ok().map(|f| (*f).clone())
    }

    fn transform(&self, id: EntityId) -> Option<Transform> {
        self.component::<Transform>(id)
    }

    fn physics(&self, id: EntityId) -> Option<Physics> {
        self.component::<Physics>(id)
    }

    fn faction(&self, id: EntityId) -> Option<FactionTag> {
        let entity = hecs_entity(id)?;
        self.world.get::<&Faction>(entity).ok().map(|f| f.name)
    }

    fn visibility(&self, id: EntityId) -> Option<Visibility> {
        self.component::<Visibility>(id)
    }

    fn gravity_well(&self, id: EntityId) -> Option<GravityWell> {
        self.component::<GravityWell>(id)
    }

    fn projectile(&self, id: EntityId) -> Option<Projectile> {
        self.component::<Projectile>(id)
    }

    fn entities_within(&self, center: DVec2, radius: f64, kind: EntityKind) -> Vec<EntityId> {
        let radius_sq = radius * radius;
        let mut query = self.world.query::<(&EntityKind, &Transform)>();
        query
            .iter()
            .filter(|(_, (k, t))| **k == kind && t.position.distance_squared(center) <= radius_sq)
            .map(|(entity, _)| entity_id(entity))
            .collect()
    }
}

/// Run one AI tick and write the results back into the world.
pub fn run(
    world: &mut World,
    player: Option<Entity>,
    coordinator: &mut AiCoordinator,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    dt_ms: f64,
    elapsed_ms: f64,
) {
    let agents: Vec<Agent> = {
        let mut query = world.query::<(
            &Transform,
            &Physics,
            &Ai,
            Option<&Weapon>,
            Option<&Health>,
            Option<&Visibility>,
        )>();
        query
            .iter()
            .map(|(entity, (transform, physics, ai, weapon, health, visibility))| Agent {
                id: entity_id(entity),
                transform: *transform,
                physics: *physics,
                ai: ai.clone(),
                weapon: weapon.copied(),
                health: health.copied(),
                visibility: visibility.copied().unwrap_or_default(),
                force: DVec2::ZERO,
            })
            .collect()
    };
    if agents.is_empty() {
        return;
    }

    let updated = {
        let query = WorldQuery::new(world, player);
        let mut ctx = AiContext {
            query: &query,
            events,
            rng,
            elapsed_ms,
        };
        coordinator.update(agents, dt_ms, &mut ctx)
    };

    // Apply updates
    for agent in updated {
        let Some(entity) = hecs_entity(agent.id) else {
            continue;
        };
        if let Ok(mut ai) = world.get::<&mut Ai>(entity) {
            *ai = agent.ai;
        }
        if let Ok(mut physics) = world.get::<&mut Physics>(entity) {
            physics.max_speed = agent.physics.max_speed;
            physics.apply_force(agent.force);
        }
        if let (Some(weapon), Ok(mut current)) = (agent.weapon, world.get::<&mut Weapon>(entity)) {
            *current = weapon;
        }
        if let Ok(mut visibility) = world.get::<&mut Visibility>(entity) {
            *visibility = agent.visibility;
        }
    }
}
