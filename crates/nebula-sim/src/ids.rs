//! Mapping between hecs entities and the AI core's opaque ids.

use hecs::Entity;

use nebula_core::types::EntityId;

pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// `None` for ids that were never produced by [`entity_id`].
pub fn hecs_entity(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}
