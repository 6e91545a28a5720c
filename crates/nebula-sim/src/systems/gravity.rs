//! Gravity system: wells pull on ships inside their influence radius.

use hecs::World;

use nebula_core::components::{GravityWell, Physics, Transform};
use nebula_core::enums::EntityKind;

/// Pull strength grows linearly from zero at the influence edge to
/// `strength` at the center.
pub fn run(world: &mut World) {
    let wells: Vec<(Transform, GravityWell)> = world
        .query::<(&Transform, &GravityWell)>()
        .iter()
        .map(|(_, (t, w))| (*t, *w))
        .collect();
    if wells.is_empty() {
        return;
    }

    for (_entity, (kind, transform, physics)) in
        world.query_mut::<(&EntityKind, &Transform, &mut Physics)>()
    {
        if !matches!(kind, EntityKind::Player | EntityKind::Enemy) {
            continue;
        }
        for (well_transform, well) in &wells {
            let offset = well_transform.position - transform.position;
            let distance = offset.length();
            if distance >= well.influence_radius || distance <= f64::EPSILON {
                continue;
            }
            let falloff = 1.0 - distance / well.influence_radius;
            physics.acceleration += offset / distance * well.strength * falloff;
        }
    }
}
