//! Weapon system: weapon cooldowns and projectile lifetimes.

use hecs::World;

use nebula_core::components::{Projectile, Weapon};

/// Count down every weapon cooldown and projectile lifetime by `dt_ms`.
pub fn run(world: &mut World, dt_ms: f64) {
    for (_entity, weapon) in world.query_mut::<&mut Weapon>() {
        weapon.cooldown_ms = (weapon.cooldown_ms - dt_ms).max(0.0);
    }
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        projectile.lifetime_ms -= dt_ms;
    }
}
