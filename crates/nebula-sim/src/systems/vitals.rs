//! Vitals system: health regeneration and invulnerability windows.

use hecs::World;

use nebula_core::components::Health;

pub fn run(world: &mut World, dt_ms: f64) {
    let dt_secs = dt_ms / 1000.0;
    for (_entity, health) in world.query_mut::<&mut Health>() {
        if health.invulnerable_ms > 0.0 {
            health.invulnerable_ms = (health.invulnerable_ms - dt_ms).max(0.0);
        }
        if health.regen_rate > 0.0 && health.current > 0.0 {
            health.current = (health.current + health.regen_rate * dt_secs).min(health.max);
        }
    }
}
