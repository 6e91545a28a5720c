//! Movement system: integrates acceleration into velocity and position.

use hecs::World;

use nebula_core::components::{Physics, Transform};
use nebula_core::types::{heading_of, DVec2};

/// Semi-implicit Euler step over every entity with physics.
///
/// Velocity keeps `damping^dt` of itself per step and is clamped to
/// `max_speed`; the accumulated acceleration is cleared afterwards.
pub fn run(world: &mut World, dt_ms: f64) {
    let dt_secs = dt_ms / 1000.0;
    for (_entity, (transform, physics)) in world.query_mut::<(&mut Transform, &mut Physics)>() {
        physics.velocity += physics.acceleration * dt_secs;
        physics.velocity *= physics.damping.clamp(0.0, 1.0).powf(dt_secs);
        if physics.max_speed > 0.0 {
            physics.velocity = physics.velocity.clamp_length_max(physics.max_speed);
        }
        physics.acceleration = DVec2::ZERO;

        transform.position += physics.velocity * dt_secs;
        if physics.velocity.length_squared() > 1e-6 {
            transform.rotation = heading_of(physics.velocity);
        }
    }
}
