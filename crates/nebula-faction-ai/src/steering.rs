//! Steering primitives shared by the faction behaviors.
//!
//! All functions return an acceleration, already clamped to `max_accel`.

use nebula_core::types::{heading_of, wrap_angle, DVec2};

/// Accelerate toward `target` at full speed.
pub fn seek(position: DVec2, velocity: DVec2, target: DVec2, max_speed: f64, max_accel: f64) -> DVec2 {
    let desired = (target - position).normalize_or_zero() * max_speed;
    (desired - velocity).clamp_length_max(max_accel)
}

/// Accelerate directly away from `threat`.
pub fn flee(position: DVec2, velocity: DVec2, threat: DVec2, max_speed: f64, max_accel: f64) -> DVec2 {
    let desired = (position - threat).normalize_or_zero() * max_speed;
    (desired - velocity).clamp_length_max(max_accel)
}

/// Seek that slows down linearly inside `slow_radius`.
pub fn arrive(
    position: DVec2,
    velocity: DVec2,
    target: DVec2,
    max_speed: f64,
    max_accel: f64,
    slow_radius: f64,
) -> DVec2 {
    let offset = target - position;
    let distance = offset.length();
    if distance < 1e-6 {
        return (-velocity).clamp_length_max(max_accel);
    }
    let speed = if slow_radius > 0.0 && distance < slow_radius {
        max_speed * distance / slow_radius
    } else {
        max_speed
    };
    let desired = offset / distance * speed;
    (desired - velocity).clamp_length_max(max_accel)
}

/// Bleed off velocity.
pub fn brake(velocity: DVec2, strength: f64, max_accel: f64) -> DVec2 {
    (-velocity * strength).clamp_length_max(max_accel)
}

/// Rotate unit direction `current` toward `desired` by `fraction` of the
/// signed angle between them.
pub fn rotate_toward(current: DVec2, desired: DVec2, fraction: f64) -> DVec2 {
    if desired.length_squared() < 1e-12 {
        return current;
    }
    let current_angle = heading_of(current);
    let delta = wrap_angle(heading_of(desired) - current_angle);
    DVec2::from_angle(current_angle + delta * fraction)
}
