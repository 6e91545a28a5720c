//! Lead-prediction aiming and fire requests.

use nebula_core::components::Weapon;
use nebula_core::constants::ENEMY_PROJECTILE_SPEED;
use nebula_core::events::{EventSink, GameEvent};
use nebula_core::types::{heading_of, DVec2};

use crate::agent::Agent;

#[derive(Debug, Clone, Copy)]
pub struct Shooting {
    /// Maximum distance at which a shot is attempted.
    pub range: f64,
}

impl Shooting {
    pub fn new(range: f64) -> Self {
        Self { range }
    }

    /// A shot is allowed only with a weapon, within range, and once the
    /// cooldown has run out.
    pub fn can_shoot(&self, weapon: Option<&Weapon>, distance: f64) -> bool {
        let Some(weapon) = weapon else {
            return false;
        };
        distance <= self.range && weapon.cooldown_ms <= 0.0
    }

    /// Firing angle toward where the target will be when the shot arrives,
    /// assuming it keeps its current velocity.
    pub fn lead_angle(
        shooter: DVec2,
        target: DVec2,
        target_velocity: Option<DVec2>,
        projectile_speed: f64,
    ) -> f64 {
        let aim_point = match target_velocity {
            Some(velocity) if projectile_speed > 0.0 => {
                let travel_time = shooter.distance(target) / projectile_speed;
                target + velocity * travel_time
            }
            _ => target,
        };
        heading_of(aim_point - shooter)
    }

    /// Emit a fire request at the lead angle and restart the cooldown.
    ///
    /// Returns the angle, or `None` when the agent has no weapon.
    pub fn aim_and_shoot(
        &self,
        agent: &mut Agent,
        target_position: DVec2,
        target_velocity: Option<DVec2>,
        events: &mut dyn EventSink,
    ) -> Option<f64> {
        let shooter = agent.position();
        let weapon = agent.weapon.as_mut()?;
        let speed = if weapon.projectile_speed > 0.0 {
            weapon.projectile_speed
        } else {
            ENEMY_PROJECTILE_SPEED
        };
        let angle = Self::lead_angle(shooter, target_position, target_velocity, speed);
        weapon.cooldown_ms = weapon.fire_interval_ms;
        events.emit(GameEvent::EnemyShootRequest {
            shooter: agent.id,
            angle,
        });
        Some(angle)
    }
}
