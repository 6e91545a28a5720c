//! The boundary between faction behaviors and the host world.
//!
//! Behaviors read the world through [`SpatialQuery`], emit requests through
//! an [`EventSink`], and mutate only [`Agent`] working copies that the host
//! writes back after the tick.

use rand::RngCore;

use nebula_core::components::*;
use nebula_core::enums::{EntityKind, FactionTag};
use nebula_core::events::EventSink;
use nebula_core::types::{DVec2, EntityId};

/// Read-only view of the host world.
///
/// Every lookup returns `None` for entities that no longer exist or lack the
/// component; callers treat that as "skip".
pub trait SpatialQuery {
    fn player(&self) -> Option<EntityId>;
    /// Faction component, alliances included.
    fn alliance(&self, id: EntityId) -> Option<Faction>;
    fn transform(&self, id: EntityId) -> Option<Transform>;
    fn physics(&self, id: EntityId) -> Option<Physics>;
    fn faction(&self, id: EntityId) -> Option<FactionTag>;
    fn visibility(&self, id: EntityId) -> Option<Visibility>;
    fn gravity_well(&self, id: EntityId) -> Option<GravityWell>;
    fn projectile(&self, id: EntityId) -> Option<Projectile>;

    /// Entities of `kind` whose position lies within `radius` of `center`.
    fn entities_within(&self, center: DVec2, radius: f64, kind: EntityKind) -> Vec<EntityId>;

    fn distance(&self, a: DVec2, b: DVec2) -> f64 {
        a.distance(b)
    }
}

/// Collaborators handed to a behavior for one group update.
pub struct AiContext<'a> {
    pub query: &'a dyn SpatialQuery,
    pub events: &'a mut dyn EventSink,
    pub rng: &'a mut dyn RngCore,
    /// Simulation clock, used for time-varying steering such as jitter.
    pub elapsed_ms: f64,
}

/// Working copy of one AI-controlled entity for the duration of a tick.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: EntityId,
    pub transform: Transform,
    pub physics: Physics,
    pub ai: Ai,
    pub weapon: Option<Weapon>,
    pub health: Option<Health>,
    pub visibility: Visibility,
    /// Steering force accumulated this tick.
    pub force: DVec2,
}

impl Agent {
    pub fn new(id: EntityId, transform: Transform, physics: Physics, ai: Ai) -> Self {
        Self {
            id,
            transform,
            physics,
            ai,
            weapon: None,
            health: None,
            visibility: Visibility::default(),
            force: DVec2::ZERO,
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = Some(health);
        self
    }

    pub fn position(&self) -> DVec2 {
        self.transform.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.physics.velocity
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.force += force;
    }

    /// Apply a steering acceleration, scaled by this agent's mass.
    pub fn accelerate(&mut self, acceleration: DVec2) {
        self.force += acceleration * self.physics.mass;
    }

    /// Current health as a fraction of max; full when no health component.
    pub fn health_fraction(&self) -> f64 {
        match self.health {
            Some(h) if h.max > 0.0 => (h.current / h.max).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }
}
