//! Separation, alignment and cohesion.

use nebula_core::types::{DVec2, EntityId};

/// A nearby flock member as seen at the start of the group update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: EntityId,
    pub position: DVec2,
    pub velocity: DVec2,
}

#[derive(Debug, Clone, Copy)]
pub struct Flocking {
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
}

impl Default for Flocking {
    fn default() -> Self {
        Self {
            separation_radius: 40.0,
            alignment_radius: 80.0,
            cohesion_radius: 120.0,
            separation_weight: 160.0,
            alignment_weight: 0.4,
            cohesion_weight: 0.05,
        }
    }
}

impl Flocking {
    /// Combined flocking acceleration for one member, in a single pass over
    /// `neighbors`. Entries with the member's own id are ignored.
    pub fn steer(&self, id: EntityId, position: DVec2, velocity: DVec2, neighbors: &[Neighbor]) -> DVec2 {
        let mut separation = DVec2::ZERO;
        let mut velocity_sum = DVec2::ZERO;
        let mut aligned = 0u32;
        let mut position_sum = DVec2::ZERO;
        let mut cohesive = 0u32;

        for other in neighbors {
            if other.id == id {
                continue;
            }
            let offset = position - other.position;
            let distance = offset.length();

            if distance < self.separation_radius {
                let away = if distance > 1e-9 { offset / distance } else { DVec2::X };
                // Inverse with distance, capped so coincident members stay finite.
                separation += away * (self.separation_radius / distance.max(1.0));
            }
            if distance < self.alignment_radius {
                velocity_sum += other.velocity;
                aligned += 1;
            }
            if distance < self.cohesion_radius {
                position_sum += other.position;
                cohesive += 1;
            }
        }

        let mut force = separation * self.separation_weight;
        if aligned > 0 {
            let mean_velocity = velocity_sum / aligned as f64;
            force += (mean_velocity - velocity) * self.alignment_weight;
        }
        if cohesive > 0 {
            let center = position_sum / cohesive as f64;
            force += (center - position) * self.cohesion_weight;
        }
        force
    }
}
