//! Gravity hazard detection and repulsion.
//!
//! A cheap heuristic for "stay out of anything that will crush or swallow
//! you". It is not gravitational integration: the result is a unit-less
//! repulsion vector that behaviors scale by their own responsiveness.

use nebula_core::constants::*;
use nebula_core::enums::{EntityKind, HazardKind};
use nebula_core::types::{DVec2, EntityId};

use crate::agent::SpatialQuery;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityHazard {
    pub id: EntityId,
    pub kind: HazardKind,
    pub position: DVec2,
    pub strength: f64,
    /// Outer radius where avoidance starts ramping up.
    pub gravity_radius: f64,
    /// Inner radius where the panic magnitude applies.
    pub danger_radius: f64,
}

/// Planets and vortices within `HAZARD_DETECTION_FACTOR` of their influence
/// radius from `position`.
pub fn detect_gravity_sources(query: &dyn SpatialQuery, position: DVec2) -> Vec<GravityHazard> {
    let mut hazards = Vec::new();
    for kind in [EntityKind::Planet, EntityKind::Catastrophe] {
        for id in query.entities_within(position, HAZARD_SCAN_RADIUS, kind) {
            let (Some(well), Some(transform)) = (query.gravity_well(id), query.transform(id)) else {
                continue;
            };
            let distance = query.distance(position, transform.position);
            if distance > well.influence_radius * HAZARD_DETECTION_FACTOR {
                continue;
            }
            let margin = match well.kind {
                HazardKind::Planet => PLANET_DANGER_MARGIN,
                HazardKind::Vortex => VORTEX_DANGER_MARGIN,
            };
            hazards.push(GravityHazard {
                id,
                kind: well.kind,
                position: transform.position,
                strength: well.strength,
                gravity_radius: well.influence_radius,
                danger_radius: well.core_radius + margin,
            });
        }
    }
    hazards
}

/// Piecewise avoidance magnitude at `distance` from a hazard's center.
///
/// Zero at or beyond the gravity radius, the panic constant at or inside the
/// danger radius, and a ramp in between: linear for planets, exponential
/// for vortices. Both ramps are continuous at the gravity radius.
pub fn avoidance_magnitude(hazard: &GravityHazard, distance: f64) -> f64 {
    if distance >= hazard.gravity_radius {
        return 0.0;
    }
    let (ramp_peak, panic) = match hazard.kind {
        HazardKind::Planet => (PLANET_AVOID_FORCE, PLANET_PANIC_FORCE),
        HazardKind::Vortex => (VORTEX_AVOID_FORCE, VORTEX_PANIC_FORCE),
    };
    if distance <= hazard.danger_radius {
        return panic;
    }
    let band = hazard.gravity_radius - hazard.danger_radius;
    if band <= 0.0 {
        return panic;
    }
    // 0 at the danger edge, 1 at the gravity edge.
    let s = (distance - hazard.danger_radius) / band;
    match hazard.kind {
        HazardKind::Planet => ramp_peak * (1.0 - s),
        HazardKind::Vortex => {
            let k = VORTEX_FALLOFF;
            ramp_peak * ((-k * s).exp() - (-k).exp()) / (1.0 - (-k).exp())
        }
    }
}

/// Sum of per-hazard repulsion, each pointing from the hazard to `position`.
pub fn calculate_avoidance(position: DVec2, hazards: &[GravityHazard]) -> DVec2 {
    hazards.iter().fold(DVec2::ZERO, |acc, hazard| {
        let offset = position - hazard.position;
        let distance = offset.length();
        let magnitude = avoidance_magnitude(hazard, distance);
        if magnitude <= 0.0 {
            return acc;
        }
        let direction = if distance > 1e-9 {
            offset / distance
        } else {
            DVec2::X
        };
        acc + direction * magnitude
    })
}

/// Whether any vortex has `position` inside `factor` × its danger radius.
pub fn vortex_emergency(position: DVec2, hazards: &[GravityHazard], factor: f64) -> bool {
    hazards.iter().any(|h| {
        h.kind == HazardKind::Vortex && position.distance(h.position) <= h.danger_radius * factor
    })
}
