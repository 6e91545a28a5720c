//! Ring and line formation offsets.

use std::collections::HashMap;
use std::f64::consts::TAU;

use nebula_core::constants::{FORMATION_BASE_RADIUS, FORMATION_LINE_SPACING, FORMATION_RADIUS_PER_MEMBER};
use nebula_core::enums::FormationKind;
use nebula_core::types::{DVec2, EntityId};

/// Offset of each member relative to the formation anchor.
///
/// `Circle` spaces members evenly on a ring whose radius grows with the
/// member count. `Line` spaces them along x, centered on zero.
pub fn assign_formation_positions(members: &[EntityId], kind: FormationKind) -> HashMap<EntityId, DVec2> {
    let n = members.len();
    let mut offsets = HashMap::with_capacity(n);
    if n == 0 {
        return offsets;
    }

    match kind {
        FormationKind::Circle => {
            let radius = FORMATION_BASE_RADIUS + FORMATION_RADIUS_PER_MEMBER * n as f64;
            for (i, id) in members.iter().enumerate() {
                let angle = TAU * i as f64 / n as f64;
                offsets.insert(*id, DVec2::from_angle(angle) * radius);
            }
        }
        FormationKind::Line => {
            let middle = (n as f64 - 1.0) * 0.5;
            for (i, id) in members.iter().enumerate() {
                offsets.insert(*id, DVec2::new((i as f64 - middle) * FORMATION_LINE_SPACING, 0.0));
            }
        }
    }
    offsets
}
