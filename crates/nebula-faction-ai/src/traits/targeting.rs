//! Nearest-hostile search with priority ordering.

use nebula_core::constants::{DEFAULT_TARGET_RANGE, PLAYER_TARGET_PRIORITY, RIVAL_TARGET_PRIORITY};
use nebula_core::enums::{EntityKind, FactionTag};
use nebula_core::types::{DVec2, EntityId};

use crate::agent::SpatialQuery;

/// A potential target, ranked by priority then distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub id: EntityId,
    pub position: DVec2,
    pub distance: f64,
    pub kind: EntityKind,
    pub priority: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Targeting {
    pub max_range: f64,
}

impl Default for Targeting {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_TARGET_RANGE,
        }
    }
}

impl Targeting {
    pub fn new(max_range: f64) -> Self {
        Self { max_range }
    }

    /// All targets within range: the player and enemies of other factions.
    ///
    /// Sorted by priority descending, then distance ascending. Own faction,
    /// factions the searcher is allied with, the searcher itself and
    /// untargetable entities are excluded.
    pub fn find_targets(
        &self,
        query: &dyn SpatialQuery,
        entity: EntityId,
        position: DVec2,
        faction: FactionTag,
        max_range: Option<f64>,
    ) -> Vec<TargetCandidate> {
        let range = max_range.unwrap_or(self.max_range);
        let alliance = query.alliance(entity);
        let allied = |other: FactionTag| {
            other == faction || alliance.as_ref().is_some_and(|a| a.is_allied_with(other))
        };
        let mut candidates = Vec::new();

        if let Some(player) = query.player().filter(|_| !allied(FactionTag::Player)) {
            if let Some(transform) = query.transform(player) {
                let distance = query.distance(position, transform.position);
                if distance <= range {
                    candidates.push(TargetCandidate {
                        id: player,
                        position: transform.position,
                        distance,
                        kind: EntityKind::Player,
                        priority: PLAYER_TARGET_PRIORITY,
                    });
                }
            }
        }

        for id in query.entities_within(position, range, EntityKind::Enemy) {
            if id == entity {
                continue;
            }
            match query.faction(id) {
                Some(other) if !allied(other) => {}
                _ => continue,
            }
            if query.visibility(id).is_some_and(|v| !v.targetable) {
                continue;
            }
            let Some(transform) = query.transform(id) else {
                continue;
            };
            let distance = query.distance(position, transform.position);
            if distance > range {
                continue;
            }
            candidates.push(TargetCandidate {
                id,
                position: transform.position,
                distance,
                kind: EntityKind::Enemy,
                priority: RIVAL_TARGET_PRIORITY,
            });
        }

        candidates.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(a.distance.total_cmp(&b.distance))
        });
        candidates
    }

    /// Head of [`Targeting::find_targets`].
    pub fn nearest_target(
        &self,
        query: &dyn SpatialQuery,
        entity: EntityId,
        position: DVec2,
        faction: FactionTag,
        max_range: Option<f64>,
    ) -> Option<TargetCandidate> {
        self.find_targets(query, entity, position, faction, max_range)
            .into_iter()
            .next()
    }
}
