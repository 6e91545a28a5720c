//! Per-tick faction dispatch.

use std::collections::HashSet;

use log::warn;

use nebula_core::enums::FactionTag;
use nebula_core::types::EntityId;

use crate::agent::{Agent, AiContext};
use crate::behaviors::{FactionBehavior, PhantomBehavior, SentinelBehavior, SwarmBehavior, TitanBehavior};

/// Groups agents by faction and runs each faction's behavior once per tick.
#[derive(Default)]
pub struct AiCoordinator {
    swarm: SwarmBehavior,
    sentinel: SentinelBehavior,
    phantom: PhantomBehavior,
    titan: TitanBehavior,
    /// Entities already reported for an unrecognized faction.
    warned: HashSet<EntityId>,
}

impl AiCoordinator {
    pub fn new(
        swarm: SwarmBehavior,
        sentinel: SentinelBehavior,
        phantom: PhantomBehavior,
        titan: TitanBehavior,
    ) -> Self {
        Self {
            swarm,
            sentinel,
            phantom,
            titan,
            warned: HashSet::new(),
        }
    }

    pub fn behavior_for(&mut self, faction: FactionTag) -> Option<&mut dyn FactionBehavior> {
        match faction {
            FactionTag::Swarm => Some(&mut self.swarm),
            FactionTag::Sentinel => Some(&mut self.sentinel),
            FactionTag::Phantom => Some(&mut self.phantom),
            FactionTag::Titan => Some(&mut self.titan),
            FactionTag::Neutral | FactionTag::Player | FactionTag::Unknown => None,
        }
    }

    /// Run one tick over `agents` and hand them back.
    ///
    /// Agents without a behavior come back untouched. Output order is not
    /// the input order; callers write back by id.
    pub fn update(&mut self, agents: Vec<Agent>, dt_ms: f64, ctx: &mut AiContext<'_>) -> Vec<Agent> {
        let mut groups: [Vec<Agent>; 4] = Default::default();
        let mut inert = Vec::new();

        for agent in agents {
            let slot = match agent.ai.faction {
                FactionTag::Swarm => 0,
                FactionTag::Sentinel => 1,
                FactionTag::Phantom => 2,
                FactionTag::Titan => 3,
                FactionTag::Neutral | FactionTag::Player => {
                    inert.push(agent);
                    continue;
                }
                FactionTag::Unknown => {
                    if self.warned.insert(agent.id) {
                        warn!("entity {:?} has an unrecognized faction; it will stay inert", agent.id);
                    }
                    inert.push(agent);
                    continue;
                }
            };
            groups[slot].push(agent);
        }

        for (faction, group) in FactionTag::HOSTILE.into_iter().zip(groups.iter_mut()) {
            if group.is_empty() {
                continue;
            }
            if let Some(behavior) = self.behavior_for(faction) {
                behavior.update_group(group, dt_ms, ctx);
            }
        }

        let mut out = inert;
        for group in groups {
            out.extend(group);
        }
        out
    }

    /// Drop bookkeeping for entities that no longer exist.
    pub fn forget(&mut self, id: EntityId) {
        self.warned.remove(&id);
    }

    pub fn warned_count(&self) -> usize {
        self.warned.len()
    }
}
