//! Per-faction controllers.
//!
//! Each behavior runs a memory-backed state machine per entity. Target
//! search and state transitions happen when the entity's decision timer
//! runs out; steering force is applied every tick from the last decision.

pub mod phantom;
pub mod sentinel;
pub mod swarm;
pub mod titan;

pub use phantom::{PhantomBehavior, PhantomTuning};
pub use sentinel::{SentinelBehavior, SentinelTuning};
pub use swarm::{SwarmBehavior, SwarmTuning};
pub use titan::{TitanBehavior, TitanTuning};

use nebula_core::constants::AVOIDANCE_FORCE_SCALE;
use nebula_core::enums::FactionTag;
use nebula_core::types::{DVec2, EntityId};

use crate::agent::{Agent, AiContext, SpatialQuery};
use crate::traits::gravity::{calculate_avoidance, GravityHazard};

/// Shared interface of the four faction controllers.
pub trait FactionBehavior {
    fn faction(&self) -> FactionTag;

    /// Advance every agent of this faction by one tick.
    fn update_group(&mut self, agents: &mut [Agent], dt_ms: f64, ctx: &mut AiContext<'_>);
}

/// Count down the decision timer. Returns true (and rearms the timer) when a
/// decision pass is due.
pub(crate) fn decision_due(agent: &mut Agent, dt_ms: f64, interval_ms: f64) -> bool {
    agent.ai.decision_timer_ms -= dt_ms;
    if agent.ai.decision_timer_ms <= 0.0 {
        agent.ai.decision_timer_ms = interval_ms;
        true
    } else {
        false
    }
}

/// Current position of a remembered target, `None` once it is gone.
pub(crate) fn track(query: &dyn SpatialQuery, target: Option<EntityId>) -> Option<DVec2> {
    target
        .and_then(|id| query.transform(id))
        .map(|transform| transform.position)
}

/// Gravity avoidance as a steering acceleration.
pub(crate) fn avoidance_accel(position: DVec2, hazards: &[GravityHazard], responsiveness: f64) -> DVec2 {
    calculate_avoidance(position, hazards) * AVOIDANCE_FORCE_SCALE * responsiveness
}
