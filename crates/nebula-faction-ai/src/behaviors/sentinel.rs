//! Sentinel: grouped patrols that hold a stand-off ring around a target.
//!
//! Sentinels within `group_radius` of each other (transitively) form a
//! group. The first member is the leader and patrols; the rest hold ring
//! offsets around it. An engaged sentinel at close range pulls idle group
//! allies in by writing their state directly, and allies stagger their
//! fire so a group volley does not land in one frame.

use log::debug;

use nebula_core::enums::{AiState, FactionTag, FormationKind};
use nebula_core::memory::{FactionMemory, SentinelMemory};
use nebula_core::types::{DVec2, EntityId};

use super::{avoidance_accel, decision_due, track, FactionBehavior};
use crate::agent::{Agent, AiContext};
use crate::memory::{checkin, checkout, peek_mut};
use crate::profiles::{FactionProfile, SENTINEL_PROFILE};
use crate::steering::arrive;
use crate::traits::{assign_formation_positions, detect_gravity_sources, Shooting, Targeting};

#[derive(Debug, Clone)]
pub struct SentinelTuning {
    /// Link distance for proximity grouping.
    pub group_radius: f64,
    /// Stand-off distance held while orbiting a target.
    pub preferred_distance: f64,
    pub distance_tolerance: f64,
    /// Tangential acceleration while orbiting, as a fraction of max accel.
    pub orbit_strafe: f64,
    /// An engaged sentinel calls for backup when its target is this close.
    pub backup_range: f64,
    pub backup_cooldown_ms: f64,
    pub response_duration_ms: f64,
    pub patrol_radius: f64,
    /// Leader patrol angular speed (rad/s).
    pub patrol_speed: f64,
    /// An ally that fired within this window blocks a shot.
    pub volley_window_ms: f64,
}

impl Default for SentinelTuning {
    fn default() -> Self {
        Self {
            group_radius: 400.0,
            preferred_distance: 320.0,
            distance_tolerance: 60.0,
            orbit_strafe: 0.4,
            backup_range: 350.0,
            backup_cooldown_ms: 3000.0,
            response_duration_ms: 2500.0,
            patrol_radius: 150.0,
            patrol_speed: 0.4,
            volley_window_ms: 250.0,
        }
    }
}

pub struct SentinelBehavior {
    tuning: SentinelTuning,
    profile: FactionProfile,
    targeting: Targeting,
    shooting: Shooting,
}

impl Default for SentinelBehavior {
    fn default() -> Self {
        Self::new(SentinelTuning::default())
    }
}

impl SentinelBehavior {
    pub fn new(tuning: SentinelTuning) -> Self {
        let profile = SENTINEL_PROFILE;
        Self {
            tuning,
            profile,
            targeting: Targeting::new(profile.detection_range),
            shooting: Shooting::new(profile.shoot_range),
        }
    }

    fn enter(agent: &mut Agent) -> SentinelMemory {
        agent.ai.state = AiState::Patrolling;
        SentinelMemory {
            group_id: 0,
            leader: None,
            formation_offset: DVec2::ZERO,
            patrol_center: agent.position(),
            patrol_angle: 0.0,
            target: None,
            target_position: None,
            response_position: None,
            response_timer_ms: 0.0,
            backup_cooldown_ms: 0.0,
        }
    }

    /// Single-link proximity groups, members in discovery order.
    fn form_groups(&self, agents: &[Agent]) -> Vec<Vec<usize>> {
        let n = agents.len();
        let mut assigned = vec![false; n];
        let mut groups = Vec::new();

        for start in 0..n {
            if assigned[start] {
                continue;
            }
            assigned[start] = true;
            let mut members = vec![start];
            let mut cursor = 0;
            while cursor < members.len() {
                let current = agents[members[cursor]].position();
                cursor += 1;
                for other in 0..n {
                    if !assigned[other]
                        && current.distance(agents[other].position()) <= self.tuning.group_radius
                    {
                        assigned[other] = true;
                        members.push(other);
                    }
                }
            }
            groups.push(members);
        }
        groups
    }

    fn assign_groups(agents: &mut [Agent], groups: &[Vec<usize>]) {
        for (group_id, members) in groups.iter().enumerate() {
            let ids: Vec<EntityId> = members.iter().map(|&i| agents[i].id).collect();
            let offsets = assign_formation_positions(&ids, FormationKind::Circle);
            let leader = ids.first().copied();
            for &i in members {
                let id = agents[i].id;
                if let Some(memory) = peek_mut::<SentinelMemory>(&mut agents[i].ai) {
                    memory.group_id = group_id as u32;
                    memory.leader = leader;
                    memory.formation_offset = offsets.get(&id).copied().unwrap_or(DVec2::ZERO);
                }
            }
        }
    }

    fn update_agent(
        &self,
        agents: &mut [Agent],
        index: usize,
        group: &[usize],
        dt_ms: f64,
        ctx: &mut AiContext<'_>,
    ) {
        let leader_position = leader_of(&agents[index])
            .and_then(|id| agents.iter().find(|a| a.id == id))
            .map(|leader| leader.position());
        let ally_fired_recently = group.iter().filter(|&&j| j != index).any(|&j| {
            agents[j].weapon.is_some_and(|w| {
                w.cooldown_ms > w.fire_interval_ms - self.tuning.volley_window_ms
            })
        });

        let agent = &mut agents[index];
        let Some(mut memory) = checkout::<SentinelMemory>(&mut agent.ai) else {
            return;
        };

        memory.response_timer_ms -= dt_ms;
        memory.backup_cooldown_ms -= dt_ms;
        memory.target_position = track(ctx.query, memory.target);

        let mut backup_call = None;
        if decision_due(agent, dt_ms, self.profile.decision_interval_ms) {
            backup_call = self.decide(agent, &mut memory, ctx);
        } else if agent.ai.state == AiState::Responding && memory.response_timer_ms <= 0.0 {
            agent.ai.state = AiState::Patrolling;
            memory.response_position = None;
        }

        if agent.ai.state == AiState::Orbiting && !ally_fired_recently {
            if let Some(target_position) = memory.target_position {
                let distance = agent.position().distance(target_position);
                if self.shooting.can_shoot(agent.weapon.as_ref(), distance) {
                    let velocity = memory
                        .target
                        .and_then(|id| ctx.query.physics(id))
                        .map(|p| p.velocity);
                    self.shooting
                        .aim_and_shoot(agent, target_position, velocity, ctx.events);
                }
            }
        }

        let steering = self.steer(agent, &mut memory, leader_position, dt_ms, ctx);
        agent.accelerate(steering);
        let caller = agent.id;
        checkin(&mut agent.ai, memory);

        if let Some(position) = backup_call {
            self.call_backup(agents, index, group, position);
            debug!("sentinel {:?} called backup to {:?}", caller, position);
        }
    }

    /// Returns the position allies should respond to, if a backup call is due.
    fn decide(&self, agent: &mut Agent, memory: &mut SentinelMemory, ctx: &mut AiContext<'_>) -> Option<DVec2> {
        let position = agent.position();
        match self
            .targeting
            .nearest_target(ctx.query, agent.id, position, FactionTag::Sentinel, None)
        {
            Some(target) => {
                memory.target = Some(target.id);
                memory.target_position = Some(target.position);
                memory.response_position = None;
                agent.ai.state = AiState::Orbiting;
                if target.distance <= self.tuning.backup_range && memory.backup_cooldown_ms <= 0.0 {
                    memory.backup_cooldown_ms = self.tuning.backup_cooldown_ms;
                    return Some(target.position);
                }
            }
            None => {
                memory.target = None;
                memory.target_position = None;
                let responding =
                    agent.ai.state == AiState::Responding && memory.response_timer_ms > 0.0;
                if !responding {
                    agent.ai.state = AiState::Patrolling;
                    memory.response_position = None;
                }
            }
        }
        None
    }

    /// Direct write into allies' working copies. Allies later in the pass see
    /// it this tick, earlier ones on the next.
    fn call_backup(&self, agents: &mut [Agent], caller: usize, group: &[usize], position: DVec2) {
        for &j in group {
            if j == caller || agents[j].ai.state == AiState::Orbiting {
                continue;
            }
            let ally = &mut agents[j];
            ally.ai.state = AiState::Responding;
            if let Some(memory) = peek_mut::<SentinelMemory>(&mut ally.ai) {
                memory.response_position = Some(position);
                memory.response_timer_ms = self.tuning.response_duration_ms;
            }
        }
    }

    fn steer(
        &self,
        agent: &Agent,
        memory: &mut SentinelMemory,
        leader_position: Option<DVec2>,
        dt_ms: f64,
        ctx: &mut AiContext<'_>,
    ) -> DVec2 {
        let position = agent.position();
        let velocity = agent.velocity();
        let max_speed = agent.physics.max_speed;
        let max_accel = self.profile.max_accel;
        let t = &self.tuning;

        let accel = match (agent.ai.state, memory.target_position, memory.response_position) {
            (AiState::Orbiting, Some(target), _) => {
                let offset = position - target;
                let distance = offset.length();
                let radial = if distance > 1e-9 { offset / distance } else { DVec2::X };
                // Positive when too close: push outward.
                let error = t.preferred_distance - distance;
                let correction = (error / t.distance_tolerance).clamp(-1.0, 1.0);
                radial * correction * max_accel + radial.perp() * t.orbit_strafe * max_accel
                    - velocity * 0.5
            }
            (AiState::Responding, _, Some(point)) => {
                let away = (position - point).normalize_or_zero();
                let stand_off = point + away * t.preferred_distance;
                arrive(position, velocity, stand_off, max_speed, max_accel, t.distance_tolerance * 2.0)
            }
            _ => {
                let anchor = match (memory.leader, leader_position) {
                    (Some(leader), Some(leader_pos)) if leader != agent.id => {
                        leader_pos + memory.formation_offset
                    }
                    _ => {
                        memory.patrol_angle += t.patrol_speed * dt_ms / 1000.0;
                        memory.patrol_center + DVec2::from_angle(memory.patrol_angle) * t.patrol_radius
                    }
                };
                arrive(position, velocity, anchor, max_speed * 0.6, max_accel, 120.0)
            }
        };

        let hazards = detect_gravity_sources(ctx.query, position);
        accel + avoidance_accel(position, &hazards, self.profile.gravity_responsiveness)
    }
}

fn leader_of(agent: &Agent) -> Option<EntityId> {
    match agent.ai.memory.as_ref() {
        Some(FactionMemory::Sentinel(memory)) => memory.leader,
        _ => None,
    }
}

impl FactionBehavior for SentinelBehavior {
    fn faction(&self) -> FactionTag {
        FactionTag::Sentinel
    }

    fn update_group(&mut self, agents: &mut [Agent], dt_ms: f64, ctx: &mut AiContext<'_>) {
        for agent in agents.iter_mut() {
            if peek_mut::<SentinelMemory>(&mut agent.ai).is_none() {
                let memory = Self::enter(agent);
                checkin(&mut agent.ai, memory);
            }
        }

        let groups = self.form_groups(agents);
        Self::assign_groups(agents, &groups);

        let mut group_of = vec![0usize; agents.len()];
        for (g, members) in groups.iter().enumerate() {
            for &i in members {
                group_of[i] = g;
            }
        }

        for index in 0..agents.len() {
            let group = &groups[group_of[index]];
            self.update_agent(agents, index, group, dt_ms, ctx);
        }
    }
}
