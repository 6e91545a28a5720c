//! Swarm: chaotic orbit, committed dive, point-blank buzz.

use std::f64::consts::TAU;

use log::debug;
use rand::Rng;

use nebula_core::enums::{AiState, FactionTag, SwarmPhase};
use nebula_core::memory::SwarmMemory;
use nebula_core::types::DVec2;

use super::{avoidance_accel, decision_due, track, FactionBehavior};
use crate::agent::{Agent, AiContext};
use crate::memory::{checkin, checkout};
use crate::profiles::{FactionProfile, SWARM_PROFILE};
use crate::steering::{arrive, seek};
use crate::traits::{detect_gravity_sources, Flocking, Neighbor, Shooting, Targeting};

/// Dive ends early once the swarmer is this close to its dive point.
const DIVE_ARRIVAL_RADIUS: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct SwarmTuning {
    pub orbit_radius: f64,
    /// Orbit angular speed (rad/s).
    pub orbit_speed: f64,
    /// A dive is only started when the target is this close.
    pub dive_range: f64,
    pub dive_cooldown_min_ms: f64,
    pub dive_cooldown_max_ms: f64,
    pub dive_duration_ms: f64,
    /// Max distance of the dive point from the target.
    pub dive_spread: f64,
    /// Speed and acceleration multiplier while diving.
    pub dive_speed_factor: f64,
    pub buzz_duration_ms: f64,
    pub buzz_radius: f64,
    pub jitter_accel: f64,
    /// Jitter oscillation frequency (rad/ms).
    pub jitter_frequency: f64,
    /// Chance to fire on a decision pass while close.
    pub fire_chance: f64,
    pub flocking: Flocking,
}

impl Default for SwarmTuning {
    fn default() -> Self {
        Self {
            orbit_radius: 180.0,
            orbit_speed: 1.6,
            dive_range: 600.0,
            dive_cooldown_min_ms: 2500.0,
            dive_cooldown_max_ms: 4500.0,
            dive_duration_ms: 900.0,
            dive_spread: 80.0,
            dive_speed_factor: 1.8,
            buzz_duration_ms: 1200.0,
            buzz_radius: 60.0,
            jitter_accel: 220.0,
            jitter_frequency: 0.012,
            fire_chance: 0.15,
            flocking: Flocking::default(),
        }
    }
}

pub struct SwarmBehavior {
    tuning: SwarmTuning,
    profile: FactionProfile,
    targeting: Targeting,
    shooting: Shooting,
}

impl Default for SwarmBehavior {
    fn default() -> Self {
        Self::new(SwarmTuning::default())
    }
}

impl SwarmBehavior {
    pub fn new(tuning: SwarmTuning) -> Self {
        let profile = SWARM_PROFILE;
        Self {
            tuning,
            profile,
            targeting: Targeting::new(profile.detection_range),
            shooting: Shooting::new(profile.shoot_range),
        }
    }

    fn enter(&self, rng: &mut dyn rand::RngCore) -> SwarmMemory {
        SwarmMemory {
            phase: SwarmPhase::Circling,
            phase_timer_ms: 0.0,
            dive_timer_ms: self.dive_cooldown(rng),
            dive_target: None,
            target: None,
            target_position: None,
            orbit_angle: rng.gen_range(0.0..TAU),
            orbit_direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            jitter_phase: rng.gen_range(0.0..TAU),
            wander_angle: rng.gen_range(0.0..TAU),
        }
    }

    fn dive_cooldown(&self, rng: &mut dyn rand::RngCore) -> f64 {
        let min = self.tuning.dive_cooldown_min_ms;
        let max = self.tuning.dive_cooldown_max_ms.max(min);
        rng.gen_range(min..=max)
    }

    fn update_agent(&self, agent: &mut Agent, neighbors: &[Neighbor], dt_ms: f64, ctx: &mut AiContext<'_>) {
        let mut memory = match checkout::<SwarmMemory>(&mut agent.ai) {
            Some(memory) => memory,
            None => self.enter(ctx.rng),
        };

        memory.dive_timer_ms -= dt_ms;
        memory.target_position = track(ctx.query, memory.target);
        self.advance_phase(agent, &mut memory, dt_ms, ctx);

        if decision_due(agent, dt_ms, self.profile.decision_interval_ms) {
            self.decide(agent, &mut memory, ctx);
        }

        let steering = self.steer(agent, &mut memory, neighbors, dt_ms, ctx);
        agent.accelerate(steering);

        checkin(&mut agent.ai, memory);
    }

    /// Timer-driven phase progression: diving → buzzing → circling.
    fn advance_phase(&self, agent: &mut Agent, memory: &mut SwarmMemory, dt_ms: f64, ctx: &mut AiContext<'_>) {
        match memory.phase {
            SwarmPhase::Circling => {}
            SwarmPhase::Diving => {
                memory.phase_timer_ms -= dt_ms;
                let arrived = memory
                    .dive_target
                    .map_or(true, |point| agent.position().distance(point) < DIVE_ARRIVAL_RADIUS);
                if memory.phase_timer_ms <= 0.0 || arrived {
                    memory.phase = SwarmPhase::Buzzing;
                    memory.phase_timer_ms = self.tuning.buzz_duration_ms;
                    memory.dive_target = None;
                    agent.physics.max_speed = self.profile.max_speed;
                }
            }
            SwarmPhase::Buzzing => {
                memory.phase_timer_ms -= dt_ms;
                if memory.phase_timer_ms <= 0.0 {
                    memory.phase = SwarmPhase::Circling;
                    memory.phase_timer_ms = 0.0;
                    memory.dive_timer_ms = self.dive_cooldown(ctx.rng);
                }
            }
        }
    }

    fn decide(&self, agent: &mut Agent, memory: &mut SwarmMemory, ctx: &mut AiContext<'_>) {
        let position = agent.position();
        let Some(target) = self
            .targeting
            .nearest_target(ctx.query, agent.id, position, FactionTag::Swarm, None)
        else {
            memory.target = None;
            memory.target_position = None;
            memory.dive_target = None;
            memory.phase = SwarmPhase::Circling;
            agent.ai.state = AiState::Idle;
            agent.physics.max_speed = self.profile.max_speed;
            return;
        };

        memory.target = Some(target.id);
        memory.target_position = Some(target.position);
        agent.ai.state = AiState::Engaging;

        if memory.phase == SwarmPhase::Circling
            && memory.dive_timer_ms <= 0.0
            && target.distance <= self.tuning.dive_range
        {
            let spread = ctx.rng.gen_range(0.0..=self.tuning.dive_spread);
            let angle = ctx.rng.gen_range(0.0..TAU);
            memory.phase = SwarmPhase::Diving;
            memory.phase_timer_ms = self.tuning.dive_duration_ms;
            memory.dive_target = Some(target.position + DVec2::from_angle(angle) * spread);
            agent.physics.max_speed = self.profile.max_speed * self.tuning.dive_speed_factor;
            debug!("swarm {:?} diving at {:?}", agent.id, target.id);
        }

        if self.shooting.can_shoot(agent.weapon.as_ref(), target.distance)
            && ctx.rng.gen_bool(self.tuning.fire_chance.clamp(0.0, 1.0))
        {
            let velocity = ctx.query.physics(target.id).map(|p| p.velocity);
            self.shooting
                .aim_and_shoot(agent, target.position, velocity, ctx.events);
        }
    }

    fn steer(
        &self,
        agent: &Agent,
        memory: &mut SwarmMemory,
        neighbors: &[Neighbor],
        dt_ms: f64,
        ctx: &mut AiContext<'_>,
    ) -> DVec2 {
        let position = agent.position();
        let velocity = agent.velocity();
        let max_speed = agent.physics.max_speed;
        let max_accel = self.profile.max_accel;
        let t = &self.tuning;

        let mut accel = match (memory.phase, memory.target_position) {
            (_, None) => {
                memory.wander_angle += ctx.rng.gen_range(-0.3..0.3);
                let heading = DVec2::from_angle(memory.wander_angle);
                seek(position, velocity, position + heading * 100.0, max_speed * 0.5, max_accel)
            }
            (SwarmPhase::Circling, Some(target)) => {
                memory.orbit_angle += t.orbit_speed * memory.orbit_direction * dt_ms / 1000.0;
                let slot = target + DVec2::from_angle(memory.orbit_angle) * t.orbit_radius;
                arrive(position, velocity, slot, max_speed, max_accel, t.orbit_radius * 0.5)
            }
            (SwarmPhase::Diving, Some(target)) => {
                let point = memory.dive_target.unwrap_or(target);
                seek(position, velocity, point, max_speed, max_accel * t.dive_speed_factor)
            }
            (SwarmPhase::Buzzing, Some(target)) => {
                let angle = memory.jitter_phase + ctx.elapsed_ms * t.jitter_frequency * 2.0;
                let point = target + DVec2::from_angle(angle) * t.buzz_radius;
                arrive(position, velocity, point, max_speed, max_accel, t.buzz_radius)
            }
        };

        // Sideways wobble, out of phase across the swarm.
        let heading = match velocity.try_normalize() {
            Some(heading) => heading,
            None => DVec2::from_angle(memory.wander_angle),
        };
        let wobble = (ctx.elapsed_ms * t.jitter_frequency + memory.jitter_phase).sin();
        accel += heading.perp() * wobble * t.jitter_accel;

        accel += t.flocking.steer(agent.id, position, velocity, neighbors);

        let hazards = detect_gravity_sources(ctx.query, position);
        accel + avoidance_accel(position, &hazards, self.profile.gravity_responsiveness)
    }
}

impl FactionBehavior for SwarmBehavior {
    fn faction(&self) -> FactionTag {
        FactionTag::Swarm
    }

    fn update_group(&mut self, agents: &mut [Agent], dt_ms: f64, ctx: &mut AiContext<'_>) {
        let neighbors: Vec<Neighbor> = agents
            .iter()
            .map(|a| Neighbor {
                id: a.id,
                position: a.position(),
                velocity: a.velocity(),
            })
            .collect();

        for agent in agents.iter_mut() {
            self.update_agent(agent, &neighbors, dt_ms, ctx);
        }
    }
}
