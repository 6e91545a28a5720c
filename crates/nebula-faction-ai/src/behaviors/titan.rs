//! Titan: slow advance punctuated by a committed sprint charge and slam.
//!
//! A charge locks its heading at the moment it starts and then only turns
//! by a fixed fraction of the remaining angle per tick. Titans shrug off
//! ordinary gravity, but a nearby vortex aborts the charge and forces an
//! evasive tick.

use log::debug;

use nebula_core::enums::{AiState, FactionTag};
use nebula_core::events::GameEvent;
use nebula_core::memory::TitanMemory;
use nebula_core::types::DVec2;

use super::{avoidance_accel, decision_due, track, FactionBehavior};
use crate::agent::{Agent, AiContext};
use crate::memory::{checkin, checkout};
use crate::profiles::{FactionProfile, TITAN_PROFILE};
use crate::steering::{brake, rotate_toward, seek};
use crate::traits::gravity::vortex_emergency;
use crate::traits::{detect_gravity_sources, Shooting, Targeting};

#[derive(Debug, Clone)]
pub struct TitanTuning {
    /// A charge starts only when the target is farther than this.
    pub charge_trigger_distance: f64,
    pub charge_duration_ms: f64,
    pub charge_cooldown_ms: f64,
    /// Speed cap reached at the end of the charge ramp.
    pub charge_speed: f64,
    /// Velocity tracking gain while charging (1/s).
    pub charge_gain: f64,
    /// Fraction of the angle to the target corrected per tick.
    pub course_correction: f64,
    /// Charge converts to a slam inside this distance.
    pub slam_distance: f64,
    pub prepare_duration_ms: f64,
    pub slam_duration_ms: f64,
    pub shockwave_radius: f64,
    pub shockwave_force: f64,
    pub shake_intensity: f64,
    pub shake_duration_ms: f64,
    pub slam_brake: f64,
    /// Vortex emergency triggers inside this multiple of its danger radius.
    pub vortex_emergency_factor: f64,
    pub emergency_responsiveness: f64,
    /// Cruise speed fraction while advancing.
    pub advance_speed_factor: f64,
}

impl Default for TitanTuning {
    fn default() -> Self {
        Self {
            charge_trigger_distance: 400.0,
            charge_duration_ms: 3000.0,
            charge_cooldown_ms: 6000.0,
            charge_speed: 420.0,
            charge_gain: 4.0,
            course_correction: 0.05,
            slam_distance: 200.0,
            prepare_duration_ms: 600.0,
            slam_duration_ms: 400.0,
            shockwave_radius: 260.0,
            shockwave_force: 900.0,
            shake_intensity: 0.02,
            shake_duration_ms: 500.0,
            slam_brake: 3.0,
            vortex_emergency_factor: 1.5,
            emergency_responsiveness: 2.0,
            advance_speed_factor: 0.8,
        }
    }
}

pub struct TitanBehavior {
    tuning: TitanTuning,
    profile: FactionProfile,
    targeting: Targeting,
    shooting: Shooting,
}

impl Default for TitanBehavior {
    fn default() -> Self {
        Self::new(TitanTuning::default())
    }
}

fn is_committed(state: AiState) -> bool {
    matches!(
        state,
        AiState::SprintCharging | AiState::PreparingSlam | AiState::Slamming
    )
}

impl TitanBehavior {
    pub fn new(tuning: TitanTuning) -> Self {
        let profile = TITAN_PROFILE;
        Self {
            tuning,
            profile,
            targeting: Targeting::new(profile.detection_range),
            shooting: Shooting::new(profile.shoot_range),
        }
    }

    fn enter(agent: &mut Agent) -> TitanMemory {
        agent.ai.state = AiState::Seeking;
        TitanMemory {
            target: None,
            target_position: None,
            charge_timer_ms: 0.0,
            charge_direction: DVec2::ZERO,
            charge_cooldown_ms: 0.0,
            slam_timer_ms: 0.0,
            base_max_speed: agent.physics.max_speed,
        }
    }

    fn end_charge(&self, agent: &mut Agent, memory: &mut TitanMemory) {
        agent.ai.state = AiState::Advancing;
        memory.charge_timer_ms = 0.0;
        memory.slam_timer_ms = 0.0;
        memory.charge_cooldown_ms = self.tuning.charge_cooldown_ms;
        agent.physics.max_speed = memory.base_max_speed;
    }

    fn update_agent(&self, agent: &mut Agent, dt_ms: f64, ctx: &mut AiContext<'_>) {
        let mut memory = match checkout::<TitanMemory>(&mut agent.ai) {
            Some(memory) => memory,
            None => Self::enter(agent),
        };

        let decide = decision_due(agent, dt_ms, self.profile.decision_interval_ms);
        memory.charge_cooldown_ms -= dt_ms;
        memory.target_position = track(ctx.query, memory.target);

        let position = agent.position();
        let hazards = detect_gravity_sources(ctx.query, position);
        if vortex_emergency(position, &hazards, self.tuning.vortex_emergency_factor) {
            if is_committed(agent.ai.state) {
                debug!("titan {:?} aborting charge near vortex", agent.id);
                self.end_charge(agent, &mut memory);
            }
            agent.accelerate(avoidance_accel(position, &hazards, self.tuning.emergency_responsiveness));
            checkin(&mut agent.ai, memory);
            return;
        }

        self.progress(agent, &mut memory, dt_ms, ctx);

        if decide && !is_committed(agent.ai.state) {
            self.decide(agent, &mut memory, ctx);
        }

        let steering = self.steer(agent, &mut memory, ctx);
        agent.accelerate(steering + avoidance_accel(position, &hazards, self.profile.gravity_responsiveness));

        checkin(&mut agent.ai, memory);
    }

    /// Timer-driven charge → prepare → slam progression.
    fn progress(&self, agent: &mut Agent, memory: &mut TitanMemory, dt_ms: f64, ctx: &mut AiContext<'_>) {
        match agent.ai.state {
            AiState::SprintCharging => {
                memory.charge_timer_ms -= dt_ms;
                if let Some(target) = memory.target_position {
                    memory.charge_direction = rotate_toward(
                        memory.charge_direction,
                        target - agent.position(),
                        self.tuning.course_correction,
                    );
                    if agent.position().distance(target) <= self.tuning.slam_distance {
                        agent.ai.state = AiState::PreparingSlam;
                        memory.slam_timer_ms = self.tuning.prepare_duration_ms;
                        return;
                    }
                }
                if memory.charge_timer_ms <= 0.0 {
                    self.end_charge(agent, memory);
                }
            }
            AiState::PreparingSlam => {
                memory.slam_timer_ms -= dt_ms;
                if memory.slam_timer_ms <= 0.0 {
                    ctx.events.emit(GameEvent::TitanShockwave {
                        source: agent.id,
                        position: agent.position(),
                        radius: self.tuning.shockwave_radius,
                        force: self.tuning.shockwave_force,
                    });
                    ctx.events.emit(GameEvent::CameraShake {
                        intensity: self.tuning.shake_intensity,
                        duration_ms: self.tuning.shake_duration_ms,
                    });
                    agent.ai.state = AiState::Slamming;
                    memory.slam_timer_ms = self.tuning.slam_duration_ms;
                }
            }
            AiState::Slamming => {
                memory.slam_timer_ms -= dt_ms;
                if memory.slam_timer_ms <= 0.0 {
                    self.end_charge(agent, memory);
                }
            }
            _ => {}
        }
    }

    fn decide(&self, agent: &mut Agent, memory: &mut TitanMemory, ctx: &mut AiContext<'_>) {
        let position = agent.position();
        let Some(target) = self
            .targeting
            .nearest_target(ctx.query, agent.id, position, FactionTag::Titan, None)
        else {
            memory.target = None;
            memory.target_position = None;
            agent.ai.state = AiState::Seeking;
            return;
        };

        memory.target = Some(target.id);
        memory.target_position = Some(target.position);

        if target.distance > self.tuning.charge_trigger_distance && memory.charge_cooldown_ms <= 0.0 {
            agent.ai.state = AiState::SprintCharging;
            memory.charge_timer_ms = self.tuning.charge_duration_ms;
            memory.charge_direction = (target.position - position).normalize_or_zero();
            agent.physics.max_speed = self.tuning.charge_speed;
            debug!("titan {:?} charging {:?}", agent.id, target.id);
        } else {
            agent.ai.state = AiState::Advancing;
        }
    }

    fn steer(&self, agent: &mut Agent, memory: &mut TitanMemory, ctx: &mut AiContext<'_>) -> DVec2 {
        let position = agent.position();
        let velocity = agent.velocity();
        let max_accel = self.profile.max_accel;
        let t = &self.tuning;

        match agent.ai.state {
            AiState::SprintCharging => {
                let progress = (1.0 - memory.charge_timer_ms / t.charge_duration_ms).clamp(0.2, 1.0);
                let desired = memory.charge_direction * t.charge_speed * progress;
                ((desired - velocity) * t.charge_gain).clamp_length_max(t.charge_speed * t.charge_gain)
            }
            AiState::PreparingSlam | AiState::Slamming => brake(velocity, t.slam_brake, max_accel * t.slam_brake),
            AiState::Advancing => {
                let Some(target) = memory.target_position else {
                    return brake(velocity, 0.5, max_accel);
                };
                let distance = position.distance(target);
                if self.shooting.can_shoot(agent.weapon.as_ref(), distance) {
                    let target_velocity = memory
                        .target
                        .and_then(|id| ctx.query.physics(id))
                        .map(|p| p.velocity);
                    self.shooting
                        .aim_and_shoot(agent, target, target_velocity, ctx.events);
                }
                seek(position, velocity, target, memory.base_max_speed * t.advance_speed_factor, max_accel)
            }
            _ => {
                // Out of detection range: lumber toward the player.
                let player = ctx.query.player().and_then(|id| ctx.query.transform(id));
                match player {
                    Some(player) => seek(
                        position,
                        velocity,
                        player.position,
                        memory.base_max_speed * t.advance_speed_factor * 0.5,
                        max_accel,
                    ),
                    None => brake(velocity, 0.5, max_accel),
                }
            }
        }
    }
}

impl FactionBehavior for TitanBehavior {
    fn faction(&self) -> FactionTag {
        FactionTag::Titan
    }

    fn update_group(&mut self, agents: &mut [Agent], dt_ms: f64, ctx: &mut AiContext<'_>) {
        for agent in agents.iter_mut() {
            self.update_agent(agent, dt_ms, ctx);
        }
    }
}
