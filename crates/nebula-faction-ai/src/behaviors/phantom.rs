//! Phantom: hit-and-run skirmisher with a dash/dodge subsystem and a
//! periodic phase shift that makes it untargetable.

use std::f64::consts::{FRAC_PI_4, TAU};

use log::debug;
use rand::Rng;

use nebula_core::components::Visibility;
use nebula_core::enums::{AiState, EntityKind, FactionTag};
use nebula_core::memory::PhantomMemory;
use nebula_core::types::DVec2;

use super::{avoidance_accel, decision_due, track, FactionBehavior};
use crate::agent::{Agent, AiContext};
use crate::memory::{checkin, checkout};
use crate::profiles::{FactionProfile, PHANTOM_PROFILE};
use crate::steering::{arrive, brake, flee, seek};
use crate::traits::{detect_gravity_sources, Shooting, Targeting};

/// A hunt point counts as reached inside this radius.
const HUNT_ARRIVAL_RADIUS: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct PhantomTuning {
    pub attack_range: f64,
    /// Closer than this the phantom backs off.
    pub retreat_distance: f64,
    /// A retreat continues until the target is this far away.
    pub safe_distance: f64,
    /// Below this health fraction the phantom always retreats.
    pub retreat_health: f64,
    pub dash_check_interval_ms: f64,
    pub dash_duration_ms: f64,
    pub dash_cooldown_ms: f64,
    pub dash_accel: f64,
    /// Speed cap multiplier while dashing.
    pub dash_speed_factor: f64,
    /// Projectiles inside this radius trigger a dodge.
    pub dodge_radius: f64,
    /// Target closer than this triggers an escape dash.
    pub escape_band: f64,
    /// Target inside this band may trigger a flanking dash.
    pub flank_band: f64,
    pub flank_chance: f64,
    pub phase_interval_ms: f64,
    pub phased_alpha: f64,
    pub strafe_accel: f64,
    /// Radius around the phantom for random hunt points.
    pub hunt_radius: f64,
    /// Gravity responsiveness multiplier while dashing.
    pub dash_gravity_escalation: f64,
}

impl Default for PhantomTuning {
    fn default() -> Self {
        Self {
            attack_range: 450.0,
            retreat_distance: 150.0,
            safe_distance: 350.0,
            retreat_health: 0.3,
            dash_check_interval_ms: 500.0,
            dash_duration_ms: 250.0,
            dash_cooldown_ms: 1500.0,
            dash_accel: 2400.0,
            dash_speed_factor: 3.0,
            dodge_radius: 200.0,
            escape_band: 180.0,
            flank_band: 500.0,
            flank_chance: 0.35,
            phase_interval_ms: 2000.0,
            phased_alpha: 0.3,
            strafe_accel: 160.0,
            hunt_radius: 500.0,
            dash_gravity_escalation: 2.5,
        }
    }
}

pub struct PhantomBehavior {
    tuning: PhantomTuning,
    profile: FactionProfile,
    targeting: Targeting,
    shooting: Shooting,
}

impl Default for PhantomBehavior {
    fn default() -> Self {
        Self::new(PhantomTuning::default())
    }
}

impl PhantomBehavior {
    pub fn new(tuning: PhantomTuning) -> Self {
        let profile = PHANTOM_PROFILE;
        Self {
            tuning,
            profile,
            targeting: Targeting::new(profile.detection_range),
            shooting: Shooting::new(profile.shoot_range),
        }
    }

    fn enter(&self, agent: &Agent, rng: &mut dyn rand::RngCore) -> PhantomMemory {
        PhantomMemory {
            target: None,
            target_position: None,
            last_known_position: None,
            dash_check_timer_ms: self.tuning.dash_check_interval_ms,
            dash_timer_ms: 0.0,
            dash_cooldown_ms: 0.0,
            dash_direction: DVec2::ZERO,
            phase_timer_ms: self.tuning.phase_interval_ms,
            phased: false,
            strafe_direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            base_max_speed: agent.physics.max_speed,
            hunt_point: None,
        }
    }

    fn update_agent(&self, agent: &mut Agent, dt_ms: f64, ctx: &mut AiContext<'_>) {
        let mut memory = match checkout::<PhantomMemory>(&mut agent.ai) {
            Some(memory) => memory,
            None => self.enter(agent, ctx.rng),
        };

        memory.dash_check_timer_ms -= dt_ms;
        memory.dash_cooldown_ms -= dt_ms;
        memory.phase_timer_ms -= dt_ms;
        if memory.dash_timer_ms > 0.0 {
            memory.dash_timer_ms -= dt_ms;
            if memory.dash_timer_ms <= 0.0 {
                memory.dash_timer_ms = 0.0;
                memory.dash_cooldown_ms = self.tuning.dash_cooldown_ms;
                agent.physics.max_speed = memory.base_max_speed;
            }
        }
        memory.target_position = track(ctx.query, memory.target);

        if memory.phase_timer_ms <= 0.0 {
            memory.phase_timer_ms += self.tuning.phase_interval_ms;
            memory.phased = !memory.phased;
            agent.visibility = if memory.phased {
                Visibility {
                    alpha: self.tuning.phased_alpha,
                    targetable: false,
                }
            } else {
                Visibility::default()
            };
        }

        if decision_due(agent, dt_ms, self.profile.decision_interval_ms) {
            self.decide(agent, &mut memory, ctx);
        }

        let dashing = memory.dash_timer_ms > 0.0;
        if !dashing && memory.dash_check_timer_ms <= 0.0 {
            memory.dash_check_timer_ms = self.tuning.dash_check_interval_ms;
            if memory.dash_cooldown_ms <= 0.0 {
                if let Some(direction) = self.choose_dash(agent, &mut memory, ctx) {
                    memory.dash_direction = direction;
                    memory.dash_timer_ms = self.tuning.dash_duration_ms;
                    agent.physics.max_speed = memory.base_max_speed * self.tuning.dash_speed_factor;
                    debug!("phantom {:?} dashing {:?}", agent.id, direction);
                }
            }
        }

        let dashing = memory.dash_timer_ms > 0.0;
        if !dashing && !memory.phased && agent.ai.state == AiState::Attacking {
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

        let steering = self.steer(agent, &mut memory, ctx);
        agent.accelerate(steering);

        checkin(&mut agent.ai, memory);
    }

    fn decide(&self, agent: &mut Agent, memory: &mut PhantomMemory, ctx: &mut AiContext<'_>) {
        let position = agent.position();
        let health = agent.health_fraction();
        agent.ai.fear = 1.0 - health;

        let Some(target) = self
            .targeting
            .nearest_target(ctx.query, agent.id, position, FactionTag::Phantom, None)
        else {
            memory.target = None;
            memory.target_position = None;
            agent.ai.state = AiState::Hunting;
            if memory.hunt_point.is_none() {
                memory.hunt_point = Some(memory.last_known_position.take().unwrap_or_else(|| {
                    let angle = ctx.rng.gen_range(0.0..TAU);
                    let radius = ctx.rng.gen_range(0.0..=self.tuning.hunt_radius);
                    position + DVec2::from_angle(angle) * radius
                }));
            }
            return;
        };

        memory.target = Some(target.id);
        memory.target_position = Some(target.position);
        memory.last_known_position = Some(target.position);
        memory.hunt_point = None;

        let still_retreating =
            agent.ai.state == AiState::Retreating && target.distance < self.tuning.safe_distance;
        agent.ai.state = if target.distance < self.tuning.retreat_distance
            || still_retreating
            || health < self.tuning.retreat_health
        {
            AiState::Retreating
        } else if target.distance <= self.tuning.attack_range {
            AiState::Attacking
        } else {
            AiState::Approaching
        };
    }

    /// Dodge the nearest incoming projectile, else escape or flank the
    /// current target. `None` means no dash this check.
    fn choose_dash(&self, agent: &Agent, memory: &mut PhantomMemory, ctx: &mut AiContext<'_>) -> Option<DVec2> {
        let position = agent.position();

        let incoming = ctx
            .query
            .entities_within(position, self.tuning.dodge_radius, EntityKind::Projectile)
            .into_iter()
            .filter(|&id| {
                ctx.query
                    .projectile(id)
                    .is_some_and(|p| p.owner != Some(agent.id))
            })
            .filter_map(|id| {
                let transform = ctx.query.transform(id)?;
                let velocity = ctx.query.physics(id).map_or(DVec2::ZERO, |p| p.velocity);
                let distance = position.distance(transform.position);
                (distance <= self.tuning.dodge_radius).then_some((distance, transform.position, velocity))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, shot_position, shot_velocity)) = incoming {
            let away = position - shot_position;
            let Some(heading) = shot_velocity.try_normalize() else {
                return Some(away.try_normalize().unwrap_or(DVec2::X));
            };
            let perpendicular = heading.perp();
            let side = match away.dot(perpendicular) {
                d if d > 0.0 => 1.0,
                d if d < 0.0 => -1.0,
                _ => memory.strafe_direction,
            };
            return Some(perpendicular * side);
        }

        let target = memory.target_position?;
        let to_target = target - position;
        let distance = to_target.length();
        let toward = to_target.try_normalize()?;

        if distance < self.tuning.escape_band {
            let tilt = DVec2::from_angle(FRAC_PI_4 * memory.strafe_direction);
            Some((-toward).rotate(tilt))
        } else if distance <= self.tuning.flank_band && ctx.rng.gen_bool(self.tuning.flank_chance.clamp(0.0, 1.0)) {
            let direction = toward.perp() * memory.strafe_direction;
            memory.strafe_direction = -memory.strafe_direction;
            Some(direction)
        } else {
            None
        }
    }

    fn steer(&self, agent: &Agent, memory: &mut PhantomMemory, ctx: &mut AiContext<'_>) -> DVec2 {
        let position = agent.position();
        let velocity = agent.velocity();
        let max_speed = agent.physics.max_speed;
        let max_accel = self.profile.max_accel;
        let hazards = detect_gravity_sources(ctx.query, position);

        if memory.dash_timer_ms > 0.0 {
            let responsiveness = self.profile.gravity_responsiveness * self.tuning.dash_gravity_escalation;
            return memory.dash_direction * self.tuning.dash_accel
                + avoidance_accel(position, &hazards, responsiveness);
        }

        let accel = match (agent.ai.state, memory.target_position) {
            (AiState::Approaching, Some(target)) => seek(position, velocity, target, max_speed, max_accel),
            (AiState::Attacking, Some(target)) => {
                let toward = (target - position).normalize_or_zero();
                let hold = target - toward * self.tuning.attack_range * 0.75;
                arrive(position, velocity, hold, max_speed, max_accel, 100.0)
                    + toward.perp() * memory.strafe_direction * self.tuning.strafe_accel
            }
            (AiState::Retreating, Some(target)) => flee(position, velocity, target, max_speed, max_accel),
            (AiState::Hunting, _) => match memory.hunt_point {
                Some(point) if position.distance(point) < HUNT_ARRIVAL_RADIUS => {
                    memory.hunt_point = None;
                    brake(velocity, 1.0, max_accel)
                }
                Some(point) => arrive(position, velocity, point, max_speed * 0.7, max_accel, 80.0),
                None => brake(velocity, 1.0, max_accel),
            },
            _ => brake(velocity, 1.0, max_accel),
        };

        accel + avoidance_accel(position, &hazards, self.profile.gravity_responsiveness)
    }
}

impl FactionBehavior for PhantomBehavior {
    fn faction(&self) -> FactionTag {
        FactionTag::Phantom
    }

    fn update_group(&mut self, agents: &mut [Agent], dt_ms: f64, ctx: &mut AiContext<'_>) {
        for agent in agents.iter_mut() {
            self.update_agent(agent, dt_ms, ctx);
        }
    }
}
