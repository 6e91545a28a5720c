use std::f64::consts::FRAC_PI_4;

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use nebula_core::components::*;
use nebula_core::constants::*;
use nebula_core::enums::*;
use nebula_core::events::GameEvent;
use nebula_core::memory::*;
use nebula_core::types::{heading_of, DVec2, EntityId};

use crate::agent::{Agent, AiContext, SpatialQuery};
use crate::behaviors::*;
use crate::coordinator::AiCoordinator;
use crate::profiles::get_profile;
use crate::traits::gravity::avoidance_magnitude;
use crate::traits::*;

// --- In-memory world ---

struct TestEntity {
    id: EntityId,
    kind: EntityKind,
    transform: Transform,
    physics: Option<Physics>,
    faction: Option<FactionTag>,
    alliance: Option<Faction>,
    visibility: Option<Visibility>,
    well: Option<GravityWell>,
    projectile: Option<Projectile>,
}

#[derive(Default)]
struct TestWorld {
    player: Option<EntityId>,
    entities: Vec<TestEntity>,
    next_id: u64,
}

impl TestWorld {
    fn add(&mut self, kind: EntityKind, position: DVec2) -> EntityId {
        self.next_id += 1;
        let id = EntityId(1000 + self.next_id);
        self.entities.push(TestEntity {
            id,
            kind,
            transform: Transform::at(position),
            physics: None,
            faction: None,
            alliance: None,
            visibility: None,
            well: None,
            projectile: None,
        });
        id
    }

    fn get_mut(&mut self, id: EntityId) -> &mut TestEntity {
        self.entities.iter_mut().find(|e| e.id == id).unwrap()
    }

    fn add_player(&mut self, position: DVec2) -> EntityId {
        let id = self.add(EntityKind::Player, position);
        self.get_mut(id).physics = Some(Physics::new(1.0, PLAYER_RADIUS, 300.0));
        self.player = Some(id);
        id
    }

    fn add_enemy(&mut self, faction: FactionTag, position: DVec2) -> EntityId {
        let id = self.add(EntityKind::Enemy, position);
        let entity = self.get_mut(id);
        entity.faction = Some(faction);
        entity.alliance = Some(Faction::of(faction));
        id
    }

    fn add_hazard(&mut self, kind: HazardKind, position: DVec2, core_radius: f64, influence_radius: f64) -> EntityId {
        let entity_kind = match kind {
            HazardKind::Planet => EntityKind::Planet,
            HazardKind::Vortex => EntityKind::Catastrophe,
        };
        let id = self.add(entity_kind, position);
        self.get_mut(id).well = Some(GravityWell {
            kind,
            strength: 1.0,
            influence_radius,
            core_radius,
        });
        id
    }

    fn add_projectile(&mut self, position: DVec2, velocity: DVec2, owner: Option<EntityId>) -> EntityId {
        let id = self.add(EntityKind::Projectile, position);
        let entity = self.get_mut(id);
        let mut physics = Physics::new(0.1, PROJECTILE_RADIUS, 1000.0);
        physics.velocity = velocity;
        entity.physics = Some(physics);
        entity.projectile = Some(Projectile {
            owner,
            damage: 5.0,
            lifetime_ms: 1000.0,
        });
        id
    }

    fn find(&self, id: EntityId) -> Option<&TestEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

impl SpatialQuery for TestWorld {
    fn player(&self) -> Option<EntityId> {
        self.player
    }
    fn alliance(&self, id: EntityId) -> Option<Faction> {
        self.find(id).and_then(|e| e.alliance.clone())
    }
    fn transform(&self, id: EntityId) -> Option<Transform> {
        self.find(id).map(|e| e.transform)
    }
    fn physics(&self, id: EntityId) -> Option<Physics> {
        self.find(id).and_then(|e| e.physics)
    }
    fn faction(&self, id: EntityId) -> Option<FactionTag> {
        self.find(id).and_then(|e| e.faction)
    }
    fn visibility(&self, id: EntityId) -> Option<Visibility> {
        self.find(id).and_then(|e| e.visibility)
    }
    fn gravity_well(&self, id: EntityId) -> Option<GravityWell> {
        self.find(id).and_then(|e| e.well)
    }
    fn projectile(&self, id: EntityId) -> Option<Projectile> {
        self.find(id).and_then(|e| e.projectile)
    }
    fn entities_within(&self, center: DVec2, radius: f64, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind && e.transform.position.distance(center) <= radius)
            .map(|e| e.id)
            .collect()
    }
}

// --- Helpers ---

fn make_agent(id: u64, faction: FactionTag, position: DVec2) -> Agent {
    let profile = get_profile(faction).unwrap();
    Agent::new(
        EntityId(id),
        Transform::at(position),
        Physics::new(profile.mass, profile.radius, profile.max_speed),
        Ai::new(faction),
    )
    .with_weapon(Weapon::new(profile.damage, profile.fire_interval_ms, ENEMY_PROJECTILE_SPEED))
    .with_health(Health::full(profile.health))
}

fn tick(
    behavior: &mut dyn FactionBehavior,
    agents: &mut [Agent],
    world: &TestWorld,
    dt_ms: f64,
    events: &mut Vec<GameEvent>,
    rng: &mut ChaCha8Rng,
) {
    let mut ctx = AiContext {
        query: world,
        events,
        rng,
        elapsed_ms: 0.0,
    };
    behavior.update_group(agents, dt_ms, &mut ctx);
}

fn swarm_memory(agent: &Agent) -> &SwarmMemory {
    match agent.ai.memory.as_ref() {
        Some(FactionMemory::Swarm(memory)) => memory,
        other => panic!("expected swarm memory, got {other:?}"),
    }
}

fn sentinel_memory(agent: &Agent) -> &SentinelMemory {
    match agent.ai.memory.as_ref() {
        Some(FactionMemory::Sentinel(memory)) => memory,
        other => panic!("expected sentinel memory, got {other:?}"),
    }
}

fn phantom_memory(agent: &Agent) -> &PhantomMemory {
    match agent.ai.memory.as_ref() {
        Some(FactionMemory::Phantom(memory)) => memory,
        other => panic!("expected phantom memory, got {other:?}"),
    }
}

fn titan_memory(agent: &Agent) -> &TitanMemory {
    match agent.ai.memory.as_ref() {
        Some(FactionMemory::Titan(memory)) => memory,
        other => panic!("expected titan memory, got {other:?}"),
    }
}

fn swarm_ready_to_dive() -> SwarmMemory {
    SwarmMemory {
        phase: SwarmPhase::Circling,
        phase_timer_ms: 0.0,
        dive_timer_ms: -1.0,
        dive_target: None,
        target: None,
        target_position: None,
        orbit_angle: 0.0,
        orbit_direction: 1.0,
        jitter_phase: 0.0,
        wander_angle: 0.0,
    }
}

/// Phantom memory with no dash check due for another 500 ms.
fn settled_phantom_memory(strafe_direction: f64) -> PhantomMemory {
    PhantomMemory {
        target: None,
        target_position: None,
        last_known_position: None,
        dash_check_timer_ms: 500.0,
        dash_timer_ms: 0.0,
        dash_cooldown_ms: 0.0,
        dash_direction: DVec2::ZERO,
        phase_timer_ms: 2000.0,
        phased: false,
        strafe_direction,
        base_max_speed: 220.0,
        hunt_point: None,
    }
}

fn phantom_with(memory: PhantomMemory) -> Agent {
    let mut agent = make_agent(1, FactionTag::Phantom, DVec2::ZERO);
    agent.ai.memory = Some(FactionMemory::Phantom(memory));
    agent
}

fn shots(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyShootRequest { .. }))
        .count()
}

fn titan_at(position: DVec2, state: AiState, memory: TitanMemory) -> Agent {
    let mut agent = make_agent(1, FactionTag::Titan, position);
    agent.ai.state = state;
    agent.ai.memory = Some(FactionMemory::Titan(memory));
    agent.ai.decision_timer_ms = 10_000.0;
    agent
}

fn idle_titan_memory() -> TitanMemory {
    TitanMemory {
        target: None,
        target_position: None,
        charge_timer_ms: 0.0,
        charge_direction: DVec2::X,
        charge_cooldown_ms: 0.0,
        slam_timer_ms: 0.0,
        base_max_speed: 110.0,
    }
}

// --- Targeting ---

#[test]
fn test_targeting_player_outranks_closer_rivals() {
    let mut world = TestWorld::default();
    let player = world.add_player(DVec2::new(500.0, 0.0));
    let sentinel = world.add_enemy(FactionTag::Sentinel, DVec2::new(100.0, 0.0));
    let phantom = world.add_enemy(FactionTag::Phantom, DVec2::new(200.0, 0.0));
    world.add_enemy(FactionTag::Swarm, DVec2::new(50.0, 0.0));

    let targeting = Targeting::default();
    let targets = targeting.find_targets(&world, EntityId(1), DVec2::ZERO, FactionTag::Swarm, None);

    let ids: Vec<EntityId> = targets.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![player, sentinel, phantom]);
    assert_eq!(targets[0].priority, PLAYER_TARGET_PRIORITY);
    assert_eq!(targets[0].kind, EntityKind::Player);
    assert_eq!(targets[1].priority, RIVAL_TARGET_PRIORITY);
    assert!(targets[1].distance < targets[2].distance);
}

#[test]
fn test_targeting_skips_phased_and_out_of_range() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(2000.0, 0.0));
    let phased = world.add_enemy(FactionTag::Phantom, DVec2::new(100.0, 0.0));
    world.get_mut(phased).visibility = Some(Visibility {
        alpha: 0.3,
        targetable: false,
    });

    let targeting = Targeting::new(900.0);
    assert!(targeting
        .nearest_target(&world, EntityId(1), DVec2::ZERO, FactionTag::Titan, None)
        .is_none());

    // A wider override reaches the player.
    let far = targeting.nearest_target(&world, EntityId(1), DVec2::ZERO, FactionTag::Titan, Some(2500.0));
    assert_eq!(far.map(|t| t.kind), Some(EntityKind::Player));
}

#[test]
fn test_targeting_skips_allied_factions() {
    let mut world = TestWorld::default();
    let searcher = world.add_enemy(FactionTag::Swarm, DVec2::ZERO);
    let player = world.add_player(DVec2::new(300.0, 0.0));
    world.add_enemy(FactionTag::Sentinel, DVec2::new(100.0, 0.0));
    let phantom = world.add_enemy(FactionTag::Phantom, DVec2::new(200.0, 0.0));
    world
        .get_mut(searcher)
        .alliance
        .as_mut()
        .unwrap()
        .allies
        .push(FactionTag::Sentinel);

    let targeting = Targeting::new(1000.0);
    let ids = |world: &TestWorld| -> Vec<EntityId> {
        targeting
            .find_targets(world, searcher, DVec2::ZERO, FactionTag::Swarm, None)
            .iter()
            .map(|t| t.id)
            .collect()
    };
    assert_eq!(ids(&world), vec![player, phantom]);

    // Allied with the player too: only the phantom is left.
    world
        .get_mut(searcher)
        .alliance
        .as_mut()
        .unwrap()
        .allies
        .push(FactionTag::Player);
    assert_eq!(ids(&world), vec![phantom]);
}

// --- Shooting ---

#[test]
fn test_can_shoot_gates_on_cooldown_and_range() {
    let shooting = Shooting::new(400.0);
    let mut weapon = Weapon::new(5.0, 1000.0, 600.0);

    assert!(shooting.can_shoot(Some(&weapon), 300.0));
    // Range alone.
    assert!(!shooting.can_shoot(Some(&weapon), 401.0));
    // Cooldown alone.
    weapon.cooldown_ms = 1.0;
    assert!(!shooting.can_shoot(Some(&weapon), 300.0));
    // Both.
    assert!(!shooting.can_shoot(Some(&weapon), 401.0));
    // Exactly zero is ready.
    weapon.cooldown_ms = 0.0;
    assert!(shooting.can_shoot(Some(&weapon), 400.0));
    assert!(!shooting.can_shoot(None, 10.0));
}

#[test]
fn test_lead_angle_predicts_target_motion() {
    let straight = Shooting::lead_angle(DVec2::ZERO, DVec2::new(600.0, 0.0), None, 600.0);
    assert_abs_diff_eq!(straight, 0.0, epsilon = 1e-12);

    // One second of travel, target moving +y at 600.
    let led = Shooting::lead_angle(
        DVec2::ZERO,
        DVec2::new(600.0, 0.0),
        Some(DVec2::new(0.0, 600.0)),
        600.0,
    );
    assert_abs_diff_eq!(led, FRAC_PI_4, epsilon = 1e-12);
}

#[test]
fn test_aim_and_shoot_emits_request_and_rearms() {
    let shooting = Shooting::new(400.0);
    let mut agent = make_agent(3, FactionTag::Sentinel, DVec2::ZERO);
    let mut events = Vec::new();

    let angle = shooting.aim_and_shoot(&mut agent, DVec2::new(0.0, 100.0), None, &mut events);

    assert_abs_diff_eq!(angle.unwrap(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GameEvent::EnemyShootRequest { shooter, .. } if shooter == EntityId(3)));
    let weapon = agent.weapon.unwrap();
    assert_eq!(weapon.cooldown_ms, weapon.fire_interval_ms);
}

// --- Gravity avoidance ---

#[test]
fn test_planet_avoidance_is_monotonic() {
    let planet = GravityHazard {
        id: EntityId(9),
        kind: HazardKind::Planet,
        position: DVec2::ZERO,
        strength: 1.0,
        gravity_radius: 300.0,
        danger_radius: 100.0,
    };

    assert_eq!(avoidance_magnitude(&planet, 300.0), 0.0);
    assert_eq!(avoidance_magnitude(&planet, 350.0), 0.0);

    let outer = avoidance_magnitude(&planet, 250.0);
    let inner = avoidance_magnitude(&planet, 150.0);
    assert!(outer > 0.0);
    assert!(inner > outer);

    assert_eq!(avoidance_magnitude(&planet, 100.0), PLANET_PANIC_FORCE);
    assert_eq!(avoidance_magnitude(&planet, 40.0), PLANET_PANIC_FORCE);
}

#[test]
fn test_vortex_avoidance_ramps_and_panics_harder() {
    let vortex = GravityHazard {
        id: EntityId(9),
        kind: HazardKind::Vortex,
        position: DVec2::ZERO,
        strength: 1.0,
        gravity_radius: 600.0,
        danger_radius: 200.0,
    };
    let edge = avoidance_magnitude(&vortex, 599.999);
    let mid = avoidance_magnitude(&vortex, 400.0);
    let near = avoidance_magnitude(&vortex, 220.0);
    assert!(edge < 1e-3);
    assert!(near > mid && mid > edge);
    assert!(near <= VORTEX_AVOID_FORCE);
    assert_eq!(avoidance_magnitude(&vortex, 150.0), VORTEX_PANIC_FORCE);
    assert!(VORTEX_PANIC_FORCE > PLANET_PANIC_FORCE);
}

#[test]
fn test_detect_and_repel_from_planet() {
    let mut world = TestWorld::default();
    world.add_hazard(HazardKind::Planet, DVec2::ZERO, 50.0, 175.0);

    // Inside 1.5 × influence.
    let hazards = detect_gravity_sources(&world, DVec2::new(250.0, 0.0));
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].danger_radius, 50.0 + PLANET_DANGER_MARGIN);
    assert!(detect_gravity_sources(&world, DVec2::new(300.0, 0.0)).is_empty());

    let position = DVec2::new(0.0, 120.0);
    let hazards = detect_gravity_sources(&world, position);
    let push = calculate_avoidance(position, &hazards);
    assert_abs_diff_eq!(push.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(push.y, PLANET_PANIC_FORCE, epsilon = 1e-12);
}

// --- Formation & flocking ---

#[test]
fn test_circle_formation_ring_grows_with_members() {
    let ids: Vec<EntityId> = (0..4).map(EntityId).collect();
    let offsets = assign_formation_positions(&ids, FormationKind::Circle);
    let radius = FORMATION_BASE_RADIUS + FORMATION_RADIUS_PER_MEMBER * 4.0;

    assert_eq!(offsets.len(), 4);
    for offset in offsets.values() {
        assert_abs_diff_eq!(offset.length(), radius, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(offsets[&EntityId(0)].x, radius, epsilon = 1e-9);
    assert_abs_diff_eq!(offsets[&EntityId(1)].y, radius, epsilon = 1e-9);
}

#[test]
fn test_line_formation_is_centered() {
    let ids: Vec<EntityId> = (0..3).map(EntityId).collect();
    let offsets = assign_formation_positions(&ids, FormationKind::Line);

    assert_eq!(offsets[&EntityId(0)], DVec2::new(-FORMATION_LINE_SPACING, 0.0));
    assert_eq!(offsets[&EntityId(1)], DVec2::ZERO);
    assert_eq!(offsets[&EntityId(2)], DVec2::new(FORMATION_LINE_SPACING, 0.0));
    assert!(assign_formation_positions(&[], FormationKind::Line).is_empty());
}

#[test]
fn test_flocking_separates_close_neighbors() {
    let flocking = Flocking::default();
    let me = Neighbor {
        id: EntityId(1),
        position: DVec2::ZERO,
        velocity: DVec2::ZERO,
    };
    let crowding = Neighbor {
        id: EntityId(2),
        position: DVec2::new(10.0, 0.0),
        velocity: DVec2::ZERO,
    };

    let force = flocking.steer(me.id, me.position, me.velocity, &[me, crowding]);
    assert!(force.x < 0.0, "should push away from the close neighbor");

    // Alone, nothing to react to.
    assert_eq!(flocking.steer(me.id, me.position, me.velocity, &[me]), DVec2::ZERO);
}

#[test]
fn test_flocking_aligns_with_neighbors() {
    let flocking = Flocking {
        separation_weight: 0.0,
        cohesion_weight: 0.0,
        ..Flocking::default()
    };
    let other = Neighbor {
        id: EntityId(2),
        position: DVec2::new(60.0, 0.0),
        velocity: DVec2::new(0.0, 100.0),
    };
    let force = flocking.steer(EntityId(1), DVec2::ZERO, DVec2::ZERO, &[other]);
    assert!(force.y > 0.0);
    assert_abs_diff_eq!(force.x, 0.0, epsilon = 1e-12);
}

// --- Swarm ---

#[test]
fn test_swarm_dive_trigger() {
    let mut world = TestWorld::default();
    let target = DVec2::new(300.0, 0.0);
    world.add_player(target);

    let mut agent = make_agent(1, FactionTag::Swarm, DVec2::ZERO);
    agent.ai.memory = Some(FactionMemory::Swarm(swarm_ready_to_dive()));
    let mut agents = vec![agent];

    let mut behavior = SwarmBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut events = Vec::new();
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    let memory = swarm_memory(&agents[0]);
    assert_eq!(memory.phase, SwarmPhase::Diving);
    let dive_target = memory.dive_target.expect("dive target set");
    assert!(dive_target.distance(target) <= 100.0);
    assert_eq!(agents[0].ai.state, AiState::Engaging);
}

#[test]
fn test_swarm_dive_cycles_back_to_circling() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(300.0, 0.0));
    let mut agent = make_agent(1, FactionTag::Swarm, DVec2::ZERO);
    agent.ai.memory = Some(FactionMemory::Swarm(swarm_ready_to_dive()));
    let mut agents = vec![agent];

    let cruise = get_profile(FactionTag::Swarm).unwrap().max_speed;
    let tuning = SwarmTuning::default();
    let mut behavior = SwarmBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(swarm_memory(&agents[0]).phase, SwarmPhase::Diving);
    assert_abs_diff_eq!(
        agents[0].physics.max_speed,
        cruise * tuning.dive_speed_factor,
        epsilon = 1e-9
    );

    let mut phases = vec![SwarmPhase::Diving];
    for _ in 0..300 {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
        let memory = swarm_memory(&agents[0]);
        if phases.last() == Some(&memory.phase) {
            continue;
        }
        phases.push(memory.phase);
        match memory.phase {
            SwarmPhase::Buzzing => {
                assert_eq!(agents[0].physics.max_speed, cruise);
                assert!(memory.dive_target.is_none());
                assert_eq!(memory.phase_timer_ms, tuning.buzz_duration_ms);
            }
            SwarmPhase::Circling => {
                // Re-armed for the next dive.
                assert!(memory.dive_timer_ms >= tuning.dive_cooldown_min_ms);
                assert!(memory.dive_timer_ms <= tuning.dive_cooldown_max_ms);
                break;
            }
            SwarmPhase::Diving => {}
        }
    }

    assert_eq!(
        phases,
        vec![SwarmPhase::Diving, SwarmPhase::Buzzing, SwarmPhase::Circling]
    );
    assert_eq!(agents[0].physics.max_speed, cruise);
}

#[test]
fn test_swarm_without_target_idles_in_circling() {
    let world = TestWorld::default();
    let mut agents = vec![make_agent(1, FactionTag::Swarm, DVec2::new(100.0, 100.0))];
    let mut behavior = SwarmBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Idle);
    let memory = swarm_memory(&agents[0]);
    assert_eq!(memory.phase, SwarmPhase::Circling);
    assert!(memory.dive_timer_ms >= 2500.0 - DT_MS);
    assert!(events.is_empty());
}

// --- Titan ---

#[test]
fn test_titan_charge_lock_in() {
    let mut world = TestWorld::default();
    let player = world.add_player(DVec2::new(1000.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Titan, DVec2::ZERO)];
    let mut behavior = TitanBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::SprintCharging);
    let memory = titan_memory(&agents[0]);
    assert_eq!(memory.charge_timer_ms, 3000.0);
    assert_eq!(memory.charge_direction, DVec2::new(1.0, 0.0));

    // Target sidesteps; the charge only turns a little per tick.
    world.get_mut(player).transform.position = DVec2::new(1000.0, 1000.0);
    let mut previous = memory.charge_direction;
    for _ in 0..5 {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
        let memory = titan_memory(&agents[0]);
        let desired = DVec2::new(1000.0, 1000.0) - agents[0].position();
        let full_turn = (heading_of(desired) - heading_of(previous)).abs();
        let turned = (heading_of(memory.charge_direction) - heading_of(previous)).abs();
        assert!(turned > 0.0);
        assert!(turned <= full_turn * 0.05 + 1e-12);
        assert_abs_diff_eq!(memory.charge_direction.length(), 1.0, epsilon = 1e-12);
        previous = memory.charge_direction;
    }
    assert_abs_diff_eq!(titan_memory(&agents[0]).charge_timer_ms, 3000.0 - 5.0 * DT_MS, epsilon = 1e-9);
}

#[test]
fn test_titan_close_target_advances_instead_of_charging() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(300.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Titan, DVec2::ZERO)];
    let mut behavior = TitanBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[0].ai.state, AiState::Advancing);
}

#[test]
fn test_titan_slam_emits_shockwave_and_shake() {
    let world = TestWorld::default();
    let memory = TitanMemory {
        slam_timer_ms: 10.0,
        ..idle_titan_memory()
    };
    let mut agents = vec![titan_at(DVec2::new(500.0, 500.0), AiState::PreparingSlam, memory)];
    let mut behavior = TitanBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Slamming);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::TitanShockwave { source, .. } if *source == EntityId(1)
    )));
    assert!(events.iter().any(|e| matches!(e, GameEvent::CameraShake { .. })));

    // Slam runs out into a cooled-down advance.
    for _ in 0..30 {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    }
    assert_eq!(agents[0].ai.state, AiState::Advancing);
    assert!(titan_memory(&agents[0]).charge_cooldown_ms > 0.0);
}

#[test]
fn test_titan_vortex_cancels_charge() {
    let mut world = TestWorld::default();
    world.add_hazard(HazardKind::Vortex, DVec2::ZERO, 60.0, 360.0);
    let memory = TitanMemory {
        charge_timer_ms: 2000.0,
        ..idle_titan_memory()
    };
    let mut agents = vec![titan_at(DVec2::new(100.0, 0.0), AiState::SprintCharging, memory)];
    agents[0].physics.max_speed = 420.0;
    let mut behavior = TitanBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Advancing);
    let memory = titan_memory(&agents[0]);
    assert_eq!(memory.charge_cooldown_ms, 6000.0);
    assert_eq!(agents[0].physics.max_speed, 110.0);
    assert!(agents[0].force.x > 0.0, "should be pushed away from the vortex");
}

// --- Phantom ---

#[test]
fn test_phantom_dodges_perpendicular_to_projectile() {
    let mut world = TestWorld::default();
    world.add_projectile(DVec2::new(100.0, 20.0), DVec2::new(-600.0, 0.0), None);
    let mut agents = vec![make_agent(1, FactionTag::Phantom, DVec2::ZERO)];
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    // First dash check falls due after one interval.
    tick(&mut behavior, &mut agents, &world, 500.0, &mut events, &mut rng);

    let memory = phantom_memory(&agents[0]);
    assert!(memory.dash_timer_ms > 0.0);
    assert_abs_diff_eq!(memory.dash_direction.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(memory.dash_direction.y, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(agents[0].physics.max_speed, 220.0 * 3.0, epsilon = 1e-9);
}

#[test]
fn test_phantom_ignores_own_projectiles() {
    let mut world = TestWorld::default();
    world.add_projectile(DVec2::new(100.0, 20.0), DVec2::new(-600.0, 0.0), Some(EntityId(1)));
    let mut agents = vec![make_agent(1, FactionTag::Phantom, DVec2::ZERO)];
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, 500.0, &mut events, &mut rng);

    assert_eq!(phantom_memory(&agents[0]).dash_timer_ms, 0.0);
    assert_eq!(agents[0].physics.max_speed, 220.0);
}

#[test]
fn test_phantom_phase_toggles_every_two_seconds() {
    let world = TestWorld::default();
    let mut agents = vec![make_agent(1, FactionTag::Phantom, DVec2::ZERO)];
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    for _ in 0..19 {
        tick(&mut behavior, &mut agents, &world, 100.0, &mut events, &mut rng);
    }
    assert!(agents[0].visibility.targetable);

    tick(&mut behavior, &mut agents, &world, 100.0, &mut events, &mut rng);
    assert!(!agents[0].visibility.targetable);
    assert_eq!(agents[0].visibility.alpha, 0.3);
    assert!(phantom_memory(&agents[0]).phased);

    for _ in 0..20 {
        tick(&mut behavior, &mut agents, &world, 100.0, &mut events, &mut rng);
    }
    assert!(agents[0].visibility.targetable);
    assert_eq!(agents[0].visibility.alpha, 1.0);
}

#[test]
fn test_phantom_retreats_when_target_too_close() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(100.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Phantom, DVec2::ZERO)];
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Retreating);
    assert!(agents[0].force.x < 0.0);
}

#[test]
fn test_phantom_escape_dash_then_cooldown() {
    let mut world = TestWorld::default();
    // Inside the escape band, outside the retreat distance.
    world.add_player(DVec2::new(160.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Phantom, DVec2::ZERO)];
    let tuning = PhantomTuning::default();
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, 500.0, &mut events, &mut rng);

    let memory = phantom_memory(&agents[0]);
    let side = memory.strafe_direction;
    assert!(memory.dash_timer_ms > 0.0);
    // Straight away from the target, tilted 45° to the strafe side.
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert_abs_diff_eq!(memory.dash_direction.x, -half, epsilon = 1e-12);
    assert_abs_diff_eq!(memory.dash_direction.y, -half * side, epsilon = 1e-12);
    assert_abs_diff_eq!(agents[0].physics.max_speed, 220.0 * tuning.dash_speed_factor, epsilon = 1e-9);

    let mut ended = false;
    for _ in 0..30 {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
        let memory = phantom_memory(&agents[0]);
        if memory.dash_timer_ms <= 0.0 {
            assert_eq!(memory.dash_timer_ms, 0.0);
            assert_eq!(memory.dash_cooldown_ms, tuning.dash_cooldown_ms);
            ended = true;
            break;
        }
    }
    assert!(ended, "dash should run out");
    assert_eq!(agents[0].physics.max_speed, 220.0);
}

#[test]
fn test_phantom_flank_dash_flips_strafe_side() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(300.0, 0.0));
    let mut memory = settled_phantom_memory(1.0);
    memory.dash_check_timer_ms = 0.0;
    let mut agents = vec![phantom_with(memory)];
    let mut behavior = PhantomBehavior::new(PhantomTuning {
        flank_chance: 1.0,
        ..PhantomTuning::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    let memory = phantom_memory(&agents[0]);
    assert!(memory.dash_timer_ms > 0.0);
    assert_abs_diff_eq!(memory.dash_direction.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(memory.dash_direction.y, 1.0, epsilon = 1e-12);
    assert_eq!(memory.strafe_direction, -1.0);

    // The next flank goes the other way.
    let mut memory = memory.clone();
    memory.dash_timer_ms = 0.0;
    memory.dash_cooldown_ms = 0.0;
    memory.dash_check_timer_ms = 0.0;
    agents[0].ai.memory = Some(FactionMemory::Phantom(memory));
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    let memory = phantom_memory(&agents[0]);
    assert_abs_diff_eq!(memory.dash_direction.y, -1.0, epsilon = 1e-12);
    assert_eq!(memory.strafe_direction, 1.0);
}

#[test]
fn test_phantom_engagement_bands() {
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    // Beyond attack range: close in without firing.
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(700.0, 0.0));
    let mut agents = vec![phantom_with(settled_phantom_memory(1.0))];
    let mut events = Vec::new();
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[0].ai.state, AiState::Approaching);
    assert!(agents[0].force.x > 0.0);
    assert_eq!(shots(&events), 0);

    // Inside attack range: hold and fire.
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(300.0, 0.0));
    let mut agents = vec![phantom_with(settled_phantom_memory(1.0))];
    let mut events = Vec::new();
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[0].ai.state, AiState::Attacking);
    assert_eq!(shots(&events), 1);
}

#[test]
fn test_phantom_hunts_last_known_position() {
    let world = TestWorld::default();
    let last_seen = DVec2::new(400.0, 400.0);
    let mut memory = settled_phantom_memory(1.0);
    memory.last_known_position = Some(last_seen);
    let mut agents = vec![phantom_with(memory)];
    let mut behavior = PhantomBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Hunting);
    let memory = phantom_memory(&agents[0]);
    assert_eq!(memory.hunt_point, Some(last_seen));
    assert!(memory.last_known_position.is_none());
    assert!(agents[0].force.x > 0.0 && agents[0].force.y > 0.0);

    // Nothing remembered: a random point near the phantom.
    let mut agents = vec![phantom_with(settled_phantom_memory(1.0))];
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    let point = phantom_memory(&agents[0]).hunt_point.expect("hunt point");
    assert!(point.length() <= PhantomTuning::default().hunt_radius + 1e-9);
}

// --- Sentinel ---

#[test]
fn test_sentinel_calls_group_backup() {
    let mut world = TestWorld::default();
    let player_position = DVec2::new(340.0, 0.0);
    world.add_player(player_position);
    let mut agents = vec![
        make_agent(1, FactionTag::Sentinel, DVec2::ZERO),
        make_agent(2, FactionTag::Sentinel, DVec2::new(-390.0, 0.0)),
    ];
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert_eq!(agents[0].ai.state, AiState::Orbiting);
    // Out of its own detection range, so it keeps responding.
    assert_eq!(agents[1].ai.state, AiState::Responding);
    let ally = sentinel_memory(&agents[1]);
    assert_eq!(ally.response_position, Some(player_position));
    assert_eq!(ally.leader, Some(EntityId(1)));
    assert!(ally.response_timer_ms > 0.0);
}

#[test]
fn test_sentinel_volley_is_staggered() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(500.0, 0.0));
    let mut agents = vec![
        make_agent(1, FactionTag::Sentinel, DVec2::ZERO),
        make_agent(2, FactionTag::Sentinel, DVec2::new(100.0, 0.0)),
    ];
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    assert!(agents.iter().all(|a| a.ai.state == AiState::Orbiting));
    let shots = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyShootRequest { .. }))
        .count();
    assert_eq!(shots, 1);
}

#[test]
fn test_sentinels_far_apart_form_separate_groups() {
    let world = TestWorld::default();
    let mut agents = vec![
        make_agent(1, FactionTag::Sentinel, DVec2::ZERO),
        make_agent(2, FactionTag::Sentinel, DVec2::new(1000.0, 0.0)),
    ];
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    let a = sentinel_memory(&agents[0]);
    let b = sentinel_memory(&agents[1]);
    assert_ne!(a.group_id, b.group_id);
    assert_eq!(b.leader, Some(EntityId(2)));
    assert_eq!(agents[1].ai.state, AiState::Patrolling);
}

#[test]
fn test_sentinel_holds_stand_off_distance() {
    let profile = get_profile(FactionTag::Sentinel).unwrap();
    let full = profile.max_accel * profile.mass;
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    // Too close: pushed out, away from the target at +x.
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(100.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Sentinel, DVec2::ZERO)];
    let mut events = Vec::new();
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[0].ai.state, AiState::Orbiting);
    assert_abs_diff_eq!(agents[0].force.x, -full, epsilon = 1e-9);

    // Too far: pulled in.
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(600.0, 0.0));
    let mut agents = vec![make_agent(1, FactionTag::Sentinel, DVec2::ZERO)];
    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[0].ai.state, AiState::Orbiting);
    assert_abs_diff_eq!(agents[0].force.x, full, epsilon = 1e-9);

    // Either way the orbit strafe is the same.
    let strafe = SentinelTuning::default().orbit_strafe * full;
    assert_abs_diff_eq!(agents[0].force.y.abs(), strafe, epsilon = 1e-9);
}

#[test]
fn test_sentinel_follower_holds_ring_slot_around_leader() {
    let world = TestWorld::default();
    let leader_position = DVec2::ZERO;
    let follower_position = DVec2::new(100.0, 0.0);
    let mut agents = vec![
        make_agent(1, FactionTag::Sentinel, leader_position),
        make_agent(2, FactionTag::Sentinel, follower_position),
    ];
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);

    let follower = sentinel_memory(&agents[1]);
    assert_eq!(follower.leader, Some(EntityId(1)));
    assert_eq!(agents[1].ai.state, AiState::Patrolling);
    // Two members: the follower sits opposite the leader's slot.
    let radius = FORMATION_BASE_RADIUS + FORMATION_RADIUS_PER_MEMBER * 2.0;
    assert_abs_diff_eq!(follower.formation_offset.x, -radius, epsilon = 1e-9);
    assert_abs_diff_eq!(follower.formation_offset.y, 0.0, epsilon = 1e-9);

    let anchor = leader_position + follower.formation_offset;
    let expected = (anchor - follower_position).normalize();
    let heading = agents[1].force.normalize();
    assert_abs_diff_eq!(heading.x, expected.x, epsilon = 1e-9);
    assert_abs_diff_eq!(heading.y, expected.y, epsilon = 1e-9);
}

#[test]
fn test_sentinel_response_times_out_to_patrol() {
    let mut world = TestWorld::default();
    world.add_player(DVec2::new(340.0, 0.0));
    let mut agents = vec![
        make_agent(1, FactionTag::Sentinel, DVec2::ZERO),
        make_agent(2, FactionTag::Sentinel, DVec2::new(-390.0, 0.0)),
    ];
    let mut behavior = SentinelBehavior::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();

    tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    assert_eq!(agents[1].ai.state, AiState::Responding);

    // The threat leaves; no further backup calls.
    world.player = None;
    let duration = SentinelTuning::default().response_duration_ms;
    let still_responding = ((duration - 10.0 * DT_MS) / DT_MS) as usize;
    for _ in 0..still_responding {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
        assert_eq!(agents[1].ai.state, AiState::Responding);
    }
    for _ in 0..20 {
        tick(&mut behavior, &mut agents, &world, DT_MS, &mut events, &mut rng);
    }

    assert_eq!(agents[1].ai.state, AiState::Patrolling);
    assert!(sentinel_memory(&agents[1]).response_position.is_none());
}

// --- Coordinator ---

#[test]
fn test_coordinator_skips_unknown_and_reserved_factions() {
    let world = TestWorld::default();
    let mut coordinator = AiCoordinator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut events = Vec::new();

    let mut stray = make_agent(1, FactionTag::Swarm, DVec2::ZERO);
    stray.ai.faction = FactionTag::Unknown;
    let mut neutral = make_agent(2, FactionTag::Swarm, DVec2::ZERO);
    neutral.ai.faction = FactionTag::Neutral;
    let swarm = make_agent(3, FactionTag::Swarm, DVec2::new(50.0, 50.0));

    for _ in 0..2 {
        let agents = vec![stray.clone(), neutral.clone(), swarm.clone()];
        let mut ctx = AiContext {
            query: &world,
            events: &mut events,
            rng: &mut rng,
            elapsed_ms: 0.0,
        };
        let out = coordinator.update(agents, DT_MS, &mut ctx);
        assert_eq!(out.len(), 3);

        let by_id = |id: u64| out.iter().find(|a| a.id == EntityId(id)).unwrap();
        assert!(by_id(1).ai.memory.is_none());
        assert_eq!(by_id(1).force, DVec2::ZERO);
        assert!(by_id(2).ai.memory.is_none());
        assert!(matches!(by_id(3).ai.memory, Some(FactionMemory::Swarm(_))));
    }
    assert_eq!(coordinator.warned_count(), 1);

    coordinator.forget(EntityId(1));
    assert_eq!(coordinator.warned_count(), 0);
}

#[test]
fn test_coordinator_dispatches_every_hostile_faction() {
    let mut coordinator = AiCoordinator::default();
    for faction in FactionTag::HOSTILE {
        assert_eq!(coordinator.behavior_for(faction).map(|b| b.faction()), Some(faction));
    }
    assert!(coordinator.behavior_for(FactionTag::Player).is_none());
}
