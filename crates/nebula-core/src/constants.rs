//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Arena ---

/// Default arena width in world units.
pub const ARENA_WIDTH: f64 = 4000.0;

/// Default arena height in world units.
pub const ARENA_HEIGHT: f64 = 4000.0;

/// Distance outside the arena at which entities are culled.
pub const OOB_MARGIN: f64 = 400.0;

// --- Targeting ---

/// Priority assigned to the player as a target candidate.
pub const PLAYER_TARGET_PRIORITY: f64 = 1.0;

/// Priority assigned to an enemy of another faction.
pub const RIVAL_TARGET_PRIORITY: f64 = 0.8;

/// Default target acquisition range when a behavior does not override it.
pub const DEFAULT_TARGET_RANGE: f64 = 900.0;

// --- Shooting ---

/// Projectile speed assumed for lead prediction and projectile spawning.
pub const ENEMY_PROJECTILE_SPEED: f64 = 600.0;

/// Lifetime of an enemy projectile (ms).
pub const ENEMY_PROJECTILE_LIFETIME_MS: f64 = 2500.0;

/// Collision radius of a projectile.
pub const PROJECTILE_RADIUS: f64 = 4.0;

// --- Gravity hazards ---

/// Hazards are considered when the entity is within this multiple of their
/// influence radius.
pub const HAZARD_DETECTION_FACTOR: f64 = 1.5;

/// Upper bound on hazard search distance (largest influence radius × factor).
pub const HAZARD_SCAN_RADIUS: f64 = 1500.0;

/// Hard danger margin added to a planet's body radius.
pub const PLANET_DANGER_MARGIN: f64 = 80.0;

/// Hard danger margin added to a vortex's event horizon.
pub const VORTEX_DANGER_MARGIN: f64 = 150.0;

/// Peak ramp magnitude just outside a planet's danger zone.
pub const PLANET_AVOID_FORCE: f64 = 0.6;

/// Panic magnitude inside a planet's danger zone.
pub const PLANET_PANIC_FORCE: f64 = 1.0;

/// Peak ramp magnitude just outside a vortex's danger zone.
pub const VORTEX_AVOID_FORCE: f64 = 1.2;

/// Panic magnitude inside a vortex's danger zone.
pub const VORTEX_PANIC_FORCE: f64 = 2.0;

/// Steepness of the vortex exponential falloff.
pub const VORTEX_FALLOFF: f64 = 3.0;

/// Converts a unit avoidance magnitude into a steering force per unit mass.
pub const AVOIDANCE_FORCE_SCALE: f64 = 400.0;

// --- Formation ---

/// Base ring radius for circle formations.
pub const FORMATION_BASE_RADIUS: f64 = 80.0;

/// Ring radius growth per formation member.
pub const FORMATION_RADIUS_PER_MEMBER: f64 = 15.0;

/// Spacing between members of a line formation.
pub const FORMATION_LINE_SPACING: f64 = 60.0;

// --- Waves ---

/// Delay between a boss wave completing and the boss phase signal (ms).
pub const BOSS_PHASE_DELAY_MS: f64 = 2000.0;

/// Every Nth wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Default pause between a wave completing and the next one starting (ms).
pub const INTER_WAVE_DELAY_MS: f64 = 3000.0;

// --- Hazard layout ---

/// Default number of planets placed in the arena.
pub const DEFAULT_PLANET_COUNT: u32 = 3;

/// Default number of vortices placed in the arena.
pub const DEFAULT_VORTEX_COUNT: u32 = 1;

/// Planet influence radius relative to its body radius.
pub const PLANET_INFLUENCE_FACTOR: f64 = 3.5;

/// Vortex influence radius relative to its event horizon.
pub const VORTEX_INFLUENCE_FACTOR: f64 = 6.0;

// --- Player ---

/// Player collision radius.
pub const PLAYER_RADIUS: f64 = 20.0;

/// Player maximum health.
pub const PLAYER_MAX_HEALTH: f64 = 100.0;
