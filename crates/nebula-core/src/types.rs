//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

pub use glam::DVec2;

use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH, DT_MS};

/// Opaque entity identifier shared between the AI core and its host world.
///
/// The host decides how ids map onto its own storage; the core only compares
/// and copies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Milliseconds per tick at the fixed tick rate.
    pub fn dt_ms(&self) -> f64 {
        DT_MS
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.advance_by(self.dt_ms());
    }

    /// Advance by one tick that covered `dt_ms` of simulated time.
    pub fn advance_by(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }
}

/// Rectangular play area, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether a point lies inside the arena, padded outward by `margin`.
    pub fn contains(&self, point: DVec2, margin: f64) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x <= self.width + margin
            && point.y <= self.height + margin
    }

    /// Clamp a point into the arena, keeping `inset` away from every edge.
    pub fn clamp(&self, point: DVec2, inset: f64) -> DVec2 {
        let inset_x = inset.min(self.width * 0.5);
        let inset_y = inset.min(self.height * 0.5);
        DVec2::new(
            point.x.clamp(inset_x, self.width - inset_x),
            point.y.clamp(inset_y, self.height - inset_y),
        )
    }
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Heading of a vector in radians (0 = +x, counter-clockwise toward +y).
pub fn heading_of(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}
