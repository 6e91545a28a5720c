//! Spawn position patterns.
//!
//! Every pattern returns exactly `count` positions inside the arena.

use std::f64::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use nebula_core::types::{ArenaBounds, DVec2};

/// Distance between neighboring slots in a hex cluster.
pub const CLUSTER_SPACING: f64 = 40.0;

/// Distance of an edge line from its edge.
pub const EDGE_INSET: f64 = 100.0;

/// Distance between neighbors on an edge line.
pub const LINE_SPACING: f64 = 80.0;

/// Keep-out band along every arena edge for random points.
pub const SPAWN_INSET: f64 = 50.0;

/// Fraction of a grid sector kept clear on each side.
pub const SECTOR_PADDING: f64 = 0.15;

/// Tight hexagonal-ring cluster around one random point.
///
/// Slot 0 is the center; ring `r` holds `6r` evenly spaced slots at radius
/// `r × CLUSTER_SPACING`.
pub fn cluster<R: Rng + ?Sized>(count: usize, bounds: &ArenaBounds, rng: &mut R) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }
    let extent = cluster_rings(count) as f64 * CLUSTER_SPACING + SPAWN_INSET;
    let center = random_point(bounds, extent, rng);

    let mut positions = Vec::with_capacity(count);
    positions.push(center);
    let mut ring = 1usize;
    while positions.len() < count {
        let slots = 6 * ring;
        let radius = ring as f64 * CLUSTER_SPACING;
        for slot in 0..slots {
            if positions.len() == count {
                break;
            }
            let angle = TAU * slot as f64 / slots as f64;
            positions.push(bounds.clamp(center + DVec2::from_angle(angle) * radius, SPAWN_INSET));
        }
        ring += 1;
    }
    positions
}

/// Rings needed to hold `count` slots (the center counts as ring 0).
fn cluster_rings(count: usize) -> usize {
    let mut rings = 0;
    let mut capacity = 1;
    while capacity < count {
        rings += 1;
        capacity += 6 * rings;
    }
    rings
}

/// Evenly spaced line parallel to one random edge, centered on that edge.
pub fn edge_line<R: Rng + ?Sized>(count: usize, bounds: &ArenaBounds, rng: &mut R) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }
    let center = bounds.center();
    let (anchor, along) = match rng.gen_range(0..4) {
        0 => (DVec2::new(center.x, EDGE_INSET), DVec2::X),
        1 => (DVec2::new(bounds.width - EDGE_INSET, center.y), DVec2::Y),
        2 => (DVec2::new(center.x, bounds.height - EDGE_INSET), DVec2::X),
        _ => (DVec2::new(EDGE_INSET, center.y), DVec2::Y),
    };
    let middle = (count as f64 - 1.0) * 0.5;
    (0..count)
        .map(|i| bounds.clamp(anchor + along * (i as f64 - middle) * LINE_SPACING, SPAWN_INSET))
        .collect()
}

/// Independent uniformly random points.
pub fn scattered<R: Rng + ?Sized>(count: usize, bounds: &ArenaBounds, rng: &mut R) -> Vec<DVec2> {
    (0..count).map(|_| random_point(bounds, SPAWN_INSET, rng)).collect()
}

/// One point per distinct grid sector.
///
/// The arena is split into `g × g` sectors with `g = ⌈√count⌉`; sectors are
/// shuffled and the first `count` each receive one padded random point.
pub fn sectors<R: Rng + ?Sized>(count: usize, bounds: &ArenaBounds, rng: &mut R) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }
    let grid = sector_grid(count);
    let cell = DVec2::new(bounds.width / grid as f64, bounds.height / grid as f64);

    let mut cells: Vec<(usize, usize)> = (0..grid)
        .flat_map(|row| (0..grid).map(move |col| (col, row)))
        .collect();
    cells.shuffle(rng);

    cells
        .into_iter()
        .take(count)
        .map(|(col, row)| {
            let origin = DVec2::new(col as f64 * cell.x, row as f64 * cell.y);
            let pad = cell * SECTOR_PADDING;
            let x = rng.gen_range(pad.x..=cell.x - pad.x);
            let y = rng.gen_range(pad.y..=cell.y - pad.y);
            origin + DVec2::new(x, y)
        })
        .collect()
}

/// Sector grid side length for `count` points.
pub fn sector_grid(count: usize) -> usize {
    (count as f64).sqrt().ceil().max(1.0) as usize
}

fn random_point<R: Rng + ?Sized>(bounds: &ArenaBounds, inset: f64, rng: &mut R) -> DVec2 {
    let inset_x = inset.min(bounds.width * 0.5);
    let inset_y = inset.min(bounds.height * 0.5);
    DVec2::new(
        rng.gen_range(inset_x..=bounds.width - inset_x),
        rng.gen_range(inset_y..=bounds.height - inset_y),
    )
}
