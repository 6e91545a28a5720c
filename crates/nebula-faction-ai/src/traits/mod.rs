//! Reusable behavior traits composed into the faction behaviors.
//!
//! Each trait is a small, near-stateless strategy: it holds tuning only and
//! reads the world through [`crate::agent::SpatialQuery`].

pub mod flocking;
pub mod formation;
pub mod gravity;
pub mod shooting;
pub mod targeting;

pub use flocking::{Flocking, Neighbor};
pub use formation::assign_formation_positions;
pub use gravity::{avoidance_magnitude, calculate_avoidance, detect_gravity_sources, vortex_emergency, GravityHazard};
pub use shooting::Shooting;
pub use targeting::{TargetCandidate, Targeting};
