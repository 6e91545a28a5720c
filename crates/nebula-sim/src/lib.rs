//! Simulation host for NEBULA.
//!
//! Owns the hecs ECS world, drives the faction AI and wave scheduler at a
//! fixed tick rate, and produces `ArenaSnapshot`s for outside collaborators.

pub mod config;
pub mod engine;
pub mod ids;
pub mod systems;
pub mod world_setup;

pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use nebula_core as core;
