//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only). Persistent state lives in components, or in the engine for
//! the wave scheduler and AI coordinator.

pub mod cleanup;
pub mod faction_ai;
pub mod gravity;
pub mod movement;
pub mod requests;
pub mod snapshot;
pub mod vitals;
pub mod wave_spawner;
pub mod weapons;
