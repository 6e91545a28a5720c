//! Faction AI for NEBULA.
//!
//! Implements the four faction behaviors, the shared behavior traits they
//! are composed from, and the coordinator that dispatches to them.
//! No ECS dependency: behaviors operate on [`agent::Agent`] working copies
//! and read the world through [`agent::SpatialQuery`].

pub mod agent;
pub mod behaviors;
pub mod coordinator;
pub mod memory;
pub mod profiles;
pub mod steering;
pub mod traits;

pub use agent::{Agent, AiContext, SpatialQuery};
pub use coordinator::AiCoordinator;
pub use nebula_core as core;

#[cfg(test)]
mod tests;
