//! Core types and definitions for the NEBULA arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, faction memory, commands, events, snapshots, and constants.
//! It has no dependency on an ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod memory;
pub mod state;
pub mod types;
