//! NEBULA command-line host.
//!
//! Wires the simulation engine to a fixed-rate game loop and a headless
//! batch runner.

pub mod logging;
pub mod runner;

pub use nebula_core as core;
