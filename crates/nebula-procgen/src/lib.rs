//! Procedural wave generation for NEBULA.
//!
//! Turns a wave number into an enemy composition, a tactical spawn layout
//! per faction, and the pacing and strength numbers the scheduler needs.

pub mod layout;
pub mod wave;

pub use wave::{GrowthCurve, SpawnEntry, WaveConfig, WaveError, WaveGenerator, WaveTuning};
