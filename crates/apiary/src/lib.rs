//! Apiary - command-line breeding simulator
//!
//! Loads a [`config::SimulatorConfig`], breeds a population of built-in
//! bees or trees for a number of generations and persists the breeding
//! trackers.

pub mod config;
pub mod simulation;

pub use config::{CreatureKind, SimulatorConfig};
pub use simulation::{run, SimulationReport};
