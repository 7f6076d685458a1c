//! Apiary Genetics - alleles, genomes, mutations and breeding trackers
//!
//! This crate is the creature-agnostic breeding core. Creature kinds plug
//! in by defining a [`ChromosomeSlot`] karyotype; the host world plugs in
//! through [`BreedingContext`].
//!
//! Registries and tables are built once at startup and then shared by
//! reference. Nothing here is thread-safe; embedders that breed from
//! several threads must serialize access themselves.

pub mod allele;
pub mod chromosome;
pub mod condition;
pub mod context;
pub mod error;
pub mod genome;
pub mod individual;
pub mod inheritance;
pub mod mutation;
pub mod registry;
pub mod rng;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use allele::{Allele, AlleleValue, FruitTraits, SpeciesKind, SpeciesTraits};
pub use chromosome::{Chromosome, ChromosomeSlot};
pub use condition::MutationCondition;
pub use context::{BiomeCategories, BreedingContext, Position, ScriptedContext, SimulatedWorld};
pub use error::{GeneticsError, Result};
pub use genome::{Genome, GenomeSnapshot, Template};
pub use individual::{Individual, IndividualSnapshot, Offspring};
pub use inheritance::{Derivation, Inheritance};
pub use mutation::{Mutation, MutationOutcome, MutationQuery, MutationTable};
pub use registry::AlleleRegistry;
pub use rng::WorldRng;
pub use tracker::{BreedingTracker, TrackerStore, COMMON_KEY};
