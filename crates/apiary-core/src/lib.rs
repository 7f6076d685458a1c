//! Apiary Core - bee and tree species built on the genetics core
//!
//! Each creature kind gets a [`SpeciesRoot`] that owns its templates,
//! mutations, breeding modes and trackers. [`defaults`] registers the
//! built-in catalog.

pub mod bee;
pub mod defaults;
pub mod fruit;
pub mod mode;
pub mod sapling;
pub mod species_root;
pub mod tree;

pub use bee::{Bee, BeeChromosome, BeeRoot, BeeStack, BeeType};
pub use defaults::{register_default_bees, register_default_trees, BeeSpecies, TreeSpecies};
pub use mode::{BreedingMode, ModeModifiers, ModeRegistry};
pub use sapling::{Growth, Sapling, SaplingState, TreeGrower};
pub use species_root::SpeciesRoot;
pub use tree::{Tree, TreeChromosome, TreeRoot, TreeTraits};

// Re-export the genetics core so hosts only need one dependency
pub use apiary_genetics;
