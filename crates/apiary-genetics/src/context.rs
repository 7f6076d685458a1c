//! World context supplied by the host
//!
//! Breeding needs two things from the world it runs in: its random source
//! and the biome categories at a position. Hosts implement
//! [`BreedingContext`]; [`SimulatedWorld`] and [`ScriptedContext`] cover
//! standalone use and tests.

use crate::rng::WorldRng;
use ahash::HashMap;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Block position in the world
pub type Position = glam::IVec3;

bitflags! {
    /// Biome category tags at a location
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BiomeCategories: u32 {
        const HOT = 1 << 0;
        const COLD = 1 << 1;
        const WET = 1 << 2;
        const DRY = 1 << 3;
        const FOREST = 1 << 4;
        const PLAINS = 1 << 5;
        const MOUNTAIN = 1 << 6;
        const HILLS = 1 << 7;
        const SWAMP = 1 << 8;
        const JUNGLE = 1 << 9;
        const OCEAN = 1 << 10;
        const RIVER = 1 << 11;
        const BEACH = 1 << 12;
        const SNOWY = 1 << 13;
        const SANDY = 1 << 14;
        const MUSHROOM = 1 << 15;
        const NETHER = 1 << 16;
        const END = 1 << 17;
    }
}

impl BiomeCategories {
    /// Lower-case names of the set categories
    pub fn names(&self) -> Vec<String> {
        self.iter_names().map(|(name, _)| name.to_lowercase()).collect()
    }

    /// Parse a single category name, case-insensitively
    pub fn from_name_ignore_case(name: &str) -> Option<Self> {
        Self::from_name(&name.to_uppercase())
    }
}

/// Capabilities breeding needs from the host world
pub trait BreedingContext {
    /// Uniform draw in [0.0, 1.0) from the world's shared random source
    fn random_float(&mut self) -> f32;

    /// Biome categories at a position
    fn biome_categories_at(&self, position: Position) -> BiomeCategories;
}

/// Standalone world: a random source plus a biome map
pub struct SimulatedWorld<R: WorldRng> {
    rng: R,
    default_biome: BiomeCategories,
    biomes: HashMap<Position, BiomeCategories>,
}

impl<R: WorldRng> SimulatedWorld<R> {
    /// Create a world whose every position has `default_biome`
    pub fn new(rng: R, default_biome: BiomeCategories) -> Self {
        Self {
            rng,
            default_biome,
            biomes: HashMap::default(),
        }
    }

    /// Override the biome at one position
    pub fn set_biome(&mut self, position: Position, categories: BiomeCategories) {
        self.biomes.insert(position, categories);
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: WorldRng> BreedingContext for SimulatedWorld<R> {
    fn random_float(&mut self) -> f32 {
        self.rng.gen_f32()
    }

    fn biome_categories_at(&self, position: Position) -> BiomeCategories {
        self.biomes
            .get(&position)
            .copied()
            .unwrap_or(self.default_biome)
    }
}

/// Context that replays a fixed sequence of draws, for tests and replays
pub struct ScriptedContext {
    draws: VecDeque<f32>,
    /// Returned once the script runs out
    fallback: f32,
    biome: BiomeCategories,
    consumed: usize,
}

impl ScriptedContext {
    pub fn new(draws: impl IntoIterator<Item = f32>, biome: BiomeCategories) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.999,
            biome,
            consumed: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of draws taken so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Draws left in the script
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl BreedingContext for ScriptedContext {
    fn random_float(&mut self) -> f32 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(self.fallback)
    }

    fn biome_categories_at(&self, _position: Position) -> BiomeCategories {
        self.biome
    }
}
