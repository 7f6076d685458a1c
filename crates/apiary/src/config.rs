//! Simulator configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `apiary.ron` file (if exists)
//! 3. Environment variables prefixed with `APIARY_`
//!
//! Example environment variable: `APIARY_SIMULATION__GENERATIONS=50`

use anyhow::{bail, Context, Result};
use apiary_core::apiary_genetics::BiomeCategories;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub breeding: BreedingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which species root to simulate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CreatureKind {
    #[default]
    Bees,
    Trees,
}

/// Population settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed of the world's random source
    pub seed: u64,
    pub generations: u32,
    /// Maximum number of individuals kept per generation
    pub population: usize,
    /// Try matching mutations in random order instead of registration order
    pub shuffle_mutations: bool,
    pub kind: CreatureKind,
    /// Extra fertility factor, e.g. from housing
    pub fertility_modifier: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            generations: 20,
            population: 16,
            shuffle_mutations: false,
            kind: CreatureKind::Bees,
            fertility_modifier: 1.0,
        }
    }
}

/// Where the simulated population lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Comma-separated biome categories, e.g. "forest,hills"
    pub biomes: String,
    pub altitude: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            biomes: "forest".to_string(),
            altitude: 64,
        }
    }
}

/// Breeding rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingConfig {
    /// Mode used when the saved trackers do not name one
    pub mode: String,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            mode: "normal".to_string(),
        }
    }
}

/// Tracker persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub tracker_dir: PathBuf,
    /// Player credited with births and discoveries; the common tracker if unset
    #[serde(default)]
    pub player: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tracker_dir: PathBuf::from("trackers"),
            player: None,
        }
    }
}

impl SimulatorConfig {
    /// Load configuration with `apiary.ron` in the working directory as the
    /// file layer
    pub fn load() -> Result<Self> {
        Self::load_with(File::with_name("apiary").format(FileFormat::Ron).required(false))
    }

    /// Load configuration with an explicit file layer
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_with(File::from(path).format(FileFormat::Ron).required(false))
    }

    fn load_with(file: File<config::FileSourceFile, FileFormat>) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("simulation.seed", 0x5eed_i64)?
            .set_default("simulation.generations", 20_i64)?
            .set_default("simulation.population", 16_i64)?
            .set_default("simulation.shuffle_mutations", false)?
            .set_default("simulation.kind", "bees")?
            .set_default("simulation.fertility_modifier", 1.0)?
            .set_default("world.biomes", "forest")?
            .set_default("world.altitude", 64_i64)?
            .set_default("breeding.mode", "normal")?
            .set_default("output.tracker_dir", "trackers")?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(file)
            // Layer 3: Environment variables (APIARY_WORLD__BIOMES, etc.)
            .add_source(Environment::with_prefix("APIARY").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Parse the configured biome list
    pub fn biome_categories(&self) -> Result<BiomeCategories> {
        let mut categories = BiomeCategories::empty();
        for name in self.world.biomes.split([',', '|']).map(str::trim) {
            if name.is_empty() {
                continue;
            }
            let Some(category) = BiomeCategories::from_name_ignore_case(name) else {
                bail!("Unknown biome category '{}'", name);
            };
            categories |= category;
        }
        Ok(categories)
    }

    pub fn player(&self) -> Option<&str> {
        self.output.player.as_deref().filter(|p| !p.is_empty())
    }
}
