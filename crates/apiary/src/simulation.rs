//! Multi-generation breeding in a simulated world
//!
//! Founders are the species nothing mutates into. Every generation pairs
//! random members of the population, breeds them through the species root
//! and keeps up to `population` offspring. Trackers are loaded from and
//! saved back to the configured directory so discoveries accumulate
//! across runs.

use crate::config::{CreatureKind, SimulatorConfig};
use anyhow::{Context, Result};
use apiary_core::apiary_genetics::{
    AlleleRegistry, ChromosomeSlot, Individual, Position, SimulatedWorld, TrackerStore,
};
use apiary_core::{register_default_bees, register_default_trees, BeeRoot, SpeciesRoot, TreeRoot};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;
use std::path::PathBuf;

type World = SimulatedWorld<Xoshiro256StarStar>;

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub root: String,
    pub mode: String,
    pub generations: u32,
    pub births: u64,
    pub final_population: usize,
    /// Species uids discovered by the credited player, sorted
    pub discovered_species: Vec<String>,
    /// Mutation keys discovered by the credited player, sorted
    pub discovered_mutations: Vec<String>,
    /// Tracker files written
    pub tracker_files: Vec<PathBuf>,
}

impl SimulationReport {
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, Default::default()).context("Failed to serialize report")
    }
}

/// Run the configured simulation; `mode_override` replaces the saved mode
pub fn run(config: &SimulatorConfig, mode_override: Option<&str>) -> Result<SimulationReport> {
    let mut registry = AlleleRegistry::new();
    match config.simulation.kind {
        CreatureKind::Bees => {
            let mut root = BeeRoot::bees();
            register_default_bees(&mut registry, &mut root)
                .context("Failed to register built-in bees")?;
            simulate(config, mode_override, &registry, root)
        }
        CreatureKind::Trees => {
            let mut root = TreeRoot::trees();
            register_default_trees(&mut registry, &mut root)
                .context("Failed to register built-in trees")?;
            simulate(config, mode_override, &registry, root)
        }
    }
}

fn simulate<C: ChromosomeSlot>(
    config: &SimulatorConfig,
    mode_override: Option<&str>,
    registry: &AlleleRegistry,
    mut root: SpeciesRoot<C>,
) -> Result<SimulationReport> {
    let tracker_dir = &config.output.tracker_dir;
    let trackers = TrackerStore::load_from_dir(root.uid(), tracker_dir)
        .with_context(|| format!("Failed to load trackers from {:?}", tracker_dir))?;
    root.set_trackers(trackers);
    root.set_default_mode(&config.breeding.mode);
    root.set_shuffle_mutations(config.simulation.shuffle_mutations);
    let mode = match mode_override {
        Some(name) => root.set_mode(name)?.name().to_string(),
        None => root.active_mode()?.name().to_string(),
    };

    let mut world = World::new(
        Xoshiro256StarStar::seed_from_u64(config.simulation.seed),
        config.biome_categories()?,
    );
    let position = Position::new(0, config.world.altitude, 0);
    let player = config.player();

    let mut population = founders(&root);
    log::info!(
        "Simulating {} generations of {} in mode '{}' from {} founders",
        config.simulation.generations,
        root.uid(),
        mode,
        population.len()
    );

    let births_before = births(&root, player);
    for generation in 0..config.simulation.generations {
        let next = breed_generation(
            &mut root,
            registry,
            &mut world,
            position,
            &population,
            config,
        )?;
        log::debug!(
            "Generation {}: {} offspring from {} parents",
            generation + 1,
            next.len(),
            population.len()
        );
        // A barren generation keeps its parents
        if !next.is_empty() {
            population = next;
        }
    }

    let tracker_files = root
        .trackers()
        .save_to_dir(tracker_dir)
        .with_context(|| format!("Failed to save trackers to {:?}", tracker_dir))?;

    let tracker = root.trackers().get(player);
    Ok(SimulationReport {
        root: root.uid().to_string(),
        mode,
        generations: config.simulation.generations,
        births: births(&root, player) - births_before,
        final_population: population.len(),
        discovered_species: tracker
            .map(|t| t.discovered_species().map(str::to_string).collect())
            .unwrap_or_default(),
        discovered_mutations: tracker
            .map(|t| t.discovered_mutations().map(str::to_string).collect())
            .unwrap_or_default(),
        tracker_files,
    })
}

fn births<C: ChromosomeSlot>(root: &SpeciesRoot<C>, player: Option<&str>) -> u64 {
    root.trackers().get(player).map_or(0, |t| t.births())
}

/// Species templates that no mutation produces
fn founders<C: ChromosomeSlot>(root: &SpeciesRoot<C>) -> Vec<Individual<C>> {
    root.individual_templates()
        .iter()
        .filter(|individual| {
            root.mutations()
                .paths_to(individual.genome().primary())
                .next()
                .is_none()
        })
        .cloned()
        .collect()
}

fn breed_generation<C: ChromosomeSlot>(
    root: &mut SpeciesRoot<C>,
    registry: &AlleleRegistry,
    world: &mut World,
    position: Position,
    population: &[Individual<C>],
    config: &SimulatorConfig,
) -> Result<Vec<Individual<C>>> {
    let mut next = Vec::with_capacity(config.simulation.population);
    if population.is_empty() {
        return Ok(next);
    }

    for _ in 0..config.simulation.population {
        let mut parent = population[world.rng_mut().gen_range(0..population.len())].clone();
        let mate = &population[world.rng_mut().gen_range(0..population.len())];
        parent.mate(mate);

        let offspring = root.breed(
            registry,
            world,
            position,
            &parent,
            config.player(),
            config.simulation.fertility_modifier,
        )?;
        next.extend(offspring.into_iter().map(|child| child.individual));
    }
    next.truncate(config.simulation.population);
    Ok(next)
}
