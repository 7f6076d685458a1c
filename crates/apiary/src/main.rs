use apiary::{CreatureKind, SimulatorConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (default: apiary.ron in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Creature kind to breed
    #[arg(long, value_enum)]
    kind: Option<CreatureKind>,

    /// Seed of the world's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations to breed
    #[arg(long)]
    generations: Option<u32>,

    /// Population size per generation
    #[arg(long)]
    population: Option<usize>,

    /// Comma-separated biome categories of the breeding site, e.g. forest,hills
    #[arg(long)]
    biomes: Option<String>,

    /// Altitude (y) of the breeding site
    #[arg(long)]
    altitude: Option<i32>,

    /// Breeding mode to switch to: easy, normal, hard, hardcore, insane
    #[arg(long)]
    mode: Option<String>,

    /// Try mutations in random order
    #[arg(long)]
    shuffle_mutations: bool,

    /// Player credited with discoveries
    #[arg(long)]
    player: Option<String>,

    /// Directory for breeding tracker files
    #[arg(long)]
    tracker_dir: Option<PathBuf>,

    /// List breeding modes and exit
    #[arg(long)]
    list_modes: bool,
}

impl Args {
    /// Command-line values take priority over every config layer
    fn apply(&self, config: &mut SimulatorConfig) {
        if let Some(kind) = self.kind {
            config.simulation.kind = kind;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(generations) = self.generations {
            config.simulation.generations = generations;
        }
        if let Some(population) = self.population {
            config.simulation.population = population;
        }
        if let Some(biomes) = &self.biomes {
            config.world.biomes = biomes.clone();
        }
        if let Some(altitude) = self.altitude {
            config.world.altitude = altitude;
        }
        if self.shuffle_mutations {
            config.simulation.shuffle_mutations = true;
        }
        if let Some(player) = &self.player {
            config.output.player = Some(player.clone());
        }
        if let Some(dir) = &self.tracker_dir {
            config.output.tracker_dir = dir.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_modes {
        for mode in apiary_core::ModeRegistry::with_defaults().modes() {
            println!("{}: {}", mode.name(), mode.description().join(" "));
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load_from(path)?,
        None => SimulatorConfig::load()?,
    };
    args.apply(&mut config);

    log::info!("Starting Apiary");
    let report = apiary::run(&config, args.mode.as_deref())?;

    log::info!(
        "{} births, {} species and {} mutations discovered",
        report.births,
        report.discovered_species.len(),
        report.discovered_mutations.len()
    );
    println!("{}", report.to_ron()?);
    Ok(())
}
