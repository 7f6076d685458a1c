//! Built-in alleles, species and mutations
//!
//! Registration order matters: the first species of each kind becomes the
//! default template that fills unset slots of the others, and mutations are
//! evaluated in the order they are added here.

use crate::bee::{BeeChromosome, BeeRoot};
use crate::fruit::{pod_provider, random_provider};
use crate::species_root::SpeciesRoot;
use crate::tree::{TreeChromosome, TreeRoot};
use apiary_genetics::{
    Allele, AlleleRegistry, BiomeCategories, ChromosomeSlot, FruitTraits, Mutation,
    MutationCondition, Result, SpeciesKind, Template,
};

/// Register `allele` unless an allele with its identifier already exists.
/// Booleans are shared between bees and trees.
fn register_shared(registry: &mut AlleleRegistry, allele: Allele) -> Result<()> {
    if !registry.contains(allele.uid()) {
        registry.register(allele)?;
    }
    Ok(())
}

fn shared_alleles() -> Vec<Allele> {
    vec![
        Allele::boolean("forestry.boolTrue", "Yes", false, true),
        Allele::boolean("forestry.boolFalse", "No", false, false),
    ]
}

fn bee_alleles() -> Vec<Allele> {
    vec![
        Allele::float("forestry.speedSlowest", "Slowest", true, 0.3),
        Allele::float("forestry.speedSlower", "Slower", true, 0.6),
        Allele::float("forestry.speedNorm", "Normal", false, 1.0),
        Allele::float("forestry.speedFast", "Fast", true, 1.2),
        Allele::integer("forestry.lifespanShorter", "Shorter", true, 20),
        Allele::integer("forestry.lifespanShort", "Short", true, 30),
        Allele::integer("forestry.lifespanNormal", "Normal", true, 40),
        Allele::integer("forestry.lifespanLong", "Long", false, 50),
        Allele::integer("forestry.fertilityLow", "Low", true, 1),
        Allele::integer("forestry.fertilityNormal", "Normal", true, 2),
        Allele::integer("forestry.fertilityHigh", "High", false, 3),
        Allele::integer("forestry.toleranceNone", "None", false, 0),
        Allele::integer("forestry.toleranceBoth1", "Both 1", true, 1),
        Allele::integer("forestry.toleranceBoth2", "Both 2", true, 2),
        Allele::integer("forestry.floweringSlowest", "Slowest", true, 5),
        Allele::integer("forestry.floweringSlow", "Slow", true, 15),
        Allele::integer("forestry.floweringAverage", "Average", false, 20),
        Allele::integer("forestry.territoryAverage", "Average", false, 9),
        Allele::integer("forestry.territoryLarge", "Large", false, 11),
        Allele::effect("forestry.effectNone", "None", true, false),
        Allele::effect("forestry.effectAggressive", "Aggressive", true, true),
        Allele::effect("forestry.effectHeroic", "Heroic", true, true),
    ]
}

fn tree_alleles() -> Vec<Allele> {
    vec![
        Allele::float("forestry.heightSmall", "Small", true, 0.5),
        Allele::float("forestry.heightAverage", "Average", false, 1.0),
        Allele::float("forestry.heightLarge", "Large", false, 1.5),
        Allele::float("forestry.saplingsLowest", "Lowest", true, 0.01),
        Allele::float("forestry.saplingsLow", "Low", true, 0.05),
        Allele::float("forestry.saplingsAverage", "Average", true, 0.1),
        Allele::float("forestry.saplingsHigh", "High", false, 0.25),
        Allele::float("forestry.yieldLowest", "Lowest", true, 0.025),
        Allele::float("forestry.yieldLow", "Low", true, 0.05),
        Allele::float("forestry.yieldAverage", "Average", true, 0.1),
        Allele::float("forestry.sappinessLowest", "Lowest", true, 0.1),
        Allele::float("forestry.sappinessLow", "Low", true, 0.2),
        Allele::float("forestry.sappinessAverage", "Average", true, 0.3),
        Allele::integer("forestry.maturationSlower", "Slower", true, 7),
        Allele::integer("forestry.maturationAverage", "Average", true, 5),
        Allele::integer("forestry.maturationFast", "Fast", true, 3),
        Allele::integer("forestry.i1d", "1x1", true, 1),
        Allele::integer("forestry.i2d", "2x2", true, 2),
        Allele::effect("forestry.leavesNone", "None", true, false),
        Allele::effect("forestry.leavesPollen", "Pollen", true, true),
        Allele::fruit("forestry.fruitNone", "None", true, FruitTraits::none()),
        Allele::fruit(
            "forestry.fruitApple",
            "Apple",
            true,
            random_provider("pomes", "apple", 1.0, 0xff2e2e),
        ),
        Allele::fruit(
            "forestry.fruitCherry",
            "Cherry",
            true,
            pod_provider("prunes", "cherry", 1.0, 0xe691da),
        ),
        Allele::fruit(
            "forestry.fruitWalnut",
            "Walnut",
            true,
            pod_provider("nuts", "walnut", 1.0, 0xc0a86c),
        ),
    ]
}

/// Built-in bee species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeeSpecies {
    Forest,
    Meadows,
    Modest,
    Tropical,
    Common,
    Cultivated,
    Noble,
    Diligent,
    Unweary,
}

impl BeeSpecies {
    pub const ALL: [BeeSpecies; 9] = [
        Self::Forest,
        Self::Meadows,
        Self::Modest,
        Self::Tropical,
        Self::Common,
        Self::Cultivated,
        Self::Noble,
        Self::Diligent,
        Self::Unweary,
    ];

    pub fn uid(self) -> &'static str {
        match self {
            Self::Forest => "forestry.speciesForest",
            Self::Meadows => "forestry.speciesMeadows",
            Self::Modest => "forestry.speciesModest",
            Self::Tropical => "forestry.speciesTropical",
            Self::Common => "forestry.speciesCommon",
            Self::Cultivated => "forestry.speciesCultivated",
            Self::Noble => "forestry.speciesNoble",
            Self::Diligent => "forestry.speciesDiligent",
            Self::Unweary => "forestry.speciesUnweary",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forest => "Forest",
            Self::Meadows => "Meadows",
            Self::Modest => "Modest",
            Self::Tropical => "Tropical",
            Self::Common => "Common",
            Self::Cultivated => "Cultivated",
            Self::Noble => "Noble",
            Self::Diligent => "Diligent",
            Self::Unweary => "Unweary",
        }
    }

    fn dominant(self) -> bool {
        !matches!(self, Self::Modest | Self::Tropical | Self::Noble | Self::Diligent)
    }

    fn allele(self) -> Allele {
        Allele::species(self.uid(), self.name(), self.dominant(), SpeciesKind::Bee)
    }

    /// Slot values differing from the default (Forest) template
    fn traits(self) -> &'static [(BeeChromosome, &'static str)] {
        use BeeChromosome::*;
        match self {
            Self::Forest => &[
                (Speed, "forestry.speedSlowest"),
                (Lifespan, "forestry.lifespanShorter"),
                (Fertility, "forestry.fertilityNormal"),
                (TemperatureTolerance, "forestry.toleranceNone"),
                (NeverSleeps, "forestry.boolFalse"),
                (HumidityTolerance, "forestry.toleranceNone"),
                (ToleratesRain, "forestry.boolFalse"),
                (CaveDwelling, "forestry.boolFalse"),
                (Flowering, "forestry.floweringSlowest"),
                (Territory, "forestry.territoryAverage"),
                (Effect, "forestry.effectNone"),
            ],
            Self::Meadows => &[],
            Self::Modest => &[
                (HumidityTolerance, "forestry.toleranceBoth1"),
                (Speed, "forestry.speedSlower"),
            ],
            Self::Tropical => &[
                (TemperatureTolerance, "forestry.toleranceBoth1"),
                (Effect, "forestry.effectAggressive"),
            ],
            Self::Common => &[(Speed, "forestry.speedSlower")],
            Self::Cultivated => &[
                (Speed, "forestry.speedFast"),
                (Lifespan, "forestry.lifespanShort"),
            ],
            Self::Noble => &[
                (Speed, "forestry.speedSlower"),
                (Fertility, "forestry.fertilityLow"),
                (Lifespan, "forestry.lifespanShort"),
                (Flowering, "forestry.floweringSlow"),
            ],
            Self::Diligent => &[
                (Speed, "forestry.speedSlower"),
                (Lifespan, "forestry.lifespanShort"),
                (Flowering, "forestry.floweringSlow"),
            ],
            Self::Unweary => &[
                (Speed, "forestry.speedSlower"),
                (Lifespan, "forestry.lifespanNormal"),
                (TemperatureTolerance, "forestry.toleranceBoth1"),
                (Flowering, "forestry.floweringAverage"),
                (Territory, "forestry.territoryLarge"),
                (Effect, "forestry.effectHeroic"),
            ],
        }
    }
}

/// Built-in tree species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    Oak,
    Birch,
    Lime,
    Cherry,
    Walnut,
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 5] = [
        Self::Oak,
        Self::Birch,
        Self::Lime,
        Self::Cherry,
        Self::Walnut,
    ];

    pub fn uid(self) -> &'static str {
        match self {
            Self::Oak => "forestry.treeOak",
            Self::Birch => "forestry.treeBirch",
            Self::Lime => "forestry.treeLime",
            Self::Cherry => "forestry.treeCherry",
            Self::Walnut => "forestry.treeWalnut",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Oak => "Oak",
            Self::Birch => "Birch",
            Self::Lime => "Lime",
            Self::Cherry => "Cherry",
            Self::Walnut => "Walnut",
        }
    }

    fn suitable_fruit(self) -> &'static [&'static str] {
        match self {
            Self::Oak => &["pomes"],
            Self::Birch => &[],
            Self::Lime => &["nuts", "prunes"],
            Self::Cherry => &["prunes", "pomes"],
            Self::Walnut => &["nuts"],
        }
    }

    fn allele(self) -> Allele {
        Allele::species(self.uid(), self.name(), true, SpeciesKind::Tree)
            .with_suitable_fruit(self.suitable_fruit())
    }

    /// Slot values differing from the default (Oak) template
    fn traits(self) -> &'static [(TreeChromosome, &'static str)] {
        use TreeChromosome::*;
        match self {
            Self::Oak => &[
                (Height, "forestry.heightSmall"),
                (Fertility, "forestry.saplingsLow"),
                (Fruits, "forestry.fruitApple"),
                (Yield, "forestry.yieldLowest"),
                (Effect, "forestry.leavesNone"),
                (Sappiness, "forestry.sappinessLowest"),
                (Maturation, "forestry.maturationAverage"),
                (Girth, "forestry.i1d"),
                (Fireproof, "forestry.boolFalse"),
            ],
            Self::Birch => &[
                (Fruits, "forestry.fruitNone"),
                (Maturation, "forestry.maturationFast"),
                (Fertility, "forestry.saplingsAverage"),
            ],
            Self::Lime => &[
                (Height, "forestry.heightAverage"),
                (Fruits, "forestry.fruitNone"),
                (Sappiness, "forestry.sappinessLow"),
            ],
            Self::Cherry => &[
                (Fruits, "forestry.fruitCherry"),
                (Yield, "forestry.yieldLow"),
                (Maturation, "forestry.maturationSlower"),
            ],
            Self::Walnut => &[
                (Height, "forestry.heightLarge"),
                (Fruits, "forestry.fruitWalnut"),
                (Yield, "forestry.yieldAverage"),
                (Fertility, "forestry.saplingsLowest"),
                (Girth, "forestry.i2d"),
                (Fireproof, "forestry.boolTrue"),
            ],
        }
    }
}

fn template<C: ChromosomeSlot>(
    registry: &AlleleRegistry,
    species_uid: &str,
    traits: &[(C, &str)],
) -> Result<Template<C>> {
    let mut template = Template::new().with(C::SPECIES, registry.lookup(species_uid)?);
    for (slot, uid) in traits {
        template.set(*slot, registry.lookup(uid)?);
    }
    Ok(template)
}

fn mutation<C: ChromosomeSlot>(
    registry: &AlleleRegistry,
    root: &SpeciesRoot<C>,
    species0: &str,
    species1: &str,
    result: &str,
    chance: f32,
) -> Result<Mutation<C>> {
    Mutation::new(
        registry.lookup(species0)?,
        registry.lookup(species1)?,
        root.template(result)?.clone(),
        chance,
    )
}

/// Register the built-in bee alleles, species templates and mutations
pub fn register_default_bees(registry: &mut AlleleRegistry, root: &mut BeeRoot) -> Result<()> {
    for allele in shared_alleles() {
        register_shared(registry, allele)?;
    }
    for allele in bee_alleles() {
        registry.register(allele)?;
    }
    for species in BeeSpecies::ALL {
        registry.register(species.allele())?;
        root.register_template(species.uid(), template(registry, species.uid(), species.traits())?)?;
    }

    use BeeSpecies::*;
    let base = [Forest, Meadows, Modest, Tropical];
    for (i, first) in base.iter().enumerate() {
        for second in &base[i + 1..] {
            let rule = mutation(registry, root, first.uid(), second.uid(), Common.uid(), 15.0)?;
            root.register_mutation(registry, rule);
        }
    }
    for parent in base {
        let rule = mutation(registry, root, Common.uid(), parent.uid(), Cultivated.uid(), 12.0)?;
        let rule = if parent == Forest {
            rule.restrict(MutationCondition::biome(BiomeCategories::FOREST))
        } else {
            rule
        };
        root.register_mutation(registry, rule);
    }
    let rules = [
        (Common, Cultivated, Noble, 10.0),
        (Common, Cultivated, Diligent, 10.0),
        (Diligent, Cultivated, Unweary, 8.0),
    ];
    for (first, second, result, chance) in rules {
        let rule = mutation(registry, root, first.uid(), second.uid(), result.uid(), chance)?;
        root.register_mutation(registry, rule);
    }

    log::info!(
        "Registered {} bee species and {} bee mutations",
        root.species_count(registry),
        root.mutations().len()
    );
    Ok(())
}

/// Register the built-in tree alleles, species templates and mutations
pub fn register_default_trees(registry: &mut AlleleRegistry, root: &mut TreeRoot) -> Result<()> {
    for allele in shared_alleles() {
        register_shared(registry, allele)?;
    }
    for allele in tree_alleles() {
        registry.register(allele)?;
    }
    for species in TreeSpecies::ALL {
        registry.register(species.allele())?;
        root.register_template(species.uid(), template(registry, species.uid(), species.traits())?)?;
    }

    use TreeSpecies::*;
    let rules = [
        (Birch, Oak, Lime, 15.0, None),
        (Lime, Oak, Cherry, 10.0, None),
        (
            Lime,
            Cherry,
            Walnut,
            10.0,
            Some(MutationCondition::biome(BiomeCategories::FOREST | BiomeCategories::HILLS)),
        ),
    ];
    for (first, second, result, chance, condition) in rules {
        let mut rule = mutation(registry, root, first.uid(), second.uid(), result.uid(), chance)?;
        if let Some(condition) = condition {
            rule = rule.restrict(condition);
        }
        root.register_mutation(registry, rule);
    }

    log::info!(
        "Registered {} tree species and {} tree mutations",
        root.species_count(registry),
        root.mutations().len()
    );
    Ok(())
}
