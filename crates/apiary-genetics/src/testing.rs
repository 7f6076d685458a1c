//! Small four-slot karyotype and allele catalog shared by unit tests

use crate::allele::{Allele, SpeciesKind};
use crate::chromosome::ChromosomeSlot;
use crate::genome::Template;
use crate::registry::AlleleRegistry;
use ahash::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestSlot {
    Species,
    Fertility,
    Speed,
    Effect,
}

impl ChromosomeSlot for TestSlot {
    const SPECIES: Self = Self::Species;
    const FERTILITY: Self = Self::Fertility;
    const EFFECT: Self = Self::Effect;

    fn karyotype() -> &'static [Self] {
        &[Self::Species, Self::Fertility, Self::Speed, Self::Effect]
    }

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Fertility => "fertility",
            Self::Speed => "speed",
            Self::Effect => "effect",
        }
    }
}

pub struct Catalog {
    pub registry: AlleleRegistry,
    templates: HashMap<&'static str, Template<TestSlot>>,
}

impl Catalog {
    pub fn allele(&self, uid: &str) -> Arc<Allele> {
        self.registry.lookup(uid).unwrap()
    }

    pub fn template(&self, name: &str) -> Template<TestSlot> {
        self.templates[name].clone()
    }
}

/// Four species with distinct alleles in every slot
pub fn catalog() -> Catalog {
    let mut registry = AlleleRegistry::new();
    let alleles = [
        Allele::species("species.forest", "Forest", true, SpeciesKind::Bee),
        Allele::species("species.meadow", "Meadow", true, SpeciesKind::Bee),
        Allele::species("species.common", "Common", true, SpeciesKind::Bee),
        Allele::species("species.noble", "Noble", true, SpeciesKind::Bee),
        Allele::float("fertility.high", "High", true, 1.0),
        Allele::float("fertility.normal", "Normal", true, 0.5),
        Allele::float("speed.slow", "Slow", true, 0.6),
        Allele::float("speed.fast", "Fast", true, 1.2),
        Allele::float("speed.lazy", "Lazy", false, 0.3),
        Allele::effect("effect.none", "None", true, false),
        Allele::effect("effect.calm", "Calm", true, true),
        Allele::effect("effect.buzz", "Buzz", true, true),
    ];
    for allele in alleles {
        registry.register(allele).unwrap();
    }

    let template = |species: &str, fertility: &str, speed: &str, effect: &str| {
        Template::new()
            .with(TestSlot::Species, registry.lookup(species).unwrap())
            .with(TestSlot::Fertility, registry.lookup(fertility).unwrap())
            .with(TestSlot::Speed, registry.lookup(speed).unwrap())
            .with(TestSlot::Effect, registry.lookup(effect).unwrap())
    };

    let mut templates = HashMap::default();
    templates.insert(
        "forest",
        template("species.forest", "fertility.high", "speed.slow", "effect.calm"),
    );
    templates.insert(
        "meadow",
        template("species.meadow", "fertility.normal", "speed.fast", "effect.buzz"),
    );
    templates.insert(
        "common",
        template("species.common", "fertility.high", "speed.fast", "effect.none"),
    );
    templates.insert(
        "noble",
        template("species.noble", "fertility.normal", "speed.slow", "effect.none"),
    );

    Catalog {
        registry,
        templates,
    }
}
