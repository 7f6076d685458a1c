//! Trees: karyotype, growth traits, saplings and fruit

use crate::fruit;
use crate::species_root::SpeciesRoot;
use apiary_genetics::{
    Allele, AlleleRegistry, BreedingContext, ChromosomeSlot, FruitTraits, Individual, Position,
    Result, SpeciesKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeChromosome {
    Species,
    Height,
    Fertility,
    Fruits,
    Yield,
    Effect,
    Sappiness,
    Maturation,
    Girth,
    Fireproof,
}

impl TreeChromosome {
    pub const ALL: [TreeChromosome; 10] = [
        Self::Species,
        Self::Height,
        Self::Fertility,
        Self::Fruits,
        Self::Yield,
        Self::Effect,
        Self::Sappiness,
        Self::Maturation,
        Self::Girth,
        Self::Fireproof,
    ];
}

impl ChromosomeSlot for TreeChromosome {
    const SPECIES: Self = Self::Species;
    const FERTILITY: Self = Self::Fertility;
    const EFFECT: Self = Self::Effect;

    fn karyotype() -> &'static [Self] {
        &Self::ALL
    }

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Height => "height",
            Self::Fertility => "fertility",
            Self::Fruits => "fruits",
            Self::Yield => "yield",
            Self::Effect => "effect",
            Self::Sappiness => "sappiness",
            Self::Maturation => "maturation",
            Self::Girth => "girth",
            Self::Fireproof => "fireproof",
        }
    }
}

pub type Tree = Individual<TreeChromosome>;
pub type TreeRoot = SpeciesRoot<TreeChromosome>;

/// Growth and production traits read from a tree's active alleles
pub trait TreeTraits {
    fn height_modifier(&self) -> f32;

    fn girth(&self) -> i32;

    /// Maturation time before mode modifiers
    fn required_maturity(&self) -> i32;

    /// Leaf durability derived from fertility and sappiness
    fn resilience(&self) -> i32;

    fn fruit_provider(&self) -> Option<&FruitTraits>;

    /// The species accepts the family of its fruit provider
    fn can_bear_fruit(&self) -> bool;

    /// Fruit grows in dedicated blocks and the species can bear it
    fn allows_fruit_blocks(&self) -> bool;

    fn is_fireproof(&self) -> bool;

    /// Leaf effects to run: the active one, plus the inactive one when both
    /// are combinable
    fn effects(&self) -> Vec<&Arc<Allele>>;
}

impl TreeTraits for Tree {
    fn height_modifier(&self) -> f32 {
        self.genome().value(TreeChromosome::Height).unwrap_or(1.0)
    }

    fn girth(&self) -> i32 {
        self.active_trait(TreeChromosome::Girth).as_i32().unwrap_or(1)
    }

    fn required_maturity(&self) -> i32 {
        self.active_trait(TreeChromosome::Maturation)
            .as_i32()
            .unwrap_or(0)
    }

    fn resilience(&self) -> i32 {
        let genome = self.genome();
        let fertility = genome.value(TreeChromosome::Fertility).unwrap_or(0.0);
        let sappiness = genome.value(TreeChromosome::Sappiness).unwrap_or(0.0);
        let base = (fertility * sappiness * 100.0) as i32;
        base.max(1) * 10
    }

    fn fruit_provider(&self) -> Option<&FruitTraits> {
        self.active_trait(TreeChromosome::Fruits).fruit_traits()
    }

    fn can_bear_fruit(&self) -> bool {
        let Some(provider) = self.fruit_provider() else {
            return false;
        };
        self.genome()
            .primary()
            .species_traits()
            .is_some_and(|traits| traits.suitable_fruit.contains(&provider.family))
    }

    fn allows_fruit_blocks(&self) -> bool {
        self.fruit_provider()
            .is_some_and(|provider| provider.requires_fruit_blocks)
            && self.can_bear_fruit()
    }

    fn is_fireproof(&self) -> bool {
        self.genome().flag(TreeChromosome::Fireproof)
    }

    fn effects(&self) -> Vec<&Arc<Allele>> {
        let mut effects = vec![self.active_trait(TreeChromosome::Effect)];
        if self.can_express_secondary_effect() {
            effects.push(self.genome().inactive_allele(TreeChromosome::Effect));
        }
        effects
    }
}

impl SpeciesRoot<TreeChromosome> {
    /// Tree root with no templates or mutations yet
    pub fn trees() -> Self {
        Self::new(SpeciesKind::Tree)
    }

    /// Saplings dropped by a tree's leaves, scaled by the mode's fertility.
    /// Mutations are credited to `owner` now, births once a sapling grows.
    pub fn saplings<X: BreedingContext + ?Sized>(
        &mut self,
        registry: &AlleleRegistry,
        ctx: &mut X,
        position: Position,
        tree: &Tree,
        owner: Option<&str>,
        modifier: f32,
    ) -> Result<Vec<Tree>> {
        Ok(self
            .reproduce(registry, ctx, position, tree, owner, modifier, false)?
            .into_iter()
            .map(|offspring| offspring.individual)
            .collect())
    }

    /// Ticks a sapling needs under the active mode
    pub fn required_maturity(&mut self, tree: &Tree) -> Result<u32> {
        let mode = self.active_mode()?;
        let maturity = mode.maturation_modifier(tree.required_maturity() as f32).round();
        Ok(maturity.max(0.0) as u32)
    }

    /// Fruit harvested from a tree under the active mode
    pub fn produce<X: BreedingContext + ?Sized>(&mut self, ctx: &mut X, tree: &Tree) -> Result<Vec<String>> {
        if !tree.can_bear_fruit() {
            return Ok(Vec::new());
        }
        let Some(provider) = tree.fruit_provider() else {
            return Ok(Vec::new());
        };

        let mode_yield = self.active_mode()?.yield_modifier(1.0);
        let tree_yield = tree.genome().value(TreeChromosome::Yield).unwrap_or(0.0);
        Ok(fruit::produce(provider, ctx, tree_yield, mode_yield))
    }
}
