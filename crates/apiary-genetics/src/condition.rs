//! Environmental conditions scaling a mutation's chance

use crate::allele::Allele;
use crate::chromosome::ChromosomeSlot;
use crate::context::{BiomeCategories, BreedingContext, Position};
use crate::genome::Genome;
use serde::{Deserialize, Serialize};

/// Predicate contributing a multiplier in [0, 1] to a mutation's chance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MutationCondition {
    /// 1 if the location's biome belongs to any of the categories, else 0
    Biome(BiomeCategories),
    /// 1 if the position's height lies within `min..=max`, else 0
    Altitude { min: i32, max: i32 },
    /// Constant multiplier, clamped to [0, 1]
    Scaled(f32),
}

impl MutationCondition {
    /// Biome condition over one or more categories
    pub fn biome(categories: BiomeCategories) -> Self {
        Self::Biome(categories)
    }

    /// Chance multiplier for breeding `species0` x `species1` at `position`
    pub fn chance<C: ChromosomeSlot, X: BreedingContext + ?Sized>(
        &self,
        ctx: &X,
        position: Position,
        _species0: &Allele,
        _species1: &Allele,
        _genome0: &Genome<C>,
        _genome1: &Genome<C>,
    ) -> f32 {
        match self {
            Self::Biome(valid) => {
                if ctx.biome_categories_at(position).intersects(*valid) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Altitude { min, max } => {
                if (*min..=*max).contains(&position.y) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Scaled(multiplier) => multiplier.clamp(0.0, 1.0),
        }
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            Self::Biome(valid) => {
                let names = valid.names();
                if names.len() > 1 {
                    format!(
                        "Is restricted to the following biome types: [{}]",
                        names.join(", ")
                    )
                } else {
                    format!(
                        "Is restricted to {}-like biomes",
                        names.first().map(String::as_str).unwrap_or("no")
                    )
                }
            }
            Self::Altitude { min, max } => {
                format!("Is restricted to altitudes between {} and {}", min, max)
            }
            Self::Scaled(multiplier) => {
                format!("Occurs at {:.0}% of the usual rate", multiplier.clamp(0.0, 1.0) * 100.0)
            }
        }
    }
}
