//! Individuals: a genome plus a mate snapshot and an analyzed flag

use crate::allele::Allele;
use crate::chromosome::ChromosomeSlot;
use crate::context::{BreedingContext, Position};
use crate::error::Result;
use crate::genome::{Genome, GenomeSnapshot};
use crate::inheritance::Inheritance;
use crate::registry::AlleleRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One member of a species
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<C: ChromosomeSlot> {
    genome: Genome<C>,
    mate: Option<Genome<C>>,
    analyzed: bool,
}

/// Offspring produced by one reproduction attempt
#[derive(Debug, Clone)]
pub struct Offspring<C: ChromosomeSlot> {
    pub individual: Individual<C>,
    /// Key of the mutation that produced the offspring, if one fired
    pub mutation: Option<String>,
}

impl<C: ChromosomeSlot> Individual<C> {
    /// Fresh, unmated and unanalyzed individual
    pub fn new(genome: Genome<C>) -> Self {
        Self {
            genome,
            mate: None,
            analyzed: false,
        }
    }

    pub fn genome(&self) -> &Genome<C> {
        &self.genome
    }

    /// Store a copy of `other`'s genome as this individual's mate,
    /// replacing any previous one
    pub fn mate(&mut self, other: &Self) {
        self.mate = Some(other.genome.clone());
    }

    pub fn mate_genome(&self) -> Option<&Genome<C>> {
        self.mate.as_ref()
    }

    pub fn is_mated(&self) -> bool {
        self.mate.is_some()
    }

    /// Mark as inspected; returns false if it already was
    pub fn analyze(&mut self) -> bool {
        if self.analyzed {
            return false;
        }
        self.analyzed = true;
        true
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn is_pure_bred(&self, slot: C) -> bool {
        self.genome.is_pure_bred(slot)
    }

    /// Expressed allele of a slot
    pub fn active_trait(&self, slot: C) -> &Arc<Allele> {
        self.genome.active_allele(slot)
    }

    /// Both effect alleles must be combinable for the inactive one to run too
    pub fn can_express_secondary_effect(&self) -> bool {
        self.genome.active_allele(C::EFFECT).is_combinable()
            && self.genome.inactive_allele(C::EFFECT).is_combinable()
    }

    /// Try to produce offspring.
    ///
    /// One draw decides against `fertility x fertility_modifier`; a success
    /// yields exactly one offspring, cloned from this genome when unmated
    /// and derived from both genomes otherwise.
    pub fn attempt_reproduction<X: BreedingContext + ?Sized>(
        &self,
        inheritance: &Inheritance<'_, C>,
        ctx: &mut X,
        position: Position,
        fertility_modifier: f32,
    ) -> Vec<Offspring<C>> {
        let fertility = self.genome.value(C::FERTILITY).unwrap_or(0.0);
        if ctx.random_float() >= fertility * fertility_modifier {
            return Vec::new();
        }

        let offspring = match &self.mate {
            None => Offspring {
                individual: Individual::new(self.genome.clone()),
                mutation: None,
            },
            Some(mate) => {
                let derived = inheritance.derive(ctx, position, &self.genome, mate);
                Offspring {
                    individual: Individual::new(derived.genome),
                    mutation: derived.mutation.map(|m| m.key()),
                }
            }
        };
        vec![offspring]
    }

    /// Convert to identifier form for persistence
    pub fn snapshot(&self) -> IndividualSnapshot {
        IndividualSnapshot {
            genome: self.genome.snapshot(),
            mate: self.mate.as_ref().map(Genome::snapshot),
            analyzed: self.analyzed,
        }
    }

    /// Rebuild an individual from its identifier form
    pub fn restore(snapshot: &IndividualSnapshot, registry: &AlleleRegistry) -> Result<Self> {
        Ok(Self {
            genome: Genome::restore(&snapshot.genome, registry)?,
            mate: snapshot
                .mate
                .as_ref()
                .map(|mate| Genome::restore(mate, registry))
                .transpose()?,
            analyzed: snapshot.analyzed,
        })
    }
}

/// Serializable individual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualSnapshot {
    pub genome: GenomeSnapshot,
    #[serde(default)]
    pub mate: Option<GenomeSnapshot>,
    #[serde(default)]
    pub analyzed: bool,
}
