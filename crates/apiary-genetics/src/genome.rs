//! Genomes and templates
//!
//! A genome assigns an active/inactive allele pair to every slot of a
//! karyotype. Genomes are immutable; breeding always builds new ones.

use crate::allele::Allele;
use crate::chromosome::{Chromosome, ChromosomeSlot};
use crate::error::{GeneticsError, Result};
use crate::registry::AlleleRegistry;
use ahash::HashMap;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Partial or complete mapping from slot to allele
#[derive(Debug, Clone)]
pub struct Template<C: ChromosomeSlot> {
    alleles: HashMap<C, Arc<Allele>>,
}

impl<C: ChromosomeSlot> Default for Template<C> {
    fn default() -> Self {
        Self {
            alleles: HashMap::default(),
        }
    }
}

impl<C: ChromosomeSlot> Template<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style slot assignment
    pub fn with(mut self, slot: C, allele: Arc<Allele>) -> Self {
        self.alleles.insert(slot, allele);
        self
    }

    pub fn set(&mut self, slot: C, allele: Arc<Allele>) {
        self.alleles.insert(slot, allele);
    }

    pub fn get(&self, slot: C) -> Option<&Arc<Allele>> {
        self.alleles.get(&slot)
    }

    /// Species allele of this template, if set
    pub fn species(&self) -> Option<&Arc<Allele>> {
        self.get(C::SPECIES)
    }

    /// Assign every slot this template leaves unset from `defaults`
    pub fn fill_from(&mut self, defaults: &Template<C>) {
        for (slot, allele) in &defaults.alleles {
            self.alleles
                .entry(*slot)
                .or_insert_with(|| Arc::clone(allele));
        }
    }

    /// Assigned slots, in karyotype order
    pub fn slots(&self) -> impl Iterator<Item = C> + '_ {
        C::karyotype()
            .iter()
            .copied()
            .filter(|slot| self.alleles.contains_key(slot))
    }

    /// Whether every karyotype slot is assigned
    pub fn is_complete(&self) -> bool {
        C::karyotype().iter().all(|slot| self.alleles.contains_key(slot))
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}

/// Full active/inactive allele assignment for one individual
#[derive(Debug, Clone, PartialEq)]
pub struct Genome<C: ChromosomeSlot> {
    chromosomes: Vec<Chromosome>,
    _slot: PhantomData<C>,
}

impl<C: ChromosomeSlot> Genome<C> {
    /// Build a genome from chromosomes given in karyotype order
    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Result<Self> {
        let expected = C::karyotype().len();
        if chromosomes.len() != expected {
            return Err(GeneticsError::KaryotypeMismatch {
                expected,
                actual: chromosomes.len(),
            });
        }
        Ok(Self {
            chromosomes,
            _slot: PhantomData,
        })
    }

    /// Assemble chromosomes that were built by walking the karyotype
    pub(crate) fn assemble(chromosomes: Vec<Chromosome>) -> Self {
        debug_assert_eq!(chromosomes.len(), C::karyotype().len());
        Self {
            chromosomes,
            _slot: PhantomData,
        }
    }

    /// Build a pure-bred genome, filling unset slots from `defaults`
    pub fn from_template(template: &Template<C>, defaults: Option<&Template<C>>) -> Result<Self> {
        Self::from_templates(template, template, defaults)
    }

    /// Build a genome with separate active and inactive templates
    pub fn from_templates(
        active: &Template<C>,
        inactive: &Template<C>,
        defaults: Option<&Template<C>>,
    ) -> Result<Self> {
        let resolve = |template: &Template<C>, slot: C| -> Result<Arc<Allele>> {
            template
                .get(slot)
                .or_else(|| defaults.and_then(|d| d.get(slot)))
                .cloned()
                .ok_or(GeneticsError::IncompleteTemplate { slot: slot.name() })
        };

        let chromosomes = C::karyotype()
            .iter()
            .map(|&slot| {
                Ok(Chromosome::new(
                    resolve(active, slot)?,
                    resolve(inactive, slot)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_chromosomes(chromosomes)
    }

    pub fn chromosome(&self, slot: C) -> &Chromosome {
        &self.chromosomes[slot.index()]
    }

    /// Chromosomes in karyotype order
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn active_allele(&self, slot: C) -> &Arc<Allele> {
        self.chromosome(slot).active()
    }

    pub fn inactive_allele(&self, slot: C) -> &Arc<Allele> {
        self.chromosome(slot).inactive()
    }

    /// Expressed species
    pub fn primary(&self) -> &Arc<Allele> {
        self.active_allele(C::SPECIES)
    }

    /// Carried but unexpressed species
    pub fn secondary(&self) -> &Arc<Allele> {
        self.inactive_allele(C::SPECIES)
    }

    pub fn is_pure_bred(&self, slot: C) -> bool {
        self.chromosome(slot).is_pure_bred()
    }

    /// Phenotype value of a slot: the active allele's numeric reading,
    /// passed through a modifier supplied by the caller (housing, mode, ...)
    pub fn derived_value(&self, slot: C, modifier: impl FnOnce(f32) -> f32) -> Option<f32> {
        self.active_allele(slot).as_f32().map(modifier)
    }

    /// Active allele's numeric reading without modifiers
    pub fn value(&self, slot: C) -> Option<f32> {
        self.derived_value(slot, |v| v)
    }

    /// Active allele's boolean reading, false for non-boolean alleles
    pub fn flag(&self, slot: C) -> bool {
        self.active_allele(slot).as_bool().unwrap_or(false)
    }

    /// Convert to identifier form for persistence
    pub fn snapshot(&self) -> GenomeSnapshot {
        GenomeSnapshot {
            chromosomes: self
                .chromosomes
                .iter()
                .map(|c| (c.active().uid().to_string(), c.inactive().uid().to_string()))
                .collect(),
        }
    }

    /// Rebuild a genome from its identifier form
    pub fn restore(snapshot: &GenomeSnapshot, registry: &AlleleRegistry) -> Result<Self> {
        let chromosomes = snapshot
            .chromosomes
            .iter()
            .map(|(active, inactive)| {
                Ok(Chromosome::from_parts(
                    registry.lookup(active)?,
                    registry.lookup(inactive)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_chromosomes(chromosomes)
    }
}

/// Serializable genome: allele identifiers per slot, in karyotype order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeSnapshot {
    pub chromosomes: Vec<(String, String)>,
}
