//! Chromosome slots and allele pairs

use crate::allele::Allele;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Fixed set of named trait slots for one creature kind (its karyotype)
pub trait ChromosomeSlot: Copy + Eq + Hash + Debug + 'static {
    /// Slot holding the species allele
    const SPECIES: Self;
    /// Slot read by reproduction to decide whether offspring are produced
    const FERTILITY: Self;
    /// Slot holding the effect alleles
    const EFFECT: Self;

    /// Every slot, in karyotype order
    fn karyotype() -> &'static [Self];

    /// Position of this slot in `karyotype()`
    fn index(self) -> usize;

    fn name(self) -> &'static str;
}

/// Active/inactive allele pair for one slot
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    active: Arc<Allele>,
    inactive: Arc<Allele>,
}

impl Chromosome {
    /// Build a pair, expressing the dominant allele when exactly one is dominant
    ///
    /// Used when genomes are built from templates. Inherited pairs keep the
    /// positions their parents' picks gave them, see [`Chromosome::from_parts`].
    pub fn new(first: Arc<Allele>, second: Arc<Allele>) -> Self {
        if !first.is_dominant() && second.is_dominant() {
            Self {
                active: second,
                inactive: first,
            }
        } else {
            Self {
                active: first,
                inactive: second,
            }
        }
    }

    /// Pair with a fixed expression order, used for inherited and restored genomes
    pub fn from_parts(active: Arc<Allele>, inactive: Arc<Allele>) -> Self {
        Self { active, inactive }
    }

    /// Pure-bred pair carrying the same allele twice
    pub fn pure(allele: Arc<Allele>) -> Self {
        Self {
            active: Arc::clone(&allele),
            inactive: allele,
        }
    }

    pub fn active(&self) -> &Arc<Allele> {
        &self.active
    }

    pub fn inactive(&self) -> &Arc<Allele> {
        &self.inactive
    }

    pub fn is_pure_bred(&self) -> bool {
        self.active.uid() == self.inactive.uid()
    }
}
