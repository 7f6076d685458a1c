//! Offspring genome derivation
//!
//! Every slot inherits independently: the offspring's active allele is a
//! coin flip between the parents' active alleles, its inactive allele a
//! separate coin flip between their inactive alleles. Dominance never
//! reorders the picks. Afterwards the
//! parents' species run through mutation resolution; a mutation that fires
//! overrides every slot its result template sets.

use crate::allele::Allele;
use crate::chromosome::{Chromosome, ChromosomeSlot};
use crate::context::{BreedingContext, Position};
use crate::genome::Genome;
use crate::mutation::{Mutation, MutationQuery, MutationTable};
use crate::registry::AlleleRegistry;
use std::sync::Arc;

/// Breeding services and settings needed to derive offspring
#[derive(Debug, Clone, Copy)]
pub struct Inheritance<'a, C: ChromosomeSlot> {
    registry: &'a AlleleRegistry,
    mutations: &'a MutationTable<C>,
    shuffle: bool,
    mutation_multiplier: f32,
}

/// Derived genome and the mutation that produced it, if any
#[derive(Debug, Clone)]
pub struct Derivation<'a, C: ChromosomeSlot> {
    pub genome: Genome<C>,
    pub mutation: Option<&'a Mutation<C>>,
}

impl<'a, C: ChromosomeSlot> Inheritance<'a, C> {
    pub fn new(registry: &'a AlleleRegistry, mutations: &'a MutationTable<C>) -> Self {
        Self {
            registry,
            mutations,
            shuffle: false,
            mutation_multiplier: 1.0,
        }
    }

    /// Evaluate competing mutations in a random order
    pub fn shuffled(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Scale every mutation chance (breeding mode modifier)
    pub fn with_mutation_multiplier(mut self, multiplier: f32) -> Self {
        self.mutation_multiplier = multiplier;
        self
    }

    pub fn registry(&self) -> &'a AlleleRegistry {
        self.registry
    }

    pub fn mutations(&self) -> &'a MutationTable<C> {
        self.mutations
    }

    /// Derive one offspring genome from two parents
    pub fn derive<X: BreedingContext + ?Sized>(
        &self,
        ctx: &mut X,
        position: Position,
        parent0: &Genome<C>,
        parent1: &Genome<C>,
    ) -> Derivation<'a, C> {
        let mut chromosomes: Vec<Chromosome> = C::karyotype()
            .iter()
            .map(|&slot| {
                let active = pick(ctx, parent0.active_allele(slot), parent1.active_allele(slot));
                let inactive =
                    pick(ctx, parent0.inactive_allele(slot), parent1.inactive_allele(slot));
                Chromosome::from_parts(active, inactive)
            })
            .collect();

        let query = MutationQuery::new(parent0, parent1, position)
            .shuffled(self.shuffle)
            .with_chance_multiplier(self.mutation_multiplier);
        let outcome = self.mutations.resolve(self.registry, ctx, &query);

        if let Some(outcome) = &outcome {
            log::debug!(
                "Mutation {} fired at {:.1}%",
                outcome.mutation.key(),
                outcome.effective_chance
            );
            let template = outcome.result();
            for slot in template.slots() {
                if let Some(allele) = template.get(slot) {
                    chromosomes[slot.index()] = Chromosome::pure(Arc::clone(allele));
                }
            }
        }

        Derivation {
            genome: Genome::assemble(chromosomes),
            mutation: outcome.map(|o| o.mutation),
        }
    }
}

/// 50/50 choice between two parents' alleles
fn pick<X: BreedingContext + ?Sized>(
    ctx: &mut X,
    first: &Arc<Allele>,
    second: &Arc<Allele>,
) -> Arc<Allele> {
    if ctx.random_float() < 0.5 {
        Arc::clone(first)
    } else {
        Arc::clone(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BiomeCategories, ScriptedContext, SimulatedWorld};
    use crate::genome::Template;
    use crate::testing::{catalog, Catalog, TestSlot};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn parents(catalog: &Catalog) -> (Genome<TestSlot>, Genome<TestSlot>) {
        (
            Genome::from_template(&catalog.template("forest"), None).unwrap(),
            Genome::from_template(&catalog.template("meadow"), None).unwrap(),
        )
    }

    #[test]
    fn test_alleles_come_from_either_parent() {
        let catalog = catalog();
        let (forest, meadow) = parents(&catalog);
        let table = MutationTable::new();
        let inheritance = Inheritance::new(&catalog.registry, &table);
        let mut world = SimulatedWorld::new(
            Xoshiro256StarStar::seed_from_u64(7),
            BiomeCategories::PLAINS,
        );

        for _ in 0..200 {
            let child = inheritance.derive(&mut world, Position::ZERO, &forest, &meadow);
            assert!(child.mutation.is_none());
            for &slot in TestSlot::karyotype() {
                for allele in [child.genome.active_allele(slot), child.genome.inactive_allele(slot)] {
                    let uid = allele.uid();
                    assert!(
                        uid == forest.active_allele(slot).uid()
                            || uid == meadow.active_allele(slot).uid()
                    );
                }
            }
        }
    }

    #[test]
    fn test_coin_flips_are_fair_and_independent() {
        let catalog = catalog();
        let (forest, meadow) = parents(&catalog);
        let table = MutationTable::new();
        let inheritance = Inheritance::new(&catalog.registry, &table);
        let mut world = SimulatedWorld::new(
            Xoshiro256StarStar::seed_from_u64(2024),
            BiomeCategories::PLAINS,
        );

        let trials = 10_000;
        let (mut active_forest, mut inactive_forest, mut same_parent) = (0, 0, 0);
        for _ in 0..trials {
            let child = inheritance.derive(&mut world, Position::ZERO, &forest, &meadow);
            let active = child.genome.active_allele(TestSlot::Speed).uid() == "speed.slow";
            let inactive = child.genome.inactive_allele(TestSlot::Speed).uid() == "speed.slow";
            active_forest += active as u32;
            inactive_forest += inactive as u32;
            same_parent += (active == inactive) as u32;
        }

        let ratio = |n: u32| n as f32 / trials as f32;
        assert!((ratio(active_forest) - 0.5).abs() < 0.03);
        assert!((ratio(inactive_forest) - 0.5).abs() < 0.03);
        // Independent picks agree on the parent about half the time
        assert!((ratio(same_parent) - 0.5).abs() < 0.03);
    }

    #[test]
    fn test_recessive_pick_stays_active() {
        let catalog = catalog();
        let (_, meadow) = parents(&catalog);
        let lazy = Genome::from_template(
            &catalog
                .template("forest")
                .with(TestSlot::Speed, catalog.allele("speed.lazy")),
            None,
        )
        .unwrap();
        let table = MutationTable::new();
        let inheritance = Inheritance::new(&catalog.registry, &table);
        let mut world = SimulatedWorld::new(
            Xoshiro256StarStar::seed_from_u64(99),
            BiomeCategories::PLAINS,
        );

        let trials = 10_000;
        let (mut active_lazy, mut inactive_lazy, mut lazy_over_fast) = (0, 0, 0);
        for _ in 0..trials {
            let child = inheritance.derive(&mut world, Position::ZERO, &lazy, &meadow);
            let active = child.genome.active_allele(TestSlot::Speed).uid() == "speed.lazy";
            let inactive = child.genome.inactive_allele(TestSlot::Speed).uid() == "speed.lazy";
            active_lazy += active as u32;
            inactive_lazy += inactive as u32;
            lazy_over_fast += (active && !inactive) as u32;
        }

        let ratio = |n: u32| n as f32 / trials as f32;
        assert!((ratio(active_lazy) - 0.5).abs() < 0.03);
        assert!((ratio(inactive_lazy) - 0.5).abs() < 0.03);
        // Recessive active over a dominant inactive is a normal outcome
        assert!((ratio(lazy_over_fast) - 0.25).abs() < 0.03);

        // Scripted: active from the lazy parent, inactive from the fast one
        let mut draws = vec![0.9; 4];
        draws.extend([0.1, 0.9]);
        let mut ctx = ScriptedContext::new(draws, BiomeCategories::PLAINS);
        let child = inheritance.derive(&mut ctx, Position::ZERO, &lazy, &meadow).genome;
        assert_eq!(child.active_allele(TestSlot::Speed).uid(), "speed.lazy");
        assert_eq!(child.inactive_allele(TestSlot::Speed).uid(), "speed.fast");
    }

    #[test]
    fn test_scripted_flips_pick_per_slot() {
        let catalog = catalog();
        let (forest, meadow) = parents(&catalog);
        let table = MutationTable::new();
        let inheritance = Inheritance::new(&catalog.registry, &table);

        // (active, inactive) per slot in karyotype order
        let draws = [0.1, 0.9, 0.9, 0.1, 0.1, 0.1, 0.9, 0.9];
        let mut ctx = ScriptedContext::new(draws, BiomeCategories::PLAINS);
        let child = inheritance.derive(&mut ctx, Position::ZERO, &forest, &meadow).genome;

        assert_eq!(child.primary().uid(), "species.forest");
        assert_eq!(child.secondary().uid(), "species.meadow");
        assert_eq!(child.active_allele(TestSlot::Fertility).uid(), "fertility.normal");
        assert_eq!(child.inactive_allele(TestSlot::Fertility).uid(), "fertility.high");
        assert!(child.is_pure_bred(TestSlot::Speed));
        assert_eq!(child.active_allele(TestSlot::Effect).uid(), "effect.buzz");
    }

    #[test]
    fn test_mutation_template_overrides_inheritance() {
        let catalog = catalog();
        let (forest, meadow) = parents(&catalog);
        let mut table = MutationTable::new();
        let partial = Template::new()
            .with(TestSlot::Species, catalog.allele("species.common"))
            .with(TestSlot::Effect, catalog.allele("effect.none"));
        table.register(
            Mutation::new(
                catalog.allele("species.forest"),
                catalog.allele("species.meadow"),
                partial,
                100.0,
            )
            .unwrap(),
        );
        let inheritance = Inheritance::new(&catalog.registry, &table);

        let mut draws = vec![0.1; 8];
        draws.push(0.0);
        let mut ctx = ScriptedContext::new(draws, BiomeCategories::PLAINS);
        let child = inheritance.derive(&mut ctx, Position::ZERO, &forest, &meadow);

        let mutation = child.mutation.unwrap();
        assert_eq!(mutation.key(), "species.forest+species.meadow=species.common");
        let genome = child.genome;
        assert!(genome.is_pure_bred(TestSlot::Species));
        assert_eq!(genome.primary().uid(), "species.common");
        assert_eq!(genome.active_allele(TestSlot::Effect).uid(), "effect.none");
        assert_eq!(genome.inactive_allele(TestSlot::Effect).uid(), "effect.none");
        // Slots the template leaves out keep the coin-flip result
        assert_eq!(genome.active_allele(TestSlot::Speed).uid(), "speed.slow");
    }

    #[test]
    fn test_mutation_multiplier_zero_blocks_mutations() {
        let catalog = catalog();
        let (forest, meadow) = parents(&catalog);
        let mut table = MutationTable::new();
        table.register(
            Mutation::new(
                catalog.allele("species.forest"),
                catalog.allele("species.meadow"),
                catalog.template("common"),
                100.0,
            )
            .unwrap(),
        );
        let inheritance = Inheritance::new(&catalog.registry, &table).with_mutation_multiplier(0.0);
        let mut world = SimulatedWorld::new(
            Xoshiro256StarStar::seed_from_u64(3),
            BiomeCategories::PLAINS,
        );

        for _ in 0..500 {
            let child = inheritance.derive(&mut world, Position::ZERO, &forest, &meadow);
            assert!(child.mutation.is_none());
            assert_ne!(child.genome.primary().uid(), "species.common");
        }
    }
}
