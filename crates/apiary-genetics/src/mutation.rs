//! Mutation rules and their resolution
//!
//! A mutation turns an unordered pair of parent species into a chance of
//! producing a new species, possibly gated by environmental conditions.
//! Resolution is first-match-wins: candidates are tried in registration
//! order (or a shuffled copy of it), each with one fresh draw, and the first
//! draw that lands under its candidate's chance decides the outcome.

use crate::allele::Allele;
use crate::chromosome::ChromosomeSlot;
use crate::condition::MutationCondition;
use crate::context::{BreedingContext, Position};
use crate::error::{GeneticsError, Result};
use crate::genome::{Genome, Template};
use crate::registry::AlleleRegistry;
use std::sync::Arc;

/// Rule converting two parent species into a possible result species
#[derive(Debug, Clone)]
pub struct Mutation<C: ChromosomeSlot> {
    species0: Arc<Allele>,
    species1: Arc<Allele>,
    result: Template<C>,
    /// Percent chance in [0, 100]
    base_chance: f32,
    conditions: Vec<MutationCondition>,
}

impl<C: ChromosomeSlot> Mutation<C> {
    /// Create a mutation; the result template must set the species slot
    pub fn new(
        species0: Arc<Allele>,
        species1: Arc<Allele>,
        result: Template<C>,
        base_chance: f32,
    ) -> Result<Self> {
        if result.species().is_none() {
            return Err(GeneticsError::IncompleteTemplate {
                slot: C::SPECIES.name(),
            });
        }

        Ok(Self {
            species0,
            species1,
            result,
            base_chance: base_chance.clamp(0.0, 100.0),
            conditions: Vec::new(),
        })
    }

    /// Add an environmental condition
    pub fn restrict(mut self, condition: MutationCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn species0(&self) -> &Arc<Allele> {
        &self.species0
    }

    pub fn species1(&self) -> &Arc<Allele> {
        &self.species1
    }

    pub fn result(&self) -> &Template<C> {
        &self.result
    }

    pub fn result_species(&self) -> &Arc<Allele> {
        // `new` rejects templates without a species
        self.result.species().unwrap_or(&self.species0)
    }

    pub fn base_chance(&self) -> f32 {
        self.base_chance
    }

    pub fn conditions(&self) -> &[MutationCondition] {
        &self.conditions
    }

    /// Identifier used by breeding trackers
    pub fn key(&self) -> String {
        format!(
            "{}+{}={}",
            self.species0.uid(),
            self.species1.uid(),
            self.result_species().uid()
        )
    }

    /// Whether this rule applies to the unordered pair
    pub fn matches(&self, a: &Allele, b: &Allele) -> bool {
        let (s0, s1) = (self.species0.uid(), self.species1.uid());
        (s0 == a.uid() && s1 == b.uid()) || (s0 == b.uid() && s1 == a.uid())
    }

    /// Whether `species` is one of the parents
    pub fn is_partner(&self, species: &Allele) -> bool {
        self.species0.uid() == species.uid() || self.species1.uid() == species.uid()
    }

    /// The other parent, if `species` is one of them
    pub fn partner_of(&self, species: &Allele) -> Option<&Arc<Allele>> {
        if self.species0.uid() == species.uid() {
            Some(&self.species1)
        } else if self.species1.uid() == species.uid() {
            Some(&self.species0)
        } else {
            None
        }
    }

    /// A blacklisted parent or result makes the rule inert
    pub fn is_inert(&self, registry: &AlleleRegistry) -> bool {
        registry.is_blacklisted(self.result_species().uid())
            || registry.is_blacklisted(self.species0.uid())
            || registry.is_blacklisted(self.species1.uid())
    }

    /// Base chance scaled by every condition's multiplier
    pub fn effective_chance<X: BreedingContext + ?Sized>(
        &self,
        ctx: &X,
        position: Position,
        species0: &Allele,
        species1: &Allele,
        genome0: &Genome<C>,
        genome1: &Genome<C>,
    ) -> f32 {
        self.conditions.iter().fold(self.base_chance, |chance, condition| {
            chance * condition.chance(ctx, position, species0, species1, genome0, genome1)
        })
    }
}

/// Inputs of one mutation resolution
#[derive(Debug, Clone, Copy)]
pub struct MutationQuery<'a, C: ChromosomeSlot> {
    pub species0: &'a Allele,
    pub species1: &'a Allele,
    pub genome0: &'a Genome<C>,
    pub genome1: &'a Genome<C>,
    pub position: Position,
    /// Evaluate candidates in a random order
    pub shuffle: bool,
    /// Extra multiplier on every effective chance (breeding mode)
    pub chance_multiplier: f32,
}

impl<'a, C: ChromosomeSlot> MutationQuery<'a, C> {
    /// Query for the expressed species of two genomes
    pub fn new(genome0: &'a Genome<C>, genome1: &'a Genome<C>, position: Position) -> Self {
        Self {
            species0: genome0.primary(),
            species1: genome1.primary(),
            genome0,
            genome1,
            position,
            shuffle: false,
            chance_multiplier: 1.0,
        }
    }

    pub fn with_species(mut self, species0: &'a Allele, species1: &'a Allele) -> Self {
        self.species0 = species0;
        self.species1 = species1;
        self
    }

    pub fn shuffled(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_chance_multiplier(mut self, multiplier: f32) -> Self {
        self.chance_multiplier = multiplier;
        self
    }
}

/// Mutation that fired, with the chance it fired at
#[derive(Debug, Clone, Copy)]
pub struct MutationOutcome<'a, C: ChromosomeSlot> {
    pub mutation: &'a Mutation<C>,
    pub effective_chance: f32,
}

impl<C: ChromosomeSlot> MutationOutcome<'_, C> {
    pub fn result(&self) -> &Template<C> {
        self.mutation.result()
    }
}

/// Ordered collection of mutation rules
#[derive(Debug, Clone)]
pub struct MutationTable<C: ChromosomeSlot> {
    mutations: Vec<Mutation<C>>,
}

impl<C: ChromosomeSlot> Default for MutationTable<C> {
    fn default() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }
}

impl<C: ChromosomeSlot> MutationTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; it is appended to the evaluation order
    pub fn register(&mut self, mutation: Mutation<C>) {
        log::debug!(
            "Registered mutation {} ({}%)",
            mutation.key(),
            mutation.base_chance
        );
        self.mutations.push(mutation);
    }

    /// Rules in registration order
    pub fn mutations(&self) -> &[Mutation<C>] {
        &self.mutations
    }

    /// Rules that `species` takes part in as a parent
    pub fn combinations<'a>(&'a self, species: &'a Allele) -> impl Iterator<Item = &'a Mutation<C>> + 'a {
        self.mutations.iter().filter(move |m| m.is_partner(species))
    }

    /// Rules that produce `species`
    pub fn paths_to<'a>(&'a self, species: &'a Allele) -> impl Iterator<Item = &'a Mutation<C>> + 'a {
        self.mutations
            .iter()
            .filter(move |m| m.result_species().uid() == species.uid())
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Decide which mutation, if any, fires for a breeding pair
    pub fn resolve<'a, X: BreedingContext + ?Sized>(
        &'a self,
        registry: &AlleleRegistry,
        ctx: &mut X,
        query: &MutationQuery<'_, C>,
    ) -> Option<MutationOutcome<'a, C>> {
        let mut candidates: Vec<MutationOutcome<'a, C>> = self
            .mutations
            .iter()
            .filter(|m| m.matches(query.species0, query.species1))
            .filter(|m| {
                let inert = m.is_inert(registry);
                if inert {
                    log::debug!("Skipping blacklisted mutation {}", m.key());
                }
                !inert
            })
            .map(|mutation| MutationOutcome {
                mutation,
                effective_chance: mutation.effective_chance(
                    &*ctx,
                    query.position,
                    query.species0,
                    query.species1,
                    query.genome0,
                    query.genome1,
                ) * query.chance_multiplier,
            })
            .collect();

        if query.shuffle {
            shuffle(&mut candidates, ctx);
        }

        candidates.into_iter().find(|candidate| {
            let draw = ctx.random_float() * 100.0;
            draw < candidate.effective_chance
        })
    }
}

/// Fisher-Yates shuffle driven by the context's random source
fn shuffle<T, X: BreedingContext + ?Sized>(items: &mut [T], ctx: &mut X) {
    for i in (1..items.len()).rev() {
        let j = ((ctx.random_float() * (i + 1) as f32) as usize).min(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BiomeCategories, ScriptedContext};
    use crate::testing::{catalog, TestSlot};

    fn genomes(catalog: &crate::testing::Catalog) -> (Genome<TestSlot>, Genome<TestSlot>) {
        (
            Genome::from_template(&catalog.template("forest"), None).unwrap(),
            Genome::from_template(&catalog.template("meadow"), None).unwrap(),
        )
    }

    fn rule(catalog: &crate::testing::Catalog, result: &str, chance: f32) -> Mutation<TestSlot> {
        Mutation::new(
            catalog.allele("species.forest"),
            catalog.allele("species.meadow"),
            catalog.template(result),
            chance,
        )
        .unwrap()
    }

    #[test]
    fn test_result_template_needs_species() {
        let catalog = catalog();
        let err = Mutation::<TestSlot>::new(
            catalog.allele("species.forest"),
            catalog.allele("species.meadow"),
            Template::new(),
            10.0,
        )
        .unwrap_err();
        assert!(matches!(err, GeneticsError::IncompleteTemplate { slot: "species" }));
    }

    #[test]
    fn test_pair_is_unordered() {
        let catalog = catalog();
        let mutation = rule(&catalog, "common", 15.0);
        let forest = catalog.allele("species.forest");
        let meadow = catalog.allele("species.meadow");

        assert!(mutation.matches(&forest, &meadow));
        assert!(mutation.matches(&meadow, &forest));
        assert!(!mutation.matches(&forest, &forest));
        assert_eq!(mutation.key(), "species.forest+species.meadow=species.common");
        assert_eq!(mutation.partner_of(&meadow).unwrap().uid(), "species.forest");
    }

    #[test]
    fn test_self_pair_requires_identical_parents() {
        let catalog = catalog();
        let forest = catalog.allele("species.forest");
        let mutation = Mutation::<TestSlot>::new(
            Arc::clone(&forest),
            Arc::clone(&forest),
            catalog.template("common"),
            100.0,
        )
        .unwrap();

        assert!(mutation.matches(&forest, &forest));
        assert!(!mutation.matches(&forest, &catalog.allele("species.meadow")));
    }

    #[test]
    fn test_biome_gated_chance_threshold() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(
            rule(&catalog, "common", 15.0)
                .restrict(MutationCondition::biome(BiomeCategories::FOREST)),
        );
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO);

        // 0.1499 * 100 < 15
        let mut ctx = ScriptedContext::new([0.1499], BiomeCategories::FOREST);
        let outcome = table.resolve(&catalog.registry, &mut ctx, &query).unwrap();
        assert_eq!(outcome.effective_chance, 15.0);
        assert_eq!(outcome.result().species().unwrap().uid(), "species.common");

        let mut ctx = ScriptedContext::new([0.15], BiomeCategories::FOREST);
        assert!(table.resolve(&catalog.registry, &mut ctx, &query).is_none());

        // Wrong biome zeroes the chance
        let mut ctx = ScriptedContext::new([0.0], BiomeCategories::DRY);
        assert!(table.resolve(&catalog.registry, &mut ctx, &query).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 100.0));
        table.register(rule(&catalog, "noble", 100.0));
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO);

        for draw in [0.0, 0.5, 0.999] {
            let mut ctx = ScriptedContext::new([draw, draw], BiomeCategories::PLAINS);
            let outcome = table.resolve(&catalog.registry, &mut ctx, &query).unwrap();
            assert_eq!(outcome.mutation.result_species().uid(), "species.common");
            assert_eq!(ctx.consumed(), 1);
        }
    }

    #[test]
    fn test_later_candidate_gets_its_own_draw() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 10.0));
        table.register(rule(&catalog, "noble", 50.0));
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO);

        let mut ctx = ScriptedContext::new([0.2, 0.4], BiomeCategories::PLAINS);
        let outcome = table.resolve(&catalog.registry, &mut ctx, &query).unwrap();
        assert_eq!(outcome.mutation.result_species().uid(), "species.noble");
        assert_eq!(ctx.consumed(), 2);
    }

    #[test]
    fn test_same_draws_same_outcome() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 30.0));
        table.register(rule(&catalog, "noble", 30.0));
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO).shuffled(true);

        let draws = [0.7, 0.45, 0.1, 0.9];
        let pick = |draws: [f32; 4]| {
            let mut ctx = ScriptedContext::new(draws, BiomeCategories::PLAINS);
            table
                .resolve(&catalog.registry, &mut ctx, &query)
                .map(|o| o.mutation.key())
        };
        assert_eq!(pick(draws), pick(draws));
    }

    #[test]
    fn test_shuffle_can_change_the_winner() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 100.0));
        table.register(rule(&catalog, "noble", 100.0));
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO).shuffled(true);

        // One shuffle draw for two candidates, then one resolution draw
        for (swap_draw, winner) in [(0.1, "species.noble"), (0.7, "species.common")] {
            let mut ctx = ScriptedContext::new([swap_draw, 0.0], BiomeCategories::PLAINS);
            let outcome = table.resolve(&catalog.registry, &mut ctx, &query).unwrap();
            assert_eq!(outcome.result().get(TestSlot::Species).unwrap().uid(), winner);
            assert_eq!(ctx.consumed(), 2);
        }

        // The table keeps registration order for unshuffled queries
        let ordered = MutationQuery::new(&forest, &meadow, Position::ZERO);
        let mut ctx = ScriptedContext::new([0.0], BiomeCategories::PLAINS);
        let outcome = table.resolve(&catalog.registry, &mut ctx, &ordered).unwrap();
        assert_eq!(outcome.mutation.key(), "species.forest+species.meadow=species.common");
    }

    #[test]
    fn test_blacklisted_parent_disables_rule() {
        let mut catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 100.0));
        catalog.registry.blacklist("species.forest");
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO);

        for draw in [0.0, 0.3, 0.9] {
            let mut ctx = ScriptedContext::new([draw; 4], BiomeCategories::FOREST);
            assert!(table.resolve(&catalog.registry, &mut ctx, &query).is_none());
        }
    }

    #[test]
    fn test_blacklisted_result_disables_rule() {
        let mut catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 100.0));
        catalog.registry.blacklist("species.common");
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO);

        let mut ctx = ScriptedContext::new([0.0], BiomeCategories::FOREST);
        assert!(table.resolve(&catalog.registry, &mut ctx, &query).is_none());
    }

    #[test]
    fn test_chance_multiplier_scales_all_candidates() {
        let catalog = catalog();
        let (forest, meadow) = genomes(&catalog);
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 20.0));
        let query = MutationQuery::new(&forest, &meadow, Position::ZERO).with_chance_multiplier(0.5);

        let mut ctx = ScriptedContext::new([0.05], BiomeCategories::PLAINS);
        let outcome = table.resolve(&catalog.registry, &mut ctx, &query).unwrap();
        assert_eq!(outcome.effective_chance, 10.0);

        let mut ctx = ScriptedContext::new([0.15], BiomeCategories::PLAINS);
        assert!(table.resolve(&catalog.registry, &mut ctx, &query).is_none());
    }

    #[test]
    fn test_combinations_and_paths() {
        let catalog = catalog();
        let mut table = MutationTable::new();
        table.register(rule(&catalog, "common", 15.0));
        table.register(
            Mutation::new(
                catalog.allele("species.common"),
                catalog.allele("species.forest"),
                catalog.template("noble"),
                10.0,
            )
            .unwrap(),
        );

        let common = catalog.allele("species.common");
        assert_eq!(table.combinations(&common).count(), 1);
        assert_eq!(table.paths_to(&common).count(), 1);
        assert_eq!(table.combinations(&catalog.allele("species.forest")).count(), 2);
    }
}
