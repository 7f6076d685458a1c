//! Species roots
//!
//! A species root is the entry point for one creature kind. It owns the
//! kind's templates, mutation table, breeding modes and trackers, and
//! turns templates into genomes and individuals. The allele registry is
//! shared between roots and passed in where needed.

use crate::mode::{BreedingMode, ModeRegistry};
use apiary_genetics::{
    AlleleRegistry, BreedingContext, ChromosomeSlot, GeneticsError, Genome, Individual,
    Inheritance, Mutation, MutationTable, Offspring, Position, Result, SpeciesKind, Template,
    TrackerStore,
};

/// Registration and breeding entry point for one creature kind
#[derive(Debug)]
pub struct SpeciesRoot<C: ChromosomeSlot> {
    kind: SpeciesKind,
    /// Registered templates in registration order
    templates: Vec<(String, Template<C>)>,
    individual_templates: Vec<Individual<C>>,
    default_template: Option<usize>,
    mutations: MutationTable<C>,
    modes: ModeRegistry,
    default_mode: String,
    trackers: TrackerStore,
    shuffle_mutations: bool,
}

impl<C: ChromosomeSlot> SpeciesRoot<C> {
    /// Empty root with the built-in breeding modes
    pub fn new(kind: SpeciesKind) -> Self {
        Self {
            kind,
            templates: Vec::new(),
            individual_templates: Vec::new(),
            default_template: None,
            mutations: MutationTable::new(),
            modes: ModeRegistry::with_defaults(),
            default_mode: "normal".to_string(),
            trackers: TrackerStore::new(kind.root_uid()),
            shuffle_mutations: false,
        }
    }

    pub fn uid(&self) -> &'static str {
        self.kind.root_uid()
    }

    pub fn kind(&self) -> SpeciesKind {
        self.kind
    }

    /// Register a species template under `uid`.
    ///
    /// Unset slots are filled from the default template, so stored
    /// templates are always complete. The first registered template
    /// becomes the default unless another one is chosen.
    pub fn register_template(&mut self, uid: &str, mut template: Template<C>) -> Result<()> {
        if self.templates.iter().any(|(existing, _)| existing == uid) {
            return Err(GeneticsError::DuplicateIdentifier(uid.to_string()));
        }
        if template.species().is_none() {
            return Err(GeneticsError::IncompleteTemplate {
                slot: C::SPECIES.name(),
            });
        }
        if let Ok(defaults) = self.default_template() {
            template.fill_from(defaults);
        }

        let individual = Individual::new(Genome::from_template(&template, None)?);
        log::debug!("Registered {} template '{}'", self.uid(), uid);
        self.templates.push((uid.to_string(), template));
        self.individual_templates.push(individual);
        if self.default_template.is_none() {
            self.default_template = Some(self.templates.len() - 1);
        }
        Ok(())
    }

    /// Choose which registered template fills unset slots
    pub fn set_default_template(&mut self, uid: &str) -> Result<()> {
        let index = self
            .templates
            .iter()
            .position(|(existing, _)| existing == uid)
            .ok_or_else(|| GeneticsError::UnknownTemplate(uid.to_string()))?;
        self.default_template = Some(index);
        Ok(())
    }

    pub fn template(&self, uid: &str) -> Result<&Template<C>> {
        self.templates
            .iter()
            .find(|(existing, _)| existing == uid)
            .map(|(_, template)| template)
            .ok_or_else(|| GeneticsError::UnknownTemplate(uid.to_string()))
    }

    pub fn template_uids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|(uid, _)| uid.as_str())
    }

    /// One pure-bred individual per registered template
    pub fn individual_templates(&self) -> &[Individual<C>] {
        &self.individual_templates
    }

    pub fn default_template(&self) -> Result<&Template<C>> {
        self.default_template
            .map(|index| &self.templates[index].1)
            .ok_or_else(|| GeneticsError::UnknownTemplate("default".to_string()))
    }

    pub fn template_as_genome(&self, template: &Template<C>) -> Result<Genome<C>> {
        Genome::from_template(template, self.default_template().ok())
    }

    pub fn templates_as_genome(&self, active: &Template<C>, inactive: &Template<C>) -> Result<Genome<C>> {
        Genome::from_templates(active, inactive, self.default_template().ok())
    }

    pub fn template_as_individual(&self, template: &Template<C>) -> Result<Individual<C>> {
        Ok(Individual::new(self.template_as_genome(template)?))
    }

    /// Add a mutation; rules involving an already blacklisted species are
    /// dropped. Returns whether the rule was added.
    pub fn register_mutation(&mut self, registry: &AlleleRegistry, mutation: Mutation<C>) -> bool {
        if mutation.is_inert(registry) {
            log::debug!("Ignoring blacklisted mutation {}", mutation.key());
            return false;
        }
        self.mutations.register(mutation);
        true
    }

    pub fn mutations(&self) -> &MutationTable<C> {
        &self.mutations
    }

    /// Counted, non-blacklisted species of this kind
    pub fn species_count(&self, registry: &AlleleRegistry) -> usize {
        registry.species_count(self.kind)
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeRegistry {
        &mut self.modes
    }

    /// Mode name used when no tracker has one yet
    pub fn set_default_mode(&mut self, name: &str) {
        self.default_mode = name.to_string();
    }

    pub fn active_mode(&mut self) -> Result<&BreedingMode> {
        self.modes.active_mode(&mut self.trackers, &self.default_mode)
    }

    pub fn set_mode(&mut self, name: &str) -> Result<&BreedingMode> {
        self.modes.set_mode(&mut self.trackers, name)
    }

    pub fn trackers(&self) -> &TrackerStore {
        &self.trackers
    }

    pub fn trackers_mut(&mut self) -> &mut TrackerStore {
        &mut self.trackers
    }

    /// Replace the tracker store, e.g. after loading it from disk
    pub fn set_trackers(&mut self, trackers: TrackerStore) {
        self.trackers = trackers;
        self.modes.reset_mode();
    }

    pub fn set_shuffle_mutations(&mut self, shuffle: bool) {
        self.shuffle_mutations = shuffle;
    }

    /// Breed `individual` under the active mode and record the results in
    /// `player`'s tracker (the common tracker for `None`)
    pub fn breed<X: BreedingContext + ?Sized>(
        &mut self,
        registry: &AlleleRegistry,
        ctx: &mut X,
        position: Position,
        individual: &Individual<C>,
        player: Option<&str>,
        fertility_modifier: f32,
    ) -> Result<Vec<Offspring<C>>> {
        self.reproduce(registry, ctx, position, individual, player, fertility_modifier, true)
    }

    /// Shared by `breed` and tree saplings. Discovered mutations are always
    /// recorded; births only when `register_births` is set, since a sapling's
    /// birth is recorded once it grows.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn reproduce<X: BreedingContext + ?Sized>(
        &mut self,
        registry: &AlleleRegistry,
        ctx: &mut X,
        position: Position,
        individual: &Individual<C>,
        player: Option<&str>,
        fertility_modifier: f32,
        register_births: bool,
    ) -> Result<Vec<Offspring<C>>> {
        let modifiers = *self
            .modes
            .active_mode(&mut self.trackers, &self.default_mode)?
            .modifiers();

        let inheritance = Inheritance::new(registry, &self.mutations)
            .shuffled(self.shuffle_mutations)
            .with_mutation_multiplier(modifiers.mutation);
        let offspring = individual.attempt_reproduction(
            &inheritance,
            ctx,
            position,
            fertility_modifier * modifiers.fertility,
        );

        let tracker = self.trackers.tracker(player);
        for child in &offspring {
            if register_births {
                tracker.register_birth(child.individual.genome());
            }
            if let Some(key) = &child.mutation {
                if tracker.register_mutation(key) {
                    log::info!("Discovered mutation {}", key);
                }
            }
        }
        Ok(offspring)
    }
}
