//! Sapling maturation
//!
//! A planted sapling counts world ticks. Once it has matured, the host's
//! [`TreeGrower`] is asked to place the grown tree; a successful growth is
//! recorded as a birth in the owner's tracker.

use crate::tree::{Tree, TreeRoot};
use apiary_genetics::{Position, Result};
use serde::{Deserialize, Serialize};

/// Host hook that turns a matured sapling into a tree in the world
pub trait TreeGrower {
    /// Place the grown tree; returns whether generation succeeded
    fn generate(&mut self, tree: &Tree, position: Position, bonemealed: bool) -> bool;

    /// Whether a matured sapling has room to grow right now
    fn can_grow(&self, _tree: &Tree, _position: Position) -> bool {
        true
    }
}

/// Result of one growth attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Not mature yet
    Maturing,
    /// Mature, but the grower could not place the tree
    Blocked,
    /// The tree was generated
    Grown,
}

/// A planted sapling
#[derive(Debug, Clone)]
pub struct Sapling {
    tree: Tree,
    owner: Option<String>,
    position: Position,
    times_ticked: u32,
}

/// Persisted tick counter of a sapling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaplingState {
    pub times_ticked: u32,
}

impl Sapling {
    pub fn new(tree: Tree, owner: Option<&str>, position: Position) -> Self {
        Self {
            tree,
            owner: owner.map(str::to_string),
            position,
            times_ticked: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn times_ticked(&self) -> u32 {
        self.times_ticked
    }

    pub fn state(&self) -> SaplingState {
        SaplingState {
            times_ticked: self.times_ticked,
        }
    }

    pub fn restore_state(&mut self, state: SaplingState) {
        self.times_ticked = state.times_ticked;
    }

    /// Advance one tick and try to grow
    pub fn on_tick(&mut self, root: &mut TreeRoot, grower: &mut impl TreeGrower) -> Result<Growth> {
        self.times_ticked += 1;
        self.try_grow(root, grower, false)
    }

    /// Bonemeal helps while maturing; afterwards it depends on the grower
    pub fn can_accept_bonemeal(&self, root: &mut TreeRoot, grower: &impl TreeGrower) -> Result<bool> {
        if self.times_ticked < root.required_maturity(&self.tree)? {
            return Ok(true);
        }
        Ok(grower.can_grow(&self.tree, self.position))
    }

    /// Grow if mature. Bonemeal on an immature sapling skips straight to
    /// maturity without growing in the same call.
    pub fn try_grow(
        &mut self,
        root: &mut TreeRoot,
        grower: &mut impl TreeGrower,
        bonemealed: bool,
    ) -> Result<Growth> {
        let maturity = root.required_maturity(&self.tree)?;
        if self.times_ticked < maturity {
            if bonemealed {
                self.times_ticked = maturity;
            }
            return Ok(Growth::Maturing);
        }

        if !grower.generate(&self.tree, self.position, bonemealed) {
            return Ok(Growth::Blocked);
        }

        log::debug!(
            "Sapling of {} grew at {:?}",
            self.tree.genome().primary(),
            self.position
        );
        root.trackers_mut()
            .tracker(self.owner.as_deref())
            .register_birth(self.tree.genome());
        Ok(Growth::Grown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{register_default_trees, TreeSpecies};
    use apiary_genetics::{AlleleRegistry, BiomeCategories, ScriptedContext};

    /// Grower that records calls and succeeds when told to
    struct TestGrower {
        succeed: bool,
        generated: Vec<Position>,
    }

    impl TreeGrower for TestGrower {
        fn generate(&mut self, _tree: &Tree, position: Position, _bonemealed: bool) -> bool {
            if self.succeed {
                self.generated.push(position);
            }
            self.succeed
        }

        fn can_grow(&self, _tree: &Tree, _position: Position) -> bool {
            self.succeed
        }
    }

    fn planted(owner: Option<&str>) -> (TreeRoot, Sapling) {
        let mut registry = AlleleRegistry::new();
        let mut root = TreeRoot::trees();
        register_default_trees(&mut registry, &mut root).unwrap();
        root.set_mode("normal").unwrap();

        let oak = root
            .template_as_individual(root.template(TreeSpecies::Oak.uid()).unwrap())
            .unwrap();
        (root, Sapling::new(oak, owner, Position::new(4, 70, -2)))
    }

    #[test]
    fn test_grows_after_required_ticks() {
        let (mut root, mut sapling) = planted(Some("erin"));
        let mut grower = TestGrower {
            succeed: true,
            generated: Vec::new(),
        };

        // Oak matures in 5 ticks under "normal"
        for _ in 0..4 {
            assert_eq!(sapling.on_tick(&mut root, &mut grower).unwrap(), Growth::Maturing);
        }
        assert_eq!(sapling.on_tick(&mut root, &mut grower).unwrap(), Growth::Grown);
        assert_eq!(grower.generated, vec![Position::new(4, 70, -2)]);
        assert_eq!(root.trackers().get(Some("erin")).unwrap().births(), 1);
    }

    #[test]
    fn test_bonemeal_skips_to_maturity() {
        let (mut root, mut sapling) = planted(None);
        let mut grower = TestGrower {
            succeed: true,
            generated: Vec::new(),
        };

        assert!(sapling.can_accept_bonemeal(&mut root, &grower).unwrap());
        assert_eq!(
            sapling.try_grow(&mut root, &mut grower, true).unwrap(),
            Growth::Maturing
        );
        assert_eq!(sapling.times_ticked(), 5);
        assert!(grower.generated.is_empty());

        assert_eq!(
            sapling.try_grow(&mut root, &mut grower, true).unwrap(),
            Growth::Grown
        );
        assert_eq!(root.trackers().get(None).unwrap().births(), 1);
    }

    #[test]
    fn test_blocked_growth_records_nothing() {
        let (mut root, mut sapling) = planted(Some("finn"));
        let mut grower = TestGrower {
            succeed: false,
            generated: Vec::new(),
        };
        sapling.restore_state(SaplingState { times_ticked: 5 });

        assert!(!sapling.can_accept_bonemeal(&mut root, &grower).unwrap());
        assert_eq!(
            sapling.on_tick(&mut root, &mut grower).unwrap(),
            Growth::Blocked
        );
        assert!(root.trackers().get(Some("finn")).is_none());
    }

    #[test]
    fn test_dropped_sapling_counts_one_birth() {
        let mut registry = AlleleRegistry::new();
        let mut root = TreeRoot::trees();
        register_default_trees(&mut registry, &mut root).unwrap();
        root.set_mode("normal").unwrap();
        let oak = root
            .template_as_individual(root.template(TreeSpecies::Oak.uid()).unwrap())
            .unwrap();

        let mut ctx = ScriptedContext::new([0.0], BiomeCategories::FOREST).with_fallback(0.0);
        let mut dropped = root
            .saplings(&registry, &mut ctx, Position::ZERO, &oak, Some("gale"), 1.0)
            .unwrap();
        assert_eq!(dropped.len(), 1);
        assert!(root.trackers().get(Some("gale")).map_or(true, |t| t.births() == 0));

        let mut sapling = Sapling::new(dropped.remove(0), Some("gale"), Position::ZERO);
        let mut grower = TestGrower {
            succeed: true,
            generated: Vec::new(),
        };
        assert_eq!(
            sapling.try_grow(&mut root, &mut grower, true).unwrap(),
            Growth::Maturing
        );
        assert_eq!(
            sapling.try_grow(&mut root, &mut grower, true).unwrap(),
            Growth::Grown
        );

        let tracker = root.trackers().get(Some("gale")).unwrap();
        assert_eq!(tracker.births(), 1);
        assert!(tracker.is_species_discovered(TreeSpecies::Oak.uid()));
    }
}
