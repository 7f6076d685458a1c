//! Allele registry
//!
//! Catalog of every allele known to the process, keyed by identifier.
//! Registration happens during a single build phase at startup; afterwards
//! the registry is read by breeding code and only the blacklist may change.
//!
//! The registry is not thread-safe (species counts are cached behind a
//! `RefCell`). Hosts that breed from several threads must serialize access.

use crate::allele::{Allele, SpeciesKind};
use crate::error::{GeneticsError, Result};
use ahash::{HashMap, HashSet};
use std::cell::RefCell;
use std::sync::Arc;

/// Registry of all alleles
#[derive(Debug, Default)]
pub struct AlleleRegistry {
    alleles: HashMap<String, Arc<Allele>>,
    /// Registration order, for deterministic iteration
    order: Vec<String>,
    blacklist: HashSet<String>,
    species_counts: RefCell<HashMap<SpeciesKind, usize>>,
}

impl AlleleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an allele, returning the shared handle stored in the registry
    pub fn register(&mut self, allele: Allele) -> Result<Arc<Allele>> {
        if self.alleles.contains_key(allele.uid()) {
            return Err(GeneticsError::DuplicateIdentifier(allele.uid().to_string()));
        }

        let uid = allele.uid().to_string();
        let allele = Arc::new(allele);
        log::debug!("Registered allele '{}'", uid);
        self.alleles.insert(uid.clone(), Arc::clone(&allele));
        self.order.push(uid);
        self.species_counts.borrow_mut().clear();
        Ok(allele)
    }

    /// Look up an allele by identifier
    pub fn lookup(&self, uid: &str) -> Result<Arc<Allele>> {
        self.alleles
            .get(uid)
            .cloned()
            .ok_or_else(|| GeneticsError::NotFound(uid.to_string()))
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.alleles.contains_key(uid)
    }

    /// Disqualify an allele from mutations and species counts.
    /// The allele stays registered and can still be looked up.
    pub fn blacklist(&mut self, uid: &str) {
        if self.blacklist.insert(uid.to_string()) {
            log::debug!("Blacklisted allele '{}'", uid);
            self.species_counts.borrow_mut().clear();
        }
    }

    pub fn is_blacklisted(&self, uid: &str) -> bool {
        self.blacklist.contains(uid)
    }

    /// Iterate alleles in registration order
    pub fn alleles(&self) -> impl Iterator<Item = &Arc<Allele>> {
        self.order.iter().filter_map(|uid| self.alleles.get(uid))
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Number of registered, non-blacklisted, counted species of a kind.
    ///
    /// Cached per kind; `register` and `blacklist` invalidate the cache.
    pub fn species_count(&self, kind: SpeciesKind) -> usize {
        if let Some(&count) = self.species_counts.borrow().get(&kind) {
            return count;
        }

        let count = self
            .alleles
            .values()
            .filter(|allele| {
                allele
                    .species_traits()
                    .is_some_and(|traits| traits.kind == kind && traits.counted)
            })
            .filter(|allele| !self.is_blacklisted(allele.uid()))
            .count();

        self.species_counts.borrow_mut().insert(kind, count);
        count
    }
}
