//! Breeding trackers
//!
//! A tracker records which species and mutations a player has discovered,
//! how many births it has seen, and which breeding mode is selected. The
//! store keeps one tracker per player plus a shared "common" tracker and
//! persists them as RON files named `<root-uid>.<key>`.

use crate::chromosome::ChromosomeSlot;
use crate::error::{GeneticsError, Result};
use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Key of the tracker shared by every player
pub const COMMON_KEY: &str = "common";

/// Per-player discovery ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingTracker {
    #[serde(default)]
    discovered_species: BTreeSet<String>,
    #[serde(default)]
    discovered_mutations: BTreeSet<String>,
    #[serde(default)]
    mode_name: Option<String>,
    #[serde(default)]
    births: u64,
}

impl BreedingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a species as discovered; returns true if it was new
    pub fn register_species(&mut self, species_uid: &str) -> bool {
        self.discovered_species.insert(species_uid.to_string())
    }

    /// Record a mutation key as discovered; returns true if it was new
    pub fn register_mutation(&mut self, mutation_key: &str) -> bool {
        self.discovered_mutations.insert(mutation_key.to_string())
    }

    pub fn is_species_discovered(&self, species_uid: &str) -> bool {
        self.discovered_species.contains(species_uid)
    }

    pub fn is_mutation_discovered(&self, mutation_key: &str) -> bool {
        self.discovered_mutations.contains(mutation_key)
    }

    /// Count a birth and discover both of its species
    pub fn register_birth<C: ChromosomeSlot>(&mut self, genome: &Genome<C>) {
        self.births += 1;
        self.register_species(genome.primary().uid());
        self.register_species(genome.secondary().uid());
    }

    pub fn births(&self) -> u64 {
        self.births
    }

    pub fn discovered_species(&self) -> impl Iterator<Item = &str> {
        self.discovered_species.iter().map(String::as_str)
    }

    pub fn discovered_mutations(&self) -> impl Iterator<Item = &str> {
        self.discovered_mutations.iter().map(String::as_str)
    }

    pub fn species_discovered_count(&self) -> usize {
        self.discovered_species.len()
    }

    pub fn mode_name(&self) -> Option<&str> {
        self.mode_name.as_deref()
    }

    pub fn set_mode_name(&mut self, name: &str) {
        self.mode_name = Some(name.to_string());
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, Default::default())
            .map_err(|e| GeneticsError::Serialization(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GeneticsError::Serialization(e.to_string()))
    }
}

/// Trackers of one species root, keyed by player id or [`COMMON_KEY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStore {
    root_uid: String,
    trackers: BTreeMap<String, BreedingTracker>,
}

impl TrackerStore {
    pub fn new(root_uid: &str) -> Self {
        Self {
            root_uid: root_uid.to_string(),
            trackers: BTreeMap::new(),
        }
    }

    pub fn root_uid(&self) -> &str {
        &self.root_uid
    }

    /// Tracker of a player, or the common tracker for `None`; created on first use
    pub fn tracker(&mut self, player: Option<&str>) -> &mut BreedingTracker {
        let key = player.unwrap_or(COMMON_KEY);
        self.trackers.entry(key.to_string()).or_default()
    }

    pub fn common(&mut self) -> &mut BreedingTracker {
        self.tracker(None)
    }

    /// Read-only lookup that does not create missing trackers
    pub fn get(&self, player: Option<&str>) -> Option<&BreedingTracker> {
        self.trackers.get(player.unwrap_or(COMMON_KEY))
    }

    /// Keys of the trackers currently held
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.trackers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    fn file_name(&self, key: &str) -> String {
        format!("{}.{}", self.root_uid, key)
    }

    /// Write every tracker to `dir`, one file per key
    pub fn save_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.trackers.len());
        for (key, tracker) in &self.trackers {
            let path = dir.join(self.file_name(key));
            let serialized = tracker.to_ron()?;

            // Write to a temp file, then rename over the old one
            let temp_path = dir.join(format!("{}.tmp", self.file_name(key)));
            std::fs::write(&temp_path, serialized)?;
            std::fs::rename(&temp_path, &path)?;

            log::debug!("Saved tracker '{}' to {:?}", key, path);
            written.push(path);
        }
        Ok(written)
    }

    /// Load every `<root-uid>.<key>` tracker file found in `dir`.
    /// A missing directory yields an empty store.
    pub fn load_from_dir(root_uid: &str, dir: &Path) -> Result<Self> {
        let mut store = Self::new(root_uid);
        if !dir.exists() {
            log::warn!("Tracker directory {:?} does not exist, starting fresh", dir);
            return Ok(store);
        }

        let prefix = format!("{}.", root_uid);
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(key) = name.strip_prefix(&prefix) else {
                continue;
            };
            if key.is_empty() || key.ends_with(".tmp") {
                continue;
            }

            let text = std::fs::read_to_string(entry.path())?;
            let tracker = BreedingTracker::from_ron(&text)?;
            store.trackers.insert(key.to_string(), tracker);
        }

        log::debug!("Loaded {} trackers for {}", store.trackers.len(), root_uid);
        Ok(store)
    }

    /// Whole store as one RON document
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, Default::default())
            .map_err(|e| GeneticsError::Serialization(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GeneticsError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, TestSlot};
    use tempfile::TempDir;

    fn sample_tracker() -> BreedingTracker {
        let mut tracker = BreedingTracker::new();
        tracker.register_species("species.forest");
        tracker.register_species("species.meadow");
        tracker.register_mutation("species.forest+species.meadow=species.common");
        tracker.set_mode_name("hard");
        tracker
    }

    #[test]
    fn test_register_reports_novelty() {
        let mut tracker = BreedingTracker::new();
        assert!(tracker.register_species("species.forest"));
        assert!(!tracker.register_species("species.forest"));
        assert!(tracker.is_species_discovered("species.forest"));
        assert!(!tracker.is_mutation_discovered("a+b=c"));
    }

    #[test]
    fn test_birth_discovers_both_species() {
        let catalog = catalog();
        let genome = Genome::<TestSlot>::from_templates(
            &catalog.template("forest"),
            &catalog.template("noble"),
            None,
        )
        .unwrap();

        let mut tracker = BreedingTracker::new();
        tracker.register_birth(&genome);
        assert_eq!(tracker.births(), 1);
        assert!(tracker.is_species_discovered("species.forest"));
        assert!(tracker.is_species_discovered("species.noble"));
    }

    #[test]
    fn test_tracker_ron_roundtrip() {
        let tracker = sample_tracker();
        let restored = BreedingTracker::from_ron(&tracker.to_ron().unwrap()).unwrap();

        assert_eq!(
            restored.discovered_species().collect::<Vec<_>>(),
            tracker.discovered_species().collect::<Vec<_>>()
        );
        assert_eq!(restored, tracker);
    }

    #[test]
    fn test_missing_fields_default() {
        let tracker = BreedingTracker::from_ron("(discovered_species: [\"species.forest\"])").unwrap();
        assert!(tracker.is_species_discovered("species.forest"));
        assert_eq!(tracker.mode_name(), None);
        assert_eq!(tracker.births(), 0);
    }

    #[test]
    fn test_store_creates_trackers_lazily() {
        let mut store = TrackerStore::new("rootBees");
        assert!(store.get(Some("alice")).is_none());

        store.tracker(Some("alice")).register_species("species.forest");
        store.common().set_mode_name("normal");

        assert!(store
            .get(Some("alice"))
            .unwrap()
            .is_species_discovered("species.forest"));
        assert_eq!(store.get(None).unwrap().mode_name(), Some("normal"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["alice", "common"]);
    }

    #[test]
    fn test_store_document_roundtrip() {
        let mut store = TrackerStore::new("rootTrees");
        *store.tracker(Some("bob")) = sample_tracker();
        store.common().register_species("species.oak");

        let restored = TrackerStore::from_ron(&store.to_ron().unwrap()).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_save_and_load_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = TrackerStore::new("rootBees");
        *store.tracker(Some("carol")) = sample_tracker();
        store.common().set_mode_name("easy");

        let written = store.save_to_dir(temp_dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(temp_dir.path().join("rootBees.common").exists());
        assert!(temp_dir.path().join("rootBees.carol").exists());

        // Files of other roots are ignored
        std::fs::write(temp_dir.path().join("rootTrees.common"), "()").unwrap();

        let loaded = TrackerStore::load_from_dir("rootBees", temp_dir.path()).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded =
            TrackerStore::load_from_dir("rootBees", &temp_dir.path().join("absent")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("rootBees.common"), "not ron at all (").unwrap();

        assert!(matches!(
            TrackerStore::load_from_dir("rootBees", temp_dir.path()),
            Err(GeneticsError::Serialization(_))
        ));
    }
}
