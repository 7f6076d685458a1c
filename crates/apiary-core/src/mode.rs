//! Breeding modes
//!
//! A mode is a world-wide difficulty setting that scales fertility, fruit
//! yield, maturation time and mutation chances. The selected mode's name is
//! remembered in the common breeding tracker.

use apiary_genetics::{GeneticsError, Result, TrackerStore};
use serde::{Deserialize, Serialize};

/// Multipliers a mode applies to genome values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeModifiers {
    pub fertility: f32,
    #[serde(rename = "yield")]
    pub production: f32,
    pub maturation: f32,
    pub mutation: f32,
}

impl Default for ModeModifiers {
    fn default() -> Self {
        Self {
            fertility: 1.0,
            production: 1.0,
            maturation: 1.0,
            mutation: 1.0,
        }
    }
}

/// Named difficulty setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingMode {
    name: String,
    description: Vec<String>,
    modifiers: ModeModifiers,
}

impl BreedingMode {
    pub fn new(name: &str, description: &[&str], modifiers: ModeModifiers) -> Self {
        Self {
            name: name.to_string(),
            description: description.iter().map(|s| s.to_string()).collect(),
            modifiers,
        }
    }

    /// Relaxed mode: quick growth, generous yields
    pub fn easy() -> Self {
        Self::new(
            "easy",
            &["Saplings and fruit come easily.", "Trees mature in half the time."],
            ModeModifiers {
                fertility: 1.5,
                production: 2.0,
                maturation: 0.5,
                mutation: 1.5,
            },
        )
    }

    pub fn normal() -> Self {
        Self::new("normal", &["Unmodified breeding."], ModeModifiers::default())
    }

    pub fn hard() -> Self {
        Self::new(
            "hard",
            &["Fewer saplings and slightly slower growth."],
            ModeModifiers {
                fertility: 0.8,
                production: 0.9,
                maturation: 1.5,
                mutation: 0.9,
            },
        )
    }

    pub fn hardcore() -> Self {
        Self::new(
            "hardcore",
            &["Scarce saplings and fruit.", "Mutations are rare."],
            ModeModifiers {
                fertility: 0.6,
                production: 0.7,
                maturation: 2.0,
                mutation: 0.6,
            },
        )
    }

    pub fn insane() -> Self {
        Self::new(
            "insane",
            &["Barely anything reproduces.", "Mutations almost never happen."],
            ModeModifiers {
                fertility: 0.3,
                production: 0.5,
                maturation: 3.0,
                mutation: 0.3,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn modifiers(&self) -> &ModeModifiers {
        &self.modifiers
    }

    pub fn fertility_modifier(&self, base: f32) -> f32 {
        base * self.modifiers.fertility
    }

    pub fn yield_modifier(&self, base: f32) -> f32 {
        base * self.modifiers.production
    }

    pub fn maturation_modifier(&self, base: f32) -> f32 {
        base * self.modifiers.maturation
    }

    pub fn mutation_modifier(&self, base: f32) -> f32 {
        base * self.modifiers.mutation
    }
}

/// Ordered list of modes plus the currently active one
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    modes: Vec<BreedingMode>,
    active: Option<usize>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in modes, `easy` first
    pub fn with_defaults() -> Self {
        Self {
            modes: vec![
                BreedingMode::easy(),
                BreedingMode::normal(),
                BreedingMode::hard(),
                BreedingMode::hardcore(),
                BreedingMode::insane(),
            ],
            active: None,
        }
    }

    pub fn register_mode(&mut self, mode: BreedingMode) -> Result<()> {
        if self.modes.iter().any(|m| m.name == mode.name) {
            return Err(GeneticsError::DuplicateIdentifier(mode.name));
        }
        log::debug!("Registered breeding mode '{}'", mode.name);
        self.modes.push(mode);
        Ok(())
    }

    pub fn modes(&self) -> &[BreedingMode] {
        &self.modes
    }

    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(BreedingMode::name).collect()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        if self.modes.is_empty() {
            return Err(GeneticsError::NoModes);
        }

        let lower = name.to_lowercase();
        Ok(self
            .modes
            .iter()
            .position(|m| m.name == name || m.name == lower)
            .unwrap_or_else(|| {
                log::warn!(
                    "No breeding mode called '{}', falling back to '{}'",
                    name,
                    self.modes[0].name
                );
                0
            }))
    }

    /// Mode by exact or lower-cased name, else the first registered mode
    pub fn mode(&self, name: &str) -> Result<&BreedingMode> {
        let index = self.index_of(name)?;
        Ok(&self.modes[index])
    }

    /// The active mode, picking one on first use: the name stored in the
    /// common tracker if any, otherwise `default_name`
    pub fn active_mode(&mut self, trackers: &mut TrackerStore, default_name: &str) -> Result<&BreedingMode> {
        if let Some(index) = self.active {
            return Ok(&self.modes[index]);
        }

        let name = trackers
            .common()
            .mode_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(default_name)
            .to_string();
        self.set_mode(trackers, &name)
    }

    /// Activate a mode and remember its name in the common tracker
    pub fn set_mode(&mut self, trackers: &mut TrackerStore, name: &str) -> Result<&BreedingMode> {
        let index = self.index_of(name)?;
        self.active = Some(index);
        let mode = &self.modes[index];
        trackers.common().set_mode_name(&mode.name);
        log::debug!(
            "Set breeding mode for {} to '{}'",
            trackers.root_uid(),
            mode.name
        );
        Ok(mode)
    }

    /// Forget the active mode so the next lookup re-reads the tracker
    pub fn reset_mode(&mut self) {
        self.active = None;
    }
}
