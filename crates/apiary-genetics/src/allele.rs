//! Allele definitions
//!
//! An allele is an immutable trait value that can sit in a chromosome slot.
//! Payloads form a closed set: species markers, plain numeric/boolean traits,
//! effects and fruit providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Creature kinds that own species alleles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesKind {
    Bee,
    Tree,
}

impl SpeciesKind {
    /// Unique identifier of the species root for this kind
    pub fn root_uid(self) -> &'static str {
        match self {
            Self::Bee => "rootBees",
            Self::Tree => "rootTrees",
        }
    }
}

/// Species-specific allele data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    pub kind: SpeciesKind,
    /// Whether the species contributes to species-count statistics
    pub counted: bool,
    /// Fruit families this species can bear (trees only)
    #[serde(default)]
    pub suitable_fruit: Vec<String>,
}

/// A fruit-bearing provider with chance-weighted products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitTraits {
    pub family: String,
    /// Product identifier and its chance modifier
    pub products: Vec<(String, f32)>,
    pub requires_fruit_blocks: bool,
    pub colour: u32,
}

impl FruitTraits {
    /// Provider that never bears anything
    pub fn none() -> Self {
        Self {
            family: "none".to_string(),
            products: Vec::new(),
            requires_fruit_blocks: false,
            colour: 0xffffff,
        }
    }

    /// Check if this is the empty provider
    pub fn is_none(&self) -> bool {
        self.family == "none" && self.products.is_empty()
    }
}

/// Typed payload of an allele
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlleleValue {
    Species(SpeciesTraits),
    Float(f32),
    Integer(i32),
    Boolean(bool),
    Effect {
        /// Whether the effect may run alongside a second one
        combinable: bool,
    },
    Fruit(FruitTraits),
}

/// An immutable trait value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allele {
    uid: String,
    name: String,
    dominant: bool,
    value: AlleleValue,
}

impl Allele {
    pub fn new(uid: impl Into<String>, name: impl Into<String>, dominant: bool, value: AlleleValue) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            dominant,
            value,
        }
    }

    /// Create a species allele
    pub fn species(uid: &str, name: &str, dominant: bool, kind: SpeciesKind) -> Self {
        Self::new(
            uid,
            name,
            dominant,
            AlleleValue::Species(SpeciesTraits {
                kind,
                counted: true,
                suitable_fruit: Vec::new(),
            }),
        )
    }

    /// Create a float trait allele
    pub fn float(uid: &str, name: &str, dominant: bool, value: f32) -> Self {
        Self::new(uid, name, dominant, AlleleValue::Float(value))
    }

    /// Create an integer trait allele
    pub fn integer(uid: &str, name: &str, dominant: bool, value: i32) -> Self {
        Self::new(uid, name, dominant, AlleleValue::Integer(value))
    }

    /// Create a boolean trait allele
    pub fn boolean(uid: &str, name: &str, dominant: bool, value: bool) -> Self {
        Self::new(uid, name, dominant, AlleleValue::Boolean(value))
    }

    /// Create an effect allele
    pub fn effect(uid: &str, name: &str, dominant: bool, combinable: bool) -> Self {
        Self::new(uid, name, dominant, AlleleValue::Effect { combinable })
    }

    /// Create a fruit provider allele
    pub fn fruit(uid: &str, name: &str, dominant: bool, fruit: FruitTraits) -> Self {
        Self::new(uid, name, dominant, AlleleValue::Fruit(fruit))
    }

    /// Exclude a species allele from species-count statistics
    pub fn uncounted(mut self) -> Self {
        if let AlleleValue::Species(traits) = &mut self.value {
            traits.counted = false;
        }
        self
    }

    /// Set the fruit families a tree species can bear
    pub fn with_suitable_fruit(mut self, families: &[&str]) -> Self {
        if let AlleleValue::Species(traits) = &mut self.value {
            traits.suitable_fruit = families.iter().map(|f| f.to_string()).collect();
        }
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dominant(&self) -> bool {
        self.dominant
    }

    pub fn value(&self) -> &AlleleValue {
        &self.value
    }

    pub fn species_traits(&self) -> Option<&SpeciesTraits> {
        match &self.value {
            AlleleValue::Species(traits) => Some(traits),
            _ => None,
        }
    }

    pub fn fruit_traits(&self) -> Option<&FruitTraits> {
        match &self.value {
            AlleleValue::Fruit(fruit) => Some(fruit),
            _ => None,
        }
    }

    /// Numeric reading of the payload (booleans map to 0/1)
    pub fn as_f32(&self) -> Option<f32> {
        match self.value {
            AlleleValue::Float(v) => Some(v),
            AlleleValue::Integer(v) => Some(v as f32),
            AlleleValue::Boolean(v) => Some(if v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.value {
            AlleleValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            AlleleValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this is a species allele of the given kind
    pub fn is_species_of(&self, kind: SpeciesKind) -> bool {
        self.species_traits().is_some_and(|t| t.kind == kind)
    }

    /// Effect alleles report their combinable flag, everything else is not combinable
    pub fn is_combinable(&self) -> bool {
        matches!(self.value, AlleleValue::Effect { combinable: true })
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
