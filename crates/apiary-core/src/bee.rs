//! Bees: karyotype, life stages and item-level member stacks

use crate::species_root::SpeciesRoot;
use apiary_genetics::{
    AlleleRegistry, ChromosomeSlot, GeneticsError, Individual, IndividualSnapshot, Result,
    SpeciesKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeeChromosome {
    Species,
    Speed,
    Lifespan,
    Fertility,
    TemperatureTolerance,
    NeverSleeps,
    HumidityTolerance,
    ToleratesRain,
    CaveDwelling,
    Flowering,
    Territory,
    Effect,
}

impl BeeChromosome {
    pub const ALL: [BeeChromosome; 12] = [
        Self::Species,
        Self::Speed,
        Self::Lifespan,
        Self::Fertility,
        Self::TemperatureTolerance,
        Self::NeverSleeps,
        Self::HumidityTolerance,
        Self::ToleratesRain,
        Self::CaveDwelling,
        Self::Flowering,
        Self::Territory,
        Self::Effect,
    ];
}

impl ChromosomeSlot for BeeChromosome {
    const SPECIES: Self = Self::Species;
    const FERTILITY: Self = Self::Fertility;
    const EFFECT: Self = Self::Effect;

    fn karyotype() -> &'static [Self] {
        &Self::ALL
    }

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Speed => "speed",
            Self::Lifespan => "lifespan",
            Self::Fertility => "fertility",
            Self::TemperatureTolerance => "temperature_tolerance",
            Self::NeverSleeps => "never_sleeps",
            Self::HumidityTolerance => "humidity_tolerance",
            Self::ToleratesRain => "tolerates_rain",
            Self::CaveDwelling => "cave_dwelling",
            Self::Flowering => "flowering",
            Self::Territory => "territory",
            Self::Effect => "effect",
        }
    }
}

pub type Bee = Individual<BeeChromosome>;
pub type BeeRoot = SpeciesRoot<BeeChromosome>;

/// Life stage of a bee item; `None` marks things that are not bees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeeType {
    Drone,
    Princess,
    Queen,
    Larvae,
    None,
}

impl BeeType {
    pub const VALUES: [BeeType; 5] = [
        Self::Drone,
        Self::Princess,
        Self::Queen,
        Self::Larvae,
        Self::None,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VALUES.get(ordinal).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Drone => "drone",
            Self::Princess => "princess",
            Self::Queen => "queen",
            Self::Larvae => "larvae",
            Self::None => "none",
        }
    }
}

/// Item-level representation of a bee: its life stage and an encoded tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeStack {
    pub bee_type: BeeType,
    /// bincode-encoded [`IndividualSnapshot`]
    pub tag: Option<Vec<u8>>,
}

impl BeeStack {
    /// Stack that holds no bee
    pub fn empty() -> Self {
        Self {
            bee_type: BeeType::None,
            tag: None,
        }
    }

    fn snapshot(&self) -> Result<Option<IndividualSnapshot>> {
        let Some(tag) = &self.tag else {
            return Ok(None);
        };
        let (snapshot, _): (IndividualSnapshot, _) =
            bincode_next::serde::decode_from_slice(tag, bincode_next::config::standard())
                .map_err(|e| GeneticsError::Serialization(format!("{:?}", e)))?;
        Ok(Some(snapshot))
    }
}

impl SpeciesRoot<BeeChromosome> {
    /// Bee root with no templates or mutations yet
    pub fn bees() -> Self {
        Self::new(SpeciesKind::Bee)
    }

    pub fn bee_type(&self, stack: &BeeStack) -> BeeType {
        stack.bee_type
    }

    pub fn is_member(&self, stack: &BeeStack) -> bool {
        stack.bee_type != BeeType::None
    }

    pub fn is_member_of_type(&self, stack: &BeeStack, bee_type: BeeType) -> bool {
        stack.bee_type == bee_type
    }

    pub fn is_drone(&self, stack: &BeeStack) -> bool {
        stack.bee_type == BeeType::Drone
    }

    /// Only queens carrying a mate count as mated
    pub fn is_mated(&self, stack: &BeeStack) -> bool {
        stack.bee_type == BeeType::Queen
            && matches!(stack.snapshot(), Ok(Some(snapshot)) if snapshot.mate.is_some())
    }

    /// Encode a bee as a stack of the given type, or `None` for
    /// [`BeeType::None`]. Queens are always mated: an unmated bee mates
    /// with itself first.
    pub fn member_stack(&self, bee: &mut Bee, bee_type: BeeType) -> Result<Option<BeeStack>> {
        if bee_type == BeeType::None {
            return Ok(None);
        }
        if bee_type == BeeType::Queen && !bee.is_mated() {
            let own = bee.clone();
            bee.mate(&own);
        }

        let tag = bincode_next::serde::encode_to_vec(bee.snapshot(), bincode_next::config::standard())
            .map_err(|e| GeneticsError::Serialization(format!("{:?}", e)))?;
        Ok(Some(BeeStack {
            bee_type,
            tag: Some(tag),
        }))
    }

    /// Decode the bee held by a stack; `None` for non-members
    pub fn member(&self, stack: &BeeStack, registry: &AlleleRegistry) -> Result<Option<Bee>> {
        if !self.is_member(stack) {
            return Ok(None);
        }
        stack
            .snapshot()?
            .map(|snapshot| Bee::restore(&snapshot, registry))
            .transpose()
    }
}
