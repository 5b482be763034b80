//! Data catalog for the pokebattle engine.
//!
//! Immutable lookup tables for species, moves, abilities, and items, keyed by
//! normalized string identifiers. The battle engine treats these records as
//! opaque inputs; a missing id is always a hard `NotFound` error, never a
//! silent default.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;

pub mod field;
pub mod moves;
pub mod species;
pub mod types;

pub use field::{ScreenKind, TerrainKind, WeatherKind};
pub use moves::{EffectTarget, MoveCategory, MoveData, MoveEffect, MoveFlag, StatKind};
pub use species::{AbilityData, BaseStats, ItemData, SpeciesData};
pub use types::{combined_effectiveness, matchup, Matchup, PokemonType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Species,
    Move,
    Ability,
    Item,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Species => "species",
            RecordKind::Move => "move",
            RecordKind::Ability => "ability",
            RecordKind::Item => "item",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DexError {
    NotFound { kind: RecordKind, id: String },
    Malformed { kind: RecordKind, details: String },
}

impl fmt::Display for DexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexError::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
            DexError::Malformed { kind, details } => {
                write!(f, "malformed {} data: {}", kind, details)
            }
        }
    }
}

impl std::error::Error for DexError {}

pub type DexResult<T> = Result<T, DexError>;

/// Normalize a display name into a catalog id: lowercase, alphanumerics only.
/// "Swords Dance" and "swordsdance" resolve to the same record.
pub fn normalize_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The loaded catalog. Read-only after construction, safe to share.
#[derive(Debug, Clone)]
pub struct Dex {
    species: HashMap<String, SpeciesData>,
    moves: HashMap<String, MoveData>,
    abilities: HashMap<String, AbilityData>,
    items: HashMap<String, ItemData>,
}

fn parse_table<T: DeserializeOwned>(json: &str, kind: RecordKind) -> DexResult<HashMap<String, T>> {
    serde_json::from_str(json).map_err(|e| DexError::Malformed {
        kind,
        details: e.to_string(),
    })
}

impl Dex {
    /// Build a catalog from the four JSON tables (id -> record).
    pub fn from_json(
        species_json: &str,
        moves_json: &str,
        abilities_json: &str,
        items_json: &str,
    ) -> DexResult<Self> {
        Ok(Self {
            species: parse_table(species_json, RecordKind::Species)?,
            moves: parse_table(moves_json, RecordKind::Move)?,
            abilities: parse_table(abilities_json, RecordKind::Ability)?,
            items: parse_table(items_json, RecordKind::Item)?,
        })
    }

    /// The catalog bundled with the crate.
    pub fn bundled() -> Self {
        Self::from_json(
            include_str!("../data/species.json"),
            include_str!("../data/moves.json"),
            include_str!("../data/abilities.json"),
            include_str!("../data/items.json"),
        )
        .expect("bundled catalog data is valid")
    }

    pub fn get_species(&self, id: &str) -> DexResult<&SpeciesData> {
        self.species.get(id).ok_or_else(|| DexError::NotFound {
            kind: RecordKind::Species,
            id: id.to_string(),
        })
    }

    pub fn get_move(&self, id: &str) -> DexResult<&MoveData> {
        self.moves.get(id).ok_or_else(|| DexError::NotFound {
            kind: RecordKind::Move,
            id: id.to_string(),
        })
    }

    pub fn get_ability(&self, id: &str) -> DexResult<&AbilityData> {
        self.abilities.get(id).ok_or_else(|| DexError::NotFound {
            kind: RecordKind::Ability,
            id: id.to_string(),
        })
    }

    pub fn get_item(&self, id: &str) -> DexResult<&ItemData> {
        self.items.get(id).ok_or_else(|| DexError::NotFound {
            kind: RecordKind::Item,
            id: id.to_string(),
        })
    }

    pub fn species_ids(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(|s| s.as_str())
    }

    pub fn move_ids(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(|s| s.as_str())
    }
}
