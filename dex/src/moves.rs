use crate::field::{ScreenKind, TerrainKind, WeatherKind};
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Behavioural flags the engine keys contact abilities on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveFlag {
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    User,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

/// Secondary and primary effects attached to a move record.
///
/// Chance values are percentages; 100 means the effect is the move's whole
/// point (status moves) rather than a rider on a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    Burn(u8),
    Paralyze(u8),
    Poison(u8),
    /// Badly poisoned: damage ramps each turn.
    Toxic(u8),
    Sleep(u8),
    Freeze(u8),
    Confuse(u8),
    Flinch(u8),
    StatChange {
        target: EffectTarget,
        stat: StatKind,
        stages: i8,
        chance: u8,
    },
    /// Restore a percentage of the user's max HP.
    Heal(u8),
    /// Heal the user for a percentage of damage dealt.
    Drain(u8),
    /// Recoil to the user as a percentage of damage dealt.
    Recoil(u8),
    SetWeather(WeatherKind),
    SetTerrain(TerrainKind),
    SetScreen(ScreenKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    /// None for status moves.
    pub power: Option<u16>,
    /// None means the move never misses.
    pub accuracy: Option<u8>,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub flags: Vec<MoveFlag>,
    #[serde(default)]
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        matches!(self.category, MoveCategory::Physical | MoveCategory::Special)
            && self.power.unwrap_or(0) > 0
    }

    pub fn makes_contact(&self) -> bool {
        self.flags.contains(&MoveFlag::Contact)
    }
}
