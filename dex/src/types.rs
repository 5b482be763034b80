use serde::{Deserialize, Serialize};

/// The full modern type chart (18 types).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

/// A single attacking-type vs defending-type relation.
///
/// Damage code applies these as integer operations (x2, /2, x0) one defending
/// type at a time, so the chart never has to round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matchup {
    Immune,
    NotVery,
    Neutral,
    Super,
}

impl Matchup {
    pub fn multiplier(self) -> f32 {
        match self {
            Matchup::Immune => 0.0,
            Matchup::NotVery => 0.5,
            Matchup::Neutral => 1.0,
            Matchup::Super => 2.0,
        }
    }
}

/// Look up a single entry of the type chart.
pub fn matchup(attacking: PokemonType, defending: PokemonType) -> Matchup {
    use Matchup::*;
    use PokemonType::*;

    match (attacking, defending) {
        (Normal, Ghost) => Immune,
        (Normal, Rock) | (Normal, Steel) => NotVery,

        (Fighting, Ghost) => Immune,
        (Fighting, Normal) | (Fighting, Ice) | (Fighting, Rock) | (Fighting, Dark)
        | (Fighting, Steel) => Super,
        (Fighting, Poison) | (Fighting, Flying) | (Fighting, Psychic) | (Fighting, Bug)
        | (Fighting, Fairy) => NotVery,

        (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => Super,
        (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => NotVery,

        (Poison, Steel) => Immune,
        (Poison, Grass) | (Poison, Fairy) => Super,
        (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => NotVery,

        (Ground, Flying) => Immune,
        (Ground, Fire) | (Ground, Electric) | (Ground, Poison) | (Ground, Rock)
        | (Ground, Steel) => Super,
        (Ground, Grass) | (Ground, Bug) => NotVery,

        (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => Super,
        (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => NotVery,

        (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => Super,
        (Bug, Fire) | (Bug, Fighting) | (Bug, Poison) | (Bug, Flying) | (Bug, Ghost)
        | (Bug, Steel) | (Bug, Fairy) => NotVery,

        (Ghost, Normal) => Immune,
        (Ghost, Psychic) | (Ghost, Ghost) => Super,
        (Ghost, Dark) => NotVery,

        (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => Super,
        (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => NotVery,

        (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => Super,
        (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => NotVery,

        (Water, Fire) | (Water, Ground) | (Water, Rock) => Super,
        (Water, Water) | (Water, Grass) | (Water, Dragon) => NotVery,

        (Grass, Water) | (Grass, Ground) | (Grass, Rock) => Super,
        (Grass, Fire) | (Grass, Grass) | (Grass, Poison) | (Grass, Flying) | (Grass, Bug)
        | (Grass, Dragon) | (Grass, Steel) => NotVery,

        (Electric, Ground) => Immune,
        (Electric, Water) | (Electric, Flying) => Super,
        (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => NotVery,

        (Psychic, Dark) => Immune,
        (Psychic, Fighting) | (Psychic, Poison) => Super,
        (Psychic, Psychic) | (Psychic, Steel) => NotVery,

        (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => Super,
        (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => NotVery,

        (Dragon, Fairy) => Immune,
        (Dragon, Dragon) => Super,
        (Dragon, Steel) => NotVery,

        (Dark, Psychic) | (Dark, Ghost) => Super,
        (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => NotVery,

        (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => Super,
        (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => NotVery,

        _ => Neutral,
    }
}

/// Combined effectiveness against a full defensive typing, as a float.
/// Damage resolution uses `matchup` entry by entry instead; this is for
/// score-style callers (AI policy, tooling).
pub fn combined_effectiveness(attacking: PokemonType, defending: &[PokemonType]) -> f32 {
    defending
        .iter()
        .map(|t| matchup(attacking, *t).multiplier())
        .product()
}
