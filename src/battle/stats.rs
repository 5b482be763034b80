use crate::pokemon::{PokemonInst, StatusCondition};
use crate::side::Side;
use pokebattle_dex::StatKind;

/// Apply a -6..=6 battle stage to a stat with the standard integer
/// multipliers: (2+s)/2 above zero, 2/(2+|s|) below.
pub fn apply_stage(stat: u16, stage: i8) -> u16 {
    let stat = stat as u32;
    let scaled = if stage >= 0 {
        stat * (2 + stage as u32) / 2
    } else {
        stat * 2 / (2 + stage.unsigned_abs() as u32)
    };
    scaled.max(1) as u16
}

/// Accuracy stages use 3/3 as the base fraction rather than 2/2.
pub fn accuracy_multiplier(stage: i8) -> (u32, u32) {
    if stage >= 0 {
        (3 + stage as u32, 3)
    } else {
        (3, 3 + stage.unsigned_abs() as u32)
    }
}

pub fn effective_attack(side: &Side, pokemon: &PokemonInst, critical: bool) -> u16 {
    // Crits ignore the attacker's unfavorable stages.
    let stage = side.stat_stage(StatKind::Attack);
    let stage = if critical { stage.max(0) } else { stage };
    apply_stage(pokemon.stats[1], stage)
}

pub fn effective_defense(side: &Side, pokemon: &PokemonInst, critical: bool) -> u16 {
    let stage = side.stat_stage(StatKind::Defense);
    let stage = if critical { stage.min(0) } else { stage };
    apply_stage(pokemon.stats[2], stage)
}

pub fn effective_sp_attack(side: &Side, pokemon: &PokemonInst, critical: bool) -> u16 {
    let stage = side.stat_stage(StatKind::SpAttack);
    let stage = if critical { stage.max(0) } else { stage };
    apply_stage(pokemon.stats[3], stage)
}

pub fn effective_sp_defense(side: &Side, pokemon: &PokemonInst, critical: bool) -> u16 {
    let stage = side.stat_stage(StatKind::SpDefense);
    let stage = if critical { stage.min(0) } else { stage };
    apply_stage(pokemon.stats[4], stage)
}

/// Speed after stages, paralysis, and held-item modifiers. Ability speed
/// hooks are layered on by the engine, which knows the field state.
pub fn effective_speed(side: &Side, pokemon: &PokemonInst) -> u16 {
    let mut speed = apply_stage(pokemon.stats[5], side.stat_stage(StatKind::Speed));
    if matches!(pokemon.status, Some(StatusCondition::Paralysis)) {
        speed /= 2;
    }
    if pokemon.holds("choicescarf") {
        speed = speed * 3 / 2;
    }
    speed
}
