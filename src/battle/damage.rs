use crate::battle::hooks::hooks_for;
use crate::battle::state::BattleState;
use crate::battle::stats;
use crate::side::SideId;
use pokebattle_dex::{
    combined_effectiveness, MoveCategory, MoveData, PokemonType, ScreenKind, TerrainKind,
    WeatherKind,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f32,
}

/// Compute damage for a hit that is already known to land. The chain runs
/// in a fixed order with integer flooring at every step, so identical
/// inputs always produce identical damage. The roll is the 85..=100
/// spread factor; crit and roll are decided by the caller so this stays
/// a pure function of state.
pub fn compute_damage(
    state: &BattleState,
    attacker: SideId,
    move_data: &MoveData,
    critical: bool,
    roll: u8,
) -> DamageOutcome {
    let defender = attacker.opponent();
    let user = state.side(attacker).active().expect("attacker present");
    let target = state.side(defender).active().expect("defender present");

    let effectiveness = combined_effectiveness(move_data.move_type, &target.types);
    if effectiveness == 0.0 {
        return DamageOutcome { damage: 0, critical: false, effectiveness };
    }

    let mut power = move_data.power.unwrap_or(0);
    let (ability, _) = hooks_for(state, attacker);
    if let Some(hook) = ability.and_then(|h| h.on_base_power) {
        power = hook(user, move_data, power);
    }
    if power == 0 {
        return DamageOutcome { damage: 0, critical: false, effectiveness };
    }

    let (atk, def) = match move_data.category {
        MoveCategory::Physical => (
            stats::effective_attack(state.side(attacker), user, critical),
            stats::effective_defense(state.side(defender), target, critical),
        ),
        MoveCategory::Special => (
            stats::effective_sp_attack(state.side(attacker), user, critical),
            stats::effective_sp_defense(state.side(defender), target, critical),
        ),
        MoveCategory::Status => return DamageOutcome { damage: 0, critical: false, effectiveness },
    };

    let level = user.level as u32;
    let mut damage: u32 =
        (2 * level / 5 + 2) * power as u32 * atk as u32 / def.max(1) as u32 / 50 + 2;

    // Weather.
    match (state.field.weather_kind(), move_data.move_type) {
        (Some(WeatherKind::Rain | WeatherKind::HeavyRain), PokemonType::Water) => {
            damage = damage * 3 / 2
        }
        (Some(WeatherKind::Rain), PokemonType::Fire) => damage /= 2,
        (Some(WeatherKind::Sun | WeatherKind::HarshSun), PokemonType::Fire) => {
            damage = damage * 3 / 2
        }
        (Some(WeatherKind::Sun), PokemonType::Water) => damage /= 2,
        _ => {}
    }

    // Terrain boosts apply to grounded attackers; Misty shields grounded
    // defenders from Dragon moves.
    match (state.field.terrain_kind(), move_data.move_type) {
        (Some(TerrainKind::Electric), PokemonType::Electric) if user.is_grounded() => {
            damage = damage * 13 / 10
        }
        (Some(TerrainKind::Grassy), PokemonType::Grass) if user.is_grounded() => {
            damage = damage * 13 / 10
        }
        (Some(TerrainKind::Psychic), PokemonType::Psychic) if user.is_grounded() => {
            damage = damage * 13 / 10
        }
        (Some(TerrainKind::Misty), PokemonType::Dragon) if target.is_grounded() => damage /= 2,
        _ => {}
    }

    if critical {
        damage = damage * 3 / 2;
    }

    damage = damage * roll.clamp(85, 100) as u32 / 100;

    if user.has_type(move_data.move_type) {
        damage = damage * 3 / 2;
    }

    // Type effectiveness, one defending type at a time to keep flooring
    // order fixed.
    for defending in &target.types {
        match pokebattle_dex::matchup(move_data.move_type, *defending) {
            pokebattle_dex::Matchup::Super => damage *= 2,
            pokebattle_dex::Matchup::NotVery => damage /= 2,
            pokebattle_dex::Matchup::Immune => damage = 0,
            pokebattle_dex::Matchup::Neutral => {}
        }
    }

    if user.status == Some(crate::pokemon::StatusCondition::Burn)
        && move_data.category == MoveCategory::Physical
    {
        damage /= 2;
    }

    // Screens halve damage unless the hit crits through them.
    if !critical {
        let screens = &state.side(defender).screens;
        let screened = match move_data.category {
            MoveCategory::Physical => screens.contains_key(&ScreenKind::Reflect),
            MoveCategory::Special => screens.contains_key(&ScreenKind::LightScreen),
            MoveCategory::Status => false,
        };
        if screened {
            damage /= 2;
        }
    }

    let (def_ability, _) = hooks_for(state, defender);
    if let Some(hook) = def_ability.and_then(|h| h.on_damage_taken) {
        damage = hook(target, move_data, damage);
    }
    let (_, atk_item) = hooks_for(state, attacker);
    if let Some(hook) = atk_item.and_then(|h| h.on_final_damage) {
        damage = hook(user, move_data, effectiveness, damage);
    }

    let damage = damage.clamp(1, u16::MAX as u32) as u16;
    DamageOutcome { damage, critical, effectiveness }
}
