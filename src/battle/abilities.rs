use crate::battle::commands::BattleCommand;
use crate::battle::field::FieldDuration;
use crate::battle::hooks::AbilityHooks;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, DamageSource};
use crate::pokemon::{FormState, PokemonInst, StatusCondition};
use crate::side::SideId;
use pokebattle_dex::{MoveData, PokemonType, StatKind, WeatherKind};

/// Registry of ability behavior, keyed by normalized ability id.
pub fn ability_hooks(id: &str) -> Option<&'static AbilityHooks> {
    match id {
        "drizzle" => Some(&DRIZZLE),
        "drought" => Some(&DROUGHT),
        "sandstream" => Some(&SAND_STREAM),
        "primordialsea" => Some(&PRIMORDIAL_SEA),
        "desolateland" => Some(&DESOLATE_LAND),
        "intimidate" => Some(&INTIMIDATE),
        "disguise" => Some(&DISGUISE),
        "static" => Some(&STATIC),
        "roughskin" => Some(&ROUGH_SKIN),
        "speedboost" => Some(&SPEED_BOOST),
        "swiftswim" => Some(&SWIFT_SWIM),
        "levitate" => Some(&LEVITATE),
        "thickfat" => Some(&THICK_FAT),
        "blaze" => Some(&BLAZE),
        "torrent" => Some(&TORRENT),
        "overgrow" => Some(&OVERGROW),
        _ => None,
    }
}

fn announce(state: &BattleState, side: SideId, ability: &str) -> BattleCommand {
    let pokemon = state
        .side(side)
        .active()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    BattleCommand::EmitEvent(BattleEvent::AbilityActivated {
        pokemon,
        ability: ability.to_string(),
    })
}

fn weather_on_entry(
    state: &BattleState,
    side: SideId,
    ability: &str,
    kind: WeatherKind,
    duration: FieldDuration,
) -> Vec<BattleCommand> {
    // Skip the announcement when the weather is already up.
    if state.field.weather_kind() == Some(kind) {
        return Vec::new();
    }
    vec![
        announce(state, side, ability),
        BattleCommand::SetWeather { kind, duration },
    ]
}

fn drizzle_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    weather_on_entry(state, side, "Drizzle", WeatherKind::Rain, FieldDuration::Turns(5))
}

fn drought_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    weather_on_entry(state, side, "Drought", WeatherKind::Sun, FieldDuration::Turns(5))
}

fn sand_stream_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    weather_on_entry(state, side, "Sand Stream", WeatherKind::Sand, FieldDuration::Turns(5))
}

fn primordial_sea_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    weather_on_entry(
        state,
        side,
        "Primordial Sea",
        WeatherKind::HeavyRain,
        FieldDuration::Indefinite,
    )
}

fn desolate_land_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    weather_on_entry(
        state,
        side,
        "Desolate Land",
        WeatherKind::HarshSun,
        FieldDuration::Indefinite,
    )
}

fn intimidate_entry(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    let foe = side.opponent();
    if state.side(foe).active().map_or(true, |p| p.is_fainted()) {
        return Vec::new();
    }
    vec![
        announce(state, side, "Intimidate"),
        BattleCommand::ChangeStatStage { target: foe, stat: StatKind::Attack, delta: -1 },
    ]
}

fn disguise_try_hit(
    state: &BattleState,
    side: SideId,
    move_data: &MoveData,
) -> Option<Vec<BattleCommand>> {
    let holder = state.side(side).active()?;
    if holder.form != FormState::Normal || !move_data.is_damaging() {
        return None;
    }
    // The disguise absorbs the hit entirely; damage and secondary effects
    // are both negated. Busting persists for the rest of the battle.
    Some(vec![
        announce(state, side, "Disguise"),
        BattleCommand::EmitEvent(BattleEvent::HitBlocked {
            target: holder.name.clone(),
            ability: "Disguise".to_string(),
        }),
        BattleCommand::BustForm { side },
    ])
}

fn static_after_damage(
    state: &BattleState,
    side: SideId,
    move_data: &MoveData,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    if !move_data.makes_contact() {
        return Vec::new();
    }
    if !rng.chance(30, "static paralysis") {
        return Vec::new();
    }
    let attacker = side.opponent();
    let Some(target) = state.side(attacker).active() else {
        return Vec::new();
    };
    if target.is_fainted() || target.status.is_some() || target.has_type(PokemonType::Electric) {
        return Vec::new();
    }
    vec![
        announce(state, side, "Static"),
        BattleCommand::SetStatus { target: attacker, status: StatusCondition::Paralysis },
    ]
}

fn rough_skin_after_damage(
    state: &BattleState,
    side: SideId,
    move_data: &MoveData,
    _rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    if !move_data.makes_contact() {
        return Vec::new();
    }
    let attacker = side.opponent();
    let Some(target) = state.side(attacker).active() else {
        return Vec::new();
    };
    if target.is_fainted() {
        return Vec::new();
    }
    let chip = (target.max_hp() / 8).max(1);
    vec![
        announce(state, side, "Rough Skin"),
        BattleCommand::DealDamage { target: attacker, amount: chip, source: DamageSource::Ability },
    ]
}

fn speed_boost_residual(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    if state.side(side).stat_stage(StatKind::Speed) >= 6 {
        return Vec::new();
    }
    vec![
        announce(state, side, "Speed Boost"),
        BattleCommand::ChangeStatStage { target: side, stat: StatKind::Speed, delta: 1 },
    ]
}

fn swift_swim_speed(state: &BattleState, _side: SideId, speed: u16) -> u16 {
    match state.field.weather_kind() {
        Some(WeatherKind::Rain) | Some(WeatherKind::HeavyRain) => speed * 2,
        _ => speed,
    }
}

fn levitate_immunity(_pokemon: &PokemonInst, attacking_type: PokemonType) -> bool {
    attacking_type == PokemonType::Ground
}

fn thick_fat_damage_taken(_pokemon: &PokemonInst, move_data: &MoveData, damage: u32) -> u32 {
    match move_data.move_type {
        PokemonType::Fire | PokemonType::Ice => damage / 2,
        _ => damage,
    }
}

fn pinch_power(boost_type: PokemonType) -> impl Fn(&PokemonInst, &MoveData, u16) -> u16 {
    move |user, move_data, power| {
        if move_data.move_type == boost_type && user.current_hp * 3 <= user.max_hp() {
            power * 3 / 2
        } else {
            power
        }
    }
}

fn blaze_power(user: &PokemonInst, move_data: &MoveData, power: u16) -> u16 {
    pinch_power(PokemonType::Fire)(user, move_data, power)
}

fn torrent_power(user: &PokemonInst, move_data: &MoveData, power: u16) -> u16 {
    pinch_power(PokemonType::Water)(user, move_data, power)
}

fn overgrow_power(user: &PokemonInst, move_data: &MoveData, power: u16) -> u16 {
    pinch_power(PokemonType::Grass)(user, move_data, power)
}

static DRIZZLE: AbilityHooks =
    AbilityHooks { on_switch_in: Some(drizzle_entry), ..AbilityHooks::NONE };
static DROUGHT: AbilityHooks =
    AbilityHooks { on_switch_in: Some(drought_entry), ..AbilityHooks::NONE };
static SAND_STREAM: AbilityHooks =
    AbilityHooks { on_switch_in: Some(sand_stream_entry), ..AbilityHooks::NONE };
static PRIMORDIAL_SEA: AbilityHooks =
    AbilityHooks { on_switch_in: Some(primordial_sea_entry), ..AbilityHooks::NONE };
static DESOLATE_LAND: AbilityHooks =
    AbilityHooks { on_switch_in: Some(desolate_land_entry), ..AbilityHooks::NONE };
static INTIMIDATE: AbilityHooks =
    AbilityHooks { on_switch_in: Some(intimidate_entry), ..AbilityHooks::NONE };
static DISGUISE: AbilityHooks =
    AbilityHooks { on_try_hit: Some(disguise_try_hit), ..AbilityHooks::NONE };
static STATIC: AbilityHooks =
    AbilityHooks { on_after_damage: Some(static_after_damage), ..AbilityHooks::NONE };
static ROUGH_SKIN: AbilityHooks =
    AbilityHooks { on_after_damage: Some(rough_skin_after_damage), ..AbilityHooks::NONE };
static SPEED_BOOST: AbilityHooks =
    AbilityHooks { on_residual: Some(speed_boost_residual), ..AbilityHooks::NONE };
static SWIFT_SWIM: AbilityHooks =
    AbilityHooks { on_modify_speed: Some(swift_swim_speed), ..AbilityHooks::NONE };
static LEVITATE: AbilityHooks =
    AbilityHooks { grants_immunity: Some(levitate_immunity), ..AbilityHooks::NONE };
static THICK_FAT: AbilityHooks =
    AbilityHooks { on_damage_taken: Some(thick_fat_damage_taken), ..AbilityHooks::NONE };
static BLAZE: AbilityHooks =
    AbilityHooks { on_base_power: Some(blaze_power), ..AbilityHooks::NONE };
static TORRENT: AbilityHooks =
    AbilityHooks { on_base_power: Some(torrent_power), ..AbilityHooks::NONE };
static OVERGROW: AbilityHooks =
    AbilityHooks { on_base_power: Some(overgrow_power), ..AbilityHooks::NONE };
