use crate::battle::commands::{execute_commands, BattleCommand};
use crate::battle::damage::compute_damage;
use crate::battle::decisions::{validate_decision, Decision};
use crate::battle::field::FieldDuration;
use crate::battle::hooks::hooks_for;
use crate::battle::state::{
    BattleEvent, BattleState, DamageSource, EventBus, GameState, SkipReason,
};
use crate::battle::stats;
use crate::errors::{BattleEngineError, BattleResult, IllegalDecisionError};
use crate::pokemon::StatusCondition;
use crate::side::{SideId, VolatileKind, VolatileStatus};
use pokebattle_dex::{
    combined_effectiveness, Dex, EffectTarget, MoveData, MoveEffect, PokemonType, TerrainKind,
    WeatherKind,
};

const CRIT_CHANCE: u8 = 4;
const CONFUSION_SELF_HIT_CHANCE: u8 = 33;
const CONFUSION_POWER: u32 = 40;
const FULL_PARALYSIS_CHANCE: u8 = 25;
const THAW_CHANCE: u8 = 20;

/// Open the battle: announce the initial actives and fire their entry
/// hooks, faster side first with exact ties settled by the same coin flip
/// as turn ordering. Call once before the first `resolve_turn`.
pub fn begin_battle(state: &mut BattleState) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();
    for side in SideId::both() {
        let incoming = state
            .side(side)
            .active()
            .map(|p| p.name.clone())
            .ok_or_else(|| {
                BattleEngineError::InvariantViolation(format!("no active creature on {}", side))
            })?;
        bus.push(BattleEvent::Switched { side, outgoing: None, incoming });
    }
    let speed_a = modified_speed(state, SideId::A);
    let speed_b = modified_speed(state, SideId::B);
    let order = if speed_a > speed_b {
        [SideId::A, SideId::B]
    } else if speed_b > speed_a {
        [SideId::B, SideId::A]
    } else if state.rng.coin_flip("speed tie") {
        [SideId::A, SideId::B]
    } else {
        [SideId::B, SideId::A]
    };
    for side in order {
        let (ability, _) = hooks_for(state, side);
        if let Some(hook) = ability.and_then(|h| h.on_switch_in) {
            let commands = hook(state, side);
            execute_commands(state, &mut bus, commands)?;
        }
    }
    Ok(bus)
}

/// Resolve one full turn: both sides' decisions in, the next state and an
/// ordered transcript out. Validation happens for both sides before any
/// mutation, so an error leaves the state exactly as it was.
pub fn resolve_turn(
    state: &mut BattleState,
    dex: &Dex,
    decisions: [Decision; 2],
) -> BattleResult<EventBus> {
    if state.game_state.is_terminal() {
        return Err(IllegalDecisionError::NotAcceptingDecisions.into());
    }
    for side in SideId::both() {
        validate_decision(state, side, &decisions[side.index()])?;
    }

    match state.game_state {
        GameState::WaitingForReplacement(_) | GameState::WaitingForBothReplacements => {
            resolve_replacements(state, decisions)
        }
        GameState::WaitingForDecisions => resolve_full_turn(state, dex, decisions),
        GameState::TurnInProgress | GameState::SideWon(_) | GameState::Draw => {
            Err(IllegalDecisionError::NotAcceptingDecisions.into())
        }
    }
}

/// Replacement rounds only bring in the requested creatures; they do not
/// advance the turn counter. When both sides replace at once the switch-ins
/// resolve in fixed side order (A, then B): with the previous actives
/// fainted there is no meaningful speed to order by.
fn resolve_replacements(
    state: &mut BattleState,
    decisions: [Decision; 2],
) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();
    for side in SideId::both() {
        if let Decision::Switch { team_index } = decisions[side.index()] {
            perform_switch(state, &mut bus, side, team_index)?;
        }
    }
    state.game_state = GameState::WaitingForDecisions;
    finalize_game_state(state, &mut bus);
    Ok(bus)
}

fn resolve_full_turn(
    state: &mut BattleState,
    dex: &Dex,
    decisions: [Decision; 2],
) -> BattleResult<EventBus> {
    state.game_state = GameState::TurnInProgress;
    let mut bus = EventBus::new();
    bus.push(BattleEvent::TurnStarted { turn: state.turn_number });

    for side in action_order(state, dex, &decisions) {
        execute_action(state, dex, &mut bus, side, &decisions[side.index()])?;
    }

    end_of_turn(state, dex, &mut bus)?;

    bus.push(BattleEvent::TurnEnded { turn: state.turn_number });
    state.turn_number += 1;
    state.game_state = GameState::WaitingForDecisions;
    finalize_game_state(state, &mut bus);
    Ok(bus)
}

/// Action ordering: switches resolve before moves; moves sort by priority,
/// then by effective speed; full ties fall to a coin flip.
fn action_order(state: &mut BattleState, dex: &Dex, decisions: &[Decision; 2]) -> [SideId; 2] {
    fn class(decision: &Decision) -> i8 {
        match decision {
            Decision::Switch { .. } => 1,
            _ => 0,
        }
    }

    let key = |side: SideId, decision: &Decision| -> (i8, i8, u16) {
        (
            class(decision),
            move_priority(state, dex, side, decision),
            modified_speed(state, side),
        )
    };

    let key_a = key(SideId::A, &decisions[0]);
    let key_b = key(SideId::B, &decisions[1]);
    if key_a > key_b {
        [SideId::A, SideId::B]
    } else if key_b > key_a {
        [SideId::B, SideId::A]
    } else if state.rng.coin_flip("speed tie") {
        [SideId::A, SideId::B]
    } else {
        [SideId::B, SideId::A]
    }
}

fn move_priority(state: &BattleState, dex: &Dex, side: SideId, decision: &Decision) -> i8 {
    let Decision::UseMove { slot } = decision else { return 0 };
    state
        .side(side)
        .active()
        .and_then(|p| p.moves.get(*slot).and_then(|s| s.as_ref()))
        .and_then(|s| dex.get_move(&s.move_id).ok())
        .map_or(0, |m| m.priority)
}

fn modified_speed(state: &BattleState, side: SideId) -> u16 {
    let Some(active) = state.side(side).active() else { return 0 };
    let mut speed = stats::effective_speed(state.side(side), active);
    let (ability, item) = hooks_for(state, side);
    if let Some(hook) = ability.and_then(|h| h.on_modify_speed) {
        speed = hook(state, side, speed);
    }
    if let Some(hook) = item.and_then(|h| h.on_modify_speed) {
        speed = hook(state, side, speed);
    }
    speed
}

fn perform_switch(
    state: &mut BattleState,
    bus: &mut EventBus,
    side: SideId,
    team_index: usize,
) -> BattleResult<()> {
    execute_commands(
        state,
        bus,
        vec![BattleCommand::SwitchActive { side, team_index }],
    )?;
    let (ability, _) = hooks_for(state, side);
    if let Some(hook) = ability.and_then(|h| h.on_switch_in) {
        let commands = hook(state, side);
        execute_commands(state, bus, commands)?;
    }
    Ok(())
}

fn execute_action(
    state: &mut BattleState,
    dex: &Dex,
    bus: &mut EventBus,
    side: SideId,
    decision: &Decision,
) -> BattleResult<()> {
    match decision {
        Decision::Switch { team_index } => perform_switch(state, bus, side, *team_index),
        Decision::Forced(_) => {
            if state.side(side).active().is_some_and(|p| !p.is_fainted()) {
                bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::NoUsableMove });
            }
            Ok(())
        }
        Decision::Pass => Ok(()),
        Decision::UseMove { slot } => execute_move(state, dex, bus, side, *slot),
    }
}

fn execute_move(
    state: &mut BattleState,
    dex: &Dex,
    bus: &mut EventBus,
    side: SideId,
    slot: usize,
) -> BattleResult<()> {
    let user = state
        .side(side)
        .active()
        .ok_or(BattleEngineError::InvariantViolation(format!("no active creature on {}", side)))?;
    if user.is_fainted() {
        bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::UserFainted });
        return Ok(());
    }

    if !can_act(state, bus, side)? {
        return Ok(());
    }

    let user = state
        .side_mut(side)
        .active_mut()
        .ok_or(BattleEngineError::InvariantViolation(format!("no active creature on {}", side)))?;
    let move_id = match user.moves.get(slot).and_then(|s| s.as_ref()) {
        Some(s) => s.move_id.clone(),
        None => {
            return Err(BattleEngineError::InvariantViolation(format!(
                "validated move slot {} is empty on {}",
                slot, side
            )))
        }
    };
    if user.use_move(slot).is_err() {
        return Err(BattleEngineError::InvariantViolation(format!(
            "validated move slot {} has no PP on {}",
            slot, side
        )));
    }
    let user_name = user.name.clone();
    let holds_choice_item = user.holds("choicescarf");

    let move_data = dex.get_move(&move_id)?.clone();
    bus.push(BattleEvent::MoveUsed {
        side,
        user: user_name,
        move_name: move_data.name.clone(),
    });

    let mut post_use = vec![BattleCommand::SetLastMove { side, move_id: move_id.clone() }];
    if holds_choice_item && !state.side(side).has_volatile(VolatileKind::ChoiceLock) {
        post_use.push(BattleCommand::AddVolatile {
            target: side,
            volatile: VolatileStatus::ChoiceLock { slot },
        });
    }
    execute_commands(state, bus, post_use)?;

    let foe = side.opponent();
    let targets_foe = move_data.is_damaging()
        || move_data.effects.iter().any(|e| effect_targets_foe(e));

    if targets_foe && state.side(foe).active().map_or(true, |p| p.is_fainted()) {
        bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::TargetFainted });
        return Ok(());
    }

    // Primal weather snuffs out opposing elemental attacks outright.
    if move_data.is_damaging() {
        let fizzled = matches!(
            (state.field.weather_kind(), move_data.move_type),
            (Some(WeatherKind::HarshSun), PokemonType::Water)
                | (Some(WeatherKind::HeavyRain), PokemonType::Fire)
        );
        if fizzled {
            bus.push(BattleEvent::MoveFailed { side, move_name: move_data.name.clone() });
            return Ok(());
        }
    }

    if targets_foe && !accuracy_check(state, side, &move_data) {
        bus.push(BattleEvent::MoveMissed { side, move_name: move_data.name.clone() });
        return Ok(());
    }

    if move_data.is_damaging() {
        execute_damaging_move(state, dex, bus, side, &move_data)?;
    } else {
        execute_status_move(state, bus, side, &move_data)?;
    }
    Ok(())
}

/// The pre-move gauntlet: sleep, freeze, paralysis, flinch, confusion.
/// Returns whether the user gets to act. Counters tick here, at action
/// time, not during the residual phase.
fn can_act(state: &mut BattleState, bus: &mut EventBus, side: SideId) -> BattleResult<bool> {
    let status = state.side(side).active().and_then(|p| p.status);
    match status {
        Some(StatusCondition::Sleep { turns_remaining }) => {
            if turns_remaining <= 1 {
                execute_commands(state, bus, vec![BattleCommand::RemoveStatus { target: side }])?;
            } else {
                if let Some(active) = state.side_mut(side).active_mut() {
                    active.status = Some(StatusCondition::Sleep {
                        turns_remaining: turns_remaining - 1,
                    });
                }
                bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::Asleep });
                return Ok(false);
            }
        }
        Some(StatusCondition::Freeze) => {
            if state.rng.chance(THAW_CHANCE, "thaw") {
                execute_commands(state, bus, vec![BattleCommand::RemoveStatus { target: side }])?;
            } else {
                bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::Frozen });
                return Ok(false);
            }
        }
        _ => {}
    }

    if state.side(side).has_volatile(VolatileKind::Flinched) {
        execute_commands(
            state,
            bus,
            vec![BattleCommand::RemoveVolatile { target: side, kind: VolatileKind::Flinched }],
        )?;
        bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::Flinched });
        return Ok(false);
    }

    if let Some(VolatileStatus::Confused { turns_remaining }) = state
        .side(side)
        .volatiles
        .get(&VolatileKind::Confused)
        .copied()
    {
        if turns_remaining <= 1 {
            execute_commands(
                state,
                bus,
                vec![BattleCommand::RemoveVolatile { target: side, kind: VolatileKind::Confused }],
            )?;
        } else {
            state.side_mut(side).volatiles.insert(
                VolatileKind::Confused,
                VolatileStatus::Confused { turns_remaining: turns_remaining - 1 },
            );
            if state.rng.chance(CONFUSION_SELF_HIT_CHANCE, "confusion self-hit") {
                bus.push(BattleEvent::ActionSkipped {
                    side,
                    reason: SkipReason::HurtInConfusion,
                });
                let hit = confusion_damage(state, side);
                execute_commands(
                    state,
                    bus,
                    vec![BattleCommand::DealDamage {
                        target: side,
                        amount: hit,
                        source: DamageSource::Confusion,
                    }],
                )?;
                return Ok(false);
            }
        }
    }

    if matches!(status, Some(StatusCondition::Paralysis))
        && state.rng.chance(FULL_PARALYSIS_CHANCE, "full paralysis")
    {
        bus.push(BattleEvent::ActionSkipped { side, reason: SkipReason::Paralyzed });
        return Ok(false);
    }

    Ok(true)
}

/// A confused self-hit is a typeless 40-power physical strike against the
/// user's own defense, with no other modifiers.
fn confusion_damage(state: &BattleState, side: SideId) -> u16 {
    let side_state = state.side(side);
    let Some(user) = side_state.active() else { return 0 };
    let atk = stats::effective_attack(side_state, user, false) as u32;
    let def = stats::effective_defense(side_state, user, false) as u32;
    let level = user.level as u32;
    ((2 * level / 5 + 2) * CONFUSION_POWER * atk / def.max(1) / 50 + 2) as u16
}

fn accuracy_check(state: &mut BattleState, side: SideId, move_data: &MoveData) -> bool {
    let Some(base) = move_data.accuracy else {
        return true;
    };
    let foe = side.opponent();
    let stage = (state.side(side).stat_stage(pokebattle_dex::StatKind::Accuracy)
        - state.side(foe).stat_stage(pokebattle_dex::StatKind::Evasion))
    .clamp(-6, 6);
    let (num, den) = stats::accuracy_multiplier(stage);
    let threshold = (base as u32 * num / den).clamp(1, 100) as u8;
    if threshold >= 100 {
        return true;
    }
    // Not `chance`: a disabled rng draws its best-case 1, so hits land.
    state.rng.percent("accuracy") <= threshold
}

fn execute_damaging_move(
    state: &mut BattleState,
    dex: &Dex,
    bus: &mut EventBus,
    side: SideId,
    move_data: &MoveData,
) -> BattleResult<()> {
    let foe = side.opponent();
    let target = state
        .side(foe)
        .active()
        .ok_or(BattleEngineError::InvariantViolation(format!("no active creature on {}", foe)))?;

    // Immunity beyond the type chart (levitate and kin).
    let type_immune = combined_effectiveness(move_data.move_type, &target.types) == 0.0;
    let (foe_ability, _) = hooks_for(state, foe);
    let ability_immune = foe_ability
        .and_then(|h| h.grants_immunity)
        .is_some_and(|hook| hook(target, move_data.move_type));
    if type_immune || ability_immune {
        let name = target.name.clone();
        if ability_immune && !type_immune {
            let ability_name = dex
                .get_ability(&target.ability_id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|_| target.ability_id.clone());
            bus.push(BattleEvent::AbilityActivated { pokemon: name.clone(), ability: ability_name });
        }
        bus.push(BattleEvent::MoveHadNoEffect { target: name });
        return Ok(());
    }

    // A disguise-style intercept consumes the hit wholesale: no damage,
    // no secondary effects.
    if let Some(hook) = foe_ability.and_then(|h| h.on_try_hit) {
        if let Some(commands) = hook(state, foe, move_data) {
            execute_commands(state, bus, commands)?;
            return Ok(());
        }
    }

    let critical = state.rng.chance(CRIT_CHANCE, "critical hit");
    let roll = state.rng.damage_roll();
    let outcome = compute_damage(state, side, move_data, critical, roll);

    if outcome.critical {
        bus.push(BattleEvent::CriticalHit);
    }
    if outcome.effectiveness != 1.0 {
        bus.push(BattleEvent::Effectiveness { multiplier: outcome.effectiveness });
    }
    execute_commands(
        state,
        bus,
        vec![BattleCommand::DealDamage {
            target: foe,
            amount: outcome.damage,
            source: DamageSource::Move,
        }],
    )?;

    apply_move_effects(state, bus, side, move_data, outcome.damage)?;

    if outcome.damage > 0 {
        let (foe_ability, _) = hooks_for(state, foe);
        if let Some(hook) = foe_ability.and_then(|h| h.on_after_damage) {
            let mut rng = state.rng.clone();
            let commands = hook(state, foe, move_data, &mut rng);
            state.rng = rng;
            execute_commands(state, bus, commands)?;
        }
        let (_, item) = hooks_for(state, side);
        if let Some(hook) = item.and_then(|h| h.on_after_attack) {
            let commands = hook(state, side);
            execute_commands(state, bus, commands)?;
        }
    }
    Ok(())
}

fn execute_status_move(
    state: &mut BattleState,
    bus: &mut EventBus,
    side: SideId,
    move_data: &MoveData,
) -> BattleResult<()> {
    apply_move_effects(state, bus, side, move_data, 0)
}

fn effect_targets_foe(effect: &MoveEffect) -> bool {
    match effect {
        MoveEffect::Burn(_)
        | MoveEffect::Paralyze(_)
        | MoveEffect::Poison(_)
        | MoveEffect::Toxic(_)
        | MoveEffect::Sleep(_)
        | MoveEffect::Freeze(_)
        | MoveEffect::Confuse(_)
        | MoveEffect::Flinch(_) => true,
        MoveEffect::StatChange { target, .. } => *target == EffectTarget::Target,
        MoveEffect::Heal(_)
        | MoveEffect::Drain(_)
        | MoveEffect::Recoil(_)
        | MoveEffect::SetWeather(_)
        | MoveEffect::SetTerrain(_)
        | MoveEffect::SetScreen(_) => false,
    }
}

fn apply_move_effects(
    state: &mut BattleState,
    bus: &mut EventBus,
    side: SideId,
    move_data: &MoveData,
    damage_dealt: u16,
) -> BattleResult<()> {
    let foe = side.opponent();
    for effect in &move_data.effects {
        let commands = match effect {
            MoveEffect::Burn(chance) => {
                status_effect(state, side, StatusCondition::Burn, *chance, "burn proc")
            }
            MoveEffect::Paralyze(chance) => {
                status_effect(state, side, StatusCondition::Paralysis, *chance, "paralysis proc")
            }
            MoveEffect::Poison(chance) => {
                status_effect(state, side, StatusCondition::Poison, *chance, "poison proc")
            }
            MoveEffect::Toxic(chance) => status_effect(
                state,
                side,
                StatusCondition::Toxic { counter: 1 },
                *chance,
                "toxic proc",
            ),
            MoveEffect::Sleep(chance) => {
                if !state.rng.chance(*chance, "sleep proc") {
                    Vec::new()
                } else {
                    let turns = sleep_turns(&mut state.rng);
                    status_effect(
                        state,
                        side,
                        StatusCondition::Sleep { turns_remaining: turns },
                        100,
                        "sleep",
                    )
                }
            }
            MoveEffect::Freeze(chance) => {
                status_effect(state, side, StatusCondition::Freeze, *chance, "freeze proc")
            }
            MoveEffect::Confuse(chance) => {
                if !state.rng.chance(*chance, "confusion proc") {
                    Vec::new()
                } else if state.side(foe).active().map_or(true, |p| p.is_fainted()) {
                    Vec::new()
                } else {
                    let turns = confusion_turns(&mut state.rng);
                    vec![BattleCommand::AddVolatile {
                        target: foe,
                        volatile: VolatileStatus::Confused { turns_remaining: turns },
                    }]
                }
            }
            MoveEffect::Flinch(chance) => {
                // Flinch only matters if the target has yet to move; it is
                // cleared unconditionally at end of turn either way.
                if damage_dealt > 0 && state.rng.chance(*chance, "flinch proc") {
                    vec![BattleCommand::AddVolatile {
                        target: foe,
                        volatile: VolatileStatus::Flinched,
                    }]
                } else {
                    Vec::new()
                }
            }
            MoveEffect::StatChange { target, stat, stages, chance } => {
                if !state.rng.chance(*chance, "stat change proc") {
                    Vec::new()
                } else {
                    let recipient = match target {
                        EffectTarget::User => side,
                        EffectTarget::Target => foe,
                    };
                    if state.side(recipient).active().map_or(true, |p| p.is_fainted()) {
                        Vec::new()
                    } else {
                        vec![BattleCommand::ChangeStatStage {
                            target: recipient,
                            stat: *stat,
                            delta: *stages,
                        }]
                    }
                }
            }
            MoveEffect::Heal(percent) => {
                let max = state.side(side).active().map_or(0, |p| p.max_hp());
                vec![BattleCommand::Heal {
                    target: side,
                    amount: (max as u32 * *percent as u32 / 100).max(1) as u16,
                }]
            }
            MoveEffect::Drain(percent) => {
                if damage_dealt == 0 {
                    Vec::new()
                } else {
                    vec![BattleCommand::Heal {
                        target: side,
                        amount: (damage_dealt as u32 * *percent as u32 / 100).max(1) as u16,
                    }]
                }
            }
            MoveEffect::Recoil(percent) => {
                if damage_dealt == 0 {
                    Vec::new()
                } else {
                    vec![BattleCommand::DealDamage {
                        target: side,
                        amount: (damage_dealt as u32 * *percent as u32 / 100).max(1) as u16,
                        source: DamageSource::Recoil,
                    }]
                }
            }
            MoveEffect::SetWeather(kind) => vec![BattleCommand::SetWeather {
                kind: *kind,
                duration: FieldDuration::Turns(5),
            }],
            MoveEffect::SetTerrain(kind) => vec![BattleCommand::SetTerrain {
                kind: *kind,
                duration: FieldDuration::Turns(5),
            }],
            MoveEffect::SetScreen(kind) => vec![BattleCommand::AddScreen {
                side,
                screen: *kind,
                turns: 5,
            }],
        };
        execute_commands(state, bus, commands)?;
    }
    Ok(())
}

fn sleep_turns(rng: &mut crate::battle::rng::BattleRng) -> u8 {
    1 + rng.percent("sleep turns") % 3
}

fn confusion_turns(rng: &mut crate::battle::rng::BattleRng) -> u8 {
    2 + rng.percent("confusion turns") % 3
}

/// Build the status-application commands for a damaging move's secondary
/// (or a status move's primary), honoring type immunities and terrain.
fn status_effect(
    state: &mut BattleState,
    attacker: SideId,
    status: StatusCondition,
    chance: u8,
    label: &str,
) -> Vec<BattleCommand> {
    if !state.rng.chance(chance, label) {
        return Vec::new();
    }
    let foe = attacker.opponent();
    let Some(target) = state.side(foe).active() else {
        return Vec::new();
    };
    if target.is_fainted() || target.status.is_some() {
        return Vec::new();
    }
    let immune = match status {
        StatusCondition::Burn => target.has_type(PokemonType::Fire),
        StatusCondition::Paralysis => target.has_type(PokemonType::Electric),
        StatusCondition::Poison | StatusCondition::Toxic { .. } => {
            target.has_type(PokemonType::Poison) || target.has_type(PokemonType::Steel)
        }
        StatusCondition::Freeze => target.has_type(PokemonType::Ice),
        StatusCondition::Sleep { .. } => false,
    };
    if immune {
        return Vec::new();
    }
    // Terrain shelters grounded creatures: Electric blocks sleep, Misty
    // blocks every major status.
    if target.is_grounded() {
        match state.field.terrain_kind() {
            Some(TerrainKind::Electric) if matches!(status, StatusCondition::Sleep { .. }) => {
                return Vec::new();
            }
            Some(TerrainKind::Misty) => return Vec::new(),
            _ => {}
        }
    }
    vec![BattleCommand::SetStatus { target: foe, status }]
}

/// The residual phase, in fixed order: weather damage, terrain healing,
/// status damage, ability and item residuals, then duration ticks. Sides
/// run in A, B order within each step.
fn end_of_turn(state: &mut BattleState, _dex: &Dex, bus: &mut EventBus) -> BattleResult<()> {
    // Weather chip.
    if state.field.weather_kind() == Some(WeatherKind::Sand) {
        for side in SideId::both() {
            let Some(active) = state.side(side).active() else { continue };
            if active.is_fainted() || sand_immune(active) {
                continue;
            }
            let chip = (active.max_hp() / 16).max(1);
            execute_commands(
                state,
                bus,
                vec![BattleCommand::DealDamage {
                    target: side,
                    amount: chip,
                    source: DamageSource::Weather,
                }],
            )?;
        }
    }

    // Grassy terrain heals the grounded.
    if state.field.terrain_kind() == Some(TerrainKind::Grassy) {
        for side in SideId::both() {
            let Some(active) = state.side(side).active() else { continue };
            if active.is_fainted() || !active.is_grounded() {
                continue;
            }
            let heal = (active.max_hp() / 16).max(1);
            execute_commands(state, bus, vec![BattleCommand::Heal { target: side, amount: heal }])?;
        }
    }

    // Status damage. The bad-poison counter ramps after each payment.
    for side in SideId::both() {
        let Some(active) = state.side(side).active() else { continue };
        if active.is_fainted() {
            continue;
        }
        let max = active.max_hp();
        let amount = match active.status {
            Some(StatusCondition::Burn) => Some((max / 16).max(1)),
            Some(StatusCondition::Poison) => Some((max / 8).max(1)),
            Some(StatusCondition::Toxic { counter }) => {
                Some(((max as u32 * counter as u32 / 16).max(1) as u16).min(max))
            }
            _ => None,
        };
        if let Some(amount) = amount {
            execute_commands(
                state,
                bus,
                vec![BattleCommand::DealDamage {
                    target: side,
                    amount,
                    source: DamageSource::Status,
                }],
            )?;
            if let Some(active) = state.side_mut(side).active_mut() {
                if let Some(StatusCondition::Toxic { counter }) = &mut active.status {
                    *counter = counter.saturating_add(1);
                }
            }
        }
    }

    // Ability and item residuals.
    for side in SideId::both() {
        if state.side(side).active().map_or(true, |p| p.is_fainted()) {
            continue;
        }
        let (ability, item) = hooks_for(state, side);
        if let Some(hook) = ability.and_then(|h| h.on_residual) {
            let commands = hook(state, side);
            execute_commands(state, bus, commands)?;
        }
        if let Some(hook) = item.and_then(|h| h.on_residual) {
            let commands = hook(state, side);
            execute_commands(state, bus, commands)?;
        }
    }

    // Flinch never outlives the turn it was inflicted on.
    for side in SideId::both() {
        if state.side(side).has_volatile(VolatileKind::Flinched) {
            execute_commands(
                state,
                bus,
                vec![BattleCommand::RemoveVolatile { target: side, kind: VolatileKind::Flinched }],
            )?;
        }
    }

    // Duration ticks.
    for side in SideId::both() {
        for screen in state.side_mut(side).tick_screens() {
            bus.push(BattleEvent::ScreenEnded { side, screen });
        }
    }
    let (ended_weather, ended_terrain) = state.field.tick();
    if let Some(weather) = ended_weather {
        bus.push(BattleEvent::WeatherEnded { weather });
    }
    if let Some(terrain) = ended_terrain {
        bus.push(BattleEvent::TerrainEnded { terrain });
    }
    Ok(())
}

fn sand_immune(pokemon: &crate::pokemon::PokemonInst) -> bool {
    pokemon.has_type(PokemonType::Rock)
        || pokemon.has_type(PokemonType::Ground)
        || pokemon.has_type(PokemonType::Steel)
}

/// The single terminal check: runs once, after everything else, so
/// simultaneous knockouts are seen together. A double knockout with no
/// reserves on either side is a draw.
fn finalize_game_state(state: &mut BattleState, bus: &mut EventBus) {
    let a_defeated = state.side(SideId::A).is_defeated();
    let b_defeated = state.side(SideId::B).is_defeated();
    match (a_defeated, b_defeated) {
        (true, true) => {
            state.game_state = GameState::Draw;
            bus.push(BattleEvent::BattleEnded { winner: None });
            return;
        }
        (true, false) => {
            state.game_state = GameState::SideWon(SideId::B);
            bus.push(BattleEvent::BattleEnded { winner: Some(SideId::B) });
            return;
        }
        (false, true) => {
            state.game_state = GameState::SideWon(SideId::A);
            bus.push(BattleEvent::BattleEnded { winner: Some(SideId::A) });
            return;
        }
        (false, false) => {}
    }

    let a_needs = state.side(SideId::A).active().map_or(false, |p| p.is_fainted());
    let b_needs = state.side(SideId::B).active().map_or(false, |p| p.is_fainted());
    state.game_state = match (a_needs, b_needs) {
        (true, true) => {
            bus.push(BattleEvent::ReplacementRequired { side: SideId::A });
            bus.push(BattleEvent::ReplacementRequired { side: SideId::B });
            GameState::WaitingForBothReplacements
        }
        (true, false) => {
            bus.push(BattleEvent::ReplacementRequired { side: SideId::A });
            GameState::WaitingForReplacement(SideId::A)
        }
        (false, true) => {
            bus.push(BattleEvent::ReplacementRequired { side: SideId::B });
            GameState::WaitingForReplacement(SideId::B)
        }
        (false, false) => GameState::WaitingForDecisions,
    };
}
