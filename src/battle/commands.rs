use crate::battle::field::FieldDuration;
use crate::battle::state::{BattleEvent, BattleState, DamageSource, EventBus};
use crate::errors::{BattleEngineError, BattleResult};
use crate::pokemon::StatusCondition;
use crate::side::{SideId, VolatileKind, VolatileStatus};
use pokebattle_dex::{ScreenKind, StatKind, TerrainKind, WeatherKind};

/// Atomic state mutations. Move execution and effect hooks produce these;
/// only `execute_commands` touches the battle state, so every HP change
/// goes through the same faint check and every mutation is witnessed by
/// an event.
#[derive(Clone, Debug, PartialEq)]
pub enum BattleCommand {
    DealDamage { target: SideId, amount: u16, source: DamageSource },
    Heal { target: SideId, amount: u16 },
    SetStatus { target: SideId, status: StatusCondition },
    RemoveStatus { target: SideId },
    AddVolatile { target: SideId, volatile: VolatileStatus },
    RemoveVolatile { target: SideId, kind: VolatileKind },
    ChangeStatStage { target: SideId, stat: StatKind, delta: i8 },
    SwitchActive { side: SideId, team_index: usize },
    SetWeather { kind: WeatherKind, duration: FieldDuration },
    SetTerrain { kind: TerrainKind, duration: FieldDuration },
    AddScreen { side: SideId, screen: ScreenKind, turns: u8 },
    SetLastMove { side: SideId, move_id: String },
    BustForm { side: SideId },
    EmitEvent(BattleEvent),
}

pub fn execute_commands(
    state: &mut BattleState,
    bus: &mut EventBus,
    commands: Vec<BattleCommand>,
) -> BattleResult<()> {
    for command in commands {
        execute_command(state, bus, command)?;
    }
    Ok(())
}

fn active_name(state: &BattleState, side: SideId) -> BattleResult<String> {
    state
        .side(side)
        .active()
        .map(|p| p.name.clone())
        .ok_or_else(|| {
            BattleEngineError::InvariantViolation(format!("no active creature on {}", side))
        })
}

fn execute_command(
    state: &mut BattleState,
    bus: &mut EventBus,
    command: BattleCommand,
) -> BattleResult<()> {
    match command {
        BattleCommand::DealDamage { target, amount, source } => {
            let name = active_name(state, target)?;
            let pokemon = state.side_mut(target).active_mut().unwrap();
            if pokemon.is_fainted() {
                return Ok(());
            }
            let dealt = pokemon.take_damage(amount);
            let remaining = pokemon.current_hp;
            bus.push(BattleEvent::DamageDealt {
                target,
                pokemon: name.clone(),
                amount: dealt,
                remaining_hp: remaining,
                source,
            });
            if remaining == 0 {
                bus.push(BattleEvent::Fainted { side: target, pokemon: name });
            }
        }
        BattleCommand::Heal { target, amount } => {
            let name = active_name(state, target)?;
            let pokemon = state.side_mut(target).active_mut().unwrap();
            if pokemon.is_fainted() {
                return Ok(());
            }
            let healed = pokemon.heal(amount);
            if healed > 0 {
                bus.push(BattleEvent::Healed { side: target, pokemon: name, amount: healed });
            }
        }
        BattleCommand::SetStatus { target, status } => {
            let name = active_name(state, target)?;
            let pokemon = state.side_mut(target).active_mut().unwrap();
            // One major status at a time; the first one sticks.
            if pokemon.is_fainted() || pokemon.status.is_some() {
                return Ok(());
            }
            pokemon.status = Some(status);
            bus.push(BattleEvent::StatusApplied {
                side: target,
                pokemon: name,
                status: status.name().to_string(),
            });
        }
        BattleCommand::RemoveStatus { target } => {
            let name = active_name(state, target)?;
            let pokemon = state.side_mut(target).active_mut().unwrap();
            if let Some(status) = pokemon.status.take() {
                bus.push(BattleEvent::StatusRemoved {
                    side: target,
                    pokemon: name,
                    status: status.name().to_string(),
                });
            }
        }
        BattleCommand::AddVolatile { target, volatile } => {
            let name = active_name(state, target)?;
            let kind = volatile.kind();
            let side = state.side_mut(target);
            if side.volatiles.contains_key(&kind) {
                return Ok(());
            }
            side.volatiles.insert(kind, volatile);
            bus.push(BattleEvent::VolatileApplied { side: target, pokemon: name, volatile: kind });
        }
        BattleCommand::RemoveVolatile { target, kind } => {
            if state.side_mut(target).volatiles.remove(&kind).is_some() {
                bus.push(BattleEvent::VolatileExpired { side: target, volatile: kind });
            }
        }
        BattleCommand::ChangeStatStage { target, stat, delta } => {
            let name = active_name(state, target)?;
            let side = state.side_mut(target);
            let applied = side.change_stat_stage(stat, delta);
            if applied == 0 {
                bus.push(BattleEvent::StatChangeFailed { side: target, pokemon: name, stat });
            } else {
                let stage = side.stat_stage(stat);
                bus.push(BattleEvent::StatStageChanged {
                    side: target,
                    pokemon: name,
                    stat,
                    delta: applied,
                    stage,
                });
            }
        }
        BattleCommand::SwitchActive { side, team_index } => {
            let outgoing = state.side(side).active().map(|p| p.name.clone());
            let incoming = state
                .side(side)
                .member(team_index)
                .map(|p| p.name.clone())
                .ok_or_else(|| {
                    BattleEngineError::InvariantViolation(format!(
                        "switch to empty slot {} on {}",
                        team_index, side
                    ))
                })?;
            let side_state = state.side_mut(side);
            side_state.clear_active_state();
            side_state.active_index = team_index;
            bus.push(BattleEvent::Switched { side, outgoing, incoming });
        }
        BattleCommand::SetWeather { kind, duration } => {
            let previous = state.field.weather_kind();
            if state.field.set_weather(kind, duration) {
                if let Some(old) = previous {
                    bus.push(BattleEvent::WeatherEnded { weather: old });
                }
                bus.push(BattleEvent::WeatherStarted { weather: kind });
            } else {
                bus.push(BattleEvent::WeatherChangeFailed { weather: kind });
            }
        }
        BattleCommand::SetTerrain { kind, duration } => {
            let previous = state.field.terrain_kind();
            if state.field.set_terrain(kind, duration) {
                if let Some(old) = previous {
                    bus.push(BattleEvent::TerrainEnded { terrain: old });
                }
                bus.push(BattleEvent::TerrainStarted { terrain: kind });
            }
        }
        BattleCommand::AddScreen { side, screen, turns } => {
            let side_state = state.side_mut(side);
            if side_state.screens.contains_key(&screen) {
                return Ok(());
            }
            side_state.screens.insert(screen, turns);
            bus.push(BattleEvent::ScreenStarted { side, screen });
        }
        BattleCommand::SetLastMove { side, move_id } => {
            state.side_mut(side).last_move = Some(move_id);
        }
        BattleCommand::BustForm { side } => {
            let name = active_name(state, side)?;
            let pokemon = state.side_mut(side).active_mut().unwrap();
            pokemon.form = crate::pokemon::FormState::Busted;
            bus.push(BattleEvent::FormChanged { pokemon: name });
        }
        BattleCommand::EmitEvent(event) => bus.push(event),
    }
    Ok(())
}
