use std::fmt;

use crate::battle::field::FieldState;
use crate::battle::rng::BattleRng;
use crate::side::{Side, SideId, VolatileKind};
use pokebattle_dex::{ScreenKind, StatKind, TerrainKind, WeatherKind};
use serde::{Deserialize, Serialize};

/// Where the battle is in its lifecycle. Resolution is only legal in
/// `WaitingForDecisions`; the replacement states gate which decisions each
/// side may submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    WaitingForDecisions,
    TurnInProgress,
    WaitingForReplacement(SideId),
    WaitingForBothReplacements,
    SideWon(SideId),
    Draw,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::SideWon(_) | GameState::Draw)
    }
}

/// Why an action on the stack did not execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Asleep,
    Frozen,
    Paralyzed,
    Flinched,
    HurtInConfusion,
    UserFainted,
    TargetFainted,
    NoUsableMove,
}

/// Why a damage or status application came about, for transcript wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Move,
    Confusion,
    Recoil,
    Weather,
    Status,
    Ability,
    Item,
}

/// Everything observable that happens during turn resolution, in order.
/// The transcript is these events plus `format()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted { turn: u32 },
    TurnEnded { turn: u32 },
    Switched { side: SideId, outgoing: Option<String>, incoming: String },
    MoveUsed { side: SideId, user: String, move_name: String },
    MoveMissed { side: SideId, move_name: String },
    MoveFailed { side: SideId, move_name: String },
    MoveHadNoEffect { target: String },
    ActionSkipped { side: SideId, reason: SkipReason },
    DamageDealt { target: SideId, pokemon: String, amount: u16, remaining_hp: u16, source: DamageSource },
    CriticalHit,
    Effectiveness { multiplier: f32 },
    HitBlocked { target: String, ability: String },
    FormChanged { pokemon: String },
    AbilityActivated { pokemon: String, ability: String },
    ItemActivated { pokemon: String, item: String },
    Healed { side: SideId, pokemon: String, amount: u16 },
    StatusApplied { side: SideId, pokemon: String, status: String },
    StatusRemoved { side: SideId, pokemon: String, status: String },
    VolatileApplied { side: SideId, pokemon: String, volatile: VolatileKind },
    VolatileExpired { side: SideId, volatile: VolatileKind },
    StatStageChanged { side: SideId, pokemon: String, stat: StatKind, delta: i8, stage: i8 },
    StatChangeFailed { side: SideId, pokemon: String, stat: StatKind },
    WeatherStarted { weather: WeatherKind },
    WeatherEnded { weather: WeatherKind },
    WeatherChangeFailed { weather: WeatherKind },
    TerrainStarted { terrain: TerrainKind },
    TerrainEnded { terrain: TerrainKind },
    ScreenStarted { side: SideId, screen: ScreenKind },
    ScreenEnded { side: SideId, screen: ScreenKind },
    Fainted { side: SideId, pokemon: String },
    ReplacementRequired { side: SideId },
    BattleEnded { winner: Option<SideId> },
}

impl BattleEvent {
    pub fn format(&self) -> String {
        match self {
            BattleEvent::TurnStarted { turn } => format!("=== Turn {} ===", turn),
            BattleEvent::TurnEnded { turn } => format!("--- End of turn {} ---", turn),
            BattleEvent::Switched { side, outgoing, incoming } => match outgoing {
                Some(out) => format!("{} withdrew {} and sent out {}!", side, out, incoming),
                None => format!("{} sent out {}!", side, incoming),
            },
            BattleEvent::MoveUsed { user, move_name, .. } => {
                format!("{} used {}!", user, move_name)
            }
            BattleEvent::MoveMissed { move_name, .. } => format!("{} missed!", move_name),
            BattleEvent::MoveFailed { move_name, .. } => format!("{} failed!", move_name),
            BattleEvent::MoveHadNoEffect { target } => {
                format!("It doesn't affect {}...", target)
            }
            BattleEvent::ActionSkipped { side, reason } => match reason {
                SkipReason::Asleep => format!("{}'s active creature is fast asleep.", side),
                SkipReason::Frozen => format!("{}'s active creature is frozen solid!", side),
                SkipReason::Paralyzed => {
                    format!("{}'s active creature is paralyzed and can't move!", side)
                }
                SkipReason::Flinched => format!("{}'s active creature flinched!", side),
                SkipReason::HurtInConfusion => {
                    format!("{}'s active creature hurt itself in confusion!", side)
                }
                SkipReason::UserFainted => format!("{}'s action fizzled.", side),
                SkipReason::TargetFainted => {
                    format!("{}'s move had no target.", side)
                }
                SkipReason::NoUsableMove => {
                    format!("{}'s active creature has no usable moves!", side)
                }
            },
            BattleEvent::DamageDealt { pokemon, amount, remaining_hp, source, .. } => {
                let suffix = match source {
                    DamageSource::Move => String::new(),
                    DamageSource::Confusion => " (confusion)".to_string(),
                    DamageSource::Recoil => " (recoil)".to_string(),
                    DamageSource::Weather => " (weather)".to_string(),
                    DamageSource::Status => " (status)".to_string(),
                    DamageSource::Ability => " (ability)".to_string(),
                    DamageSource::Item => " (item)".to_string(),
                };
                format!("{} took {} damage{}! ({} HP left)", pokemon, amount, suffix, remaining_hp)
            }
            BattleEvent::CriticalHit => "A critical hit!".to_string(),
            BattleEvent::Effectiveness { multiplier } => {
                if *multiplier > 1.0 {
                    "It's super effective!".to_string()
                } else {
                    "It's not very effective...".to_string()
                }
            }
            BattleEvent::HitBlocked { target, ability } => {
                format!("{}'s {} blocked the hit!", target, ability)
            }
            BattleEvent::FormChanged { pokemon } => format!("{}'s form changed!", pokemon),
            BattleEvent::AbilityActivated { pokemon, ability } => {
                format!("{}'s {} activated!", pokemon, ability)
            }
            BattleEvent::ItemActivated { pokemon, item } => {
                format!("{}'s {} activated!", pokemon, item)
            }
            BattleEvent::Healed { pokemon, amount, .. } => {
                format!("{} restored {} HP!", pokemon, amount)
            }
            BattleEvent::StatusApplied { pokemon, status, .. } => {
                format!("{} was afflicted with {}!", pokemon, status)
            }
            BattleEvent::StatusRemoved { pokemon, status, .. } => {
                format!("{} shook off its {}!", pokemon, status)
            }
            BattleEvent::VolatileApplied { pokemon, volatile, .. } => match volatile {
                VolatileKind::Flinched => format!("{} flinched!", pokemon),
                VolatileKind::Confused => format!("{} became confused!", pokemon),
                VolatileKind::ChoiceLock => format!("{} is locked into its move!", pokemon),
            },
            BattleEvent::VolatileExpired { side, volatile } => match volatile {
                VolatileKind::Confused => format!("{}'s confusion wore off.", side),
                _ => format!("{}'s condition wore off.", side),
            },
            BattleEvent::StatStageChanged { pokemon, stat, delta, .. } => {
                let direction = match delta {
                    d if *d >= 2 => "rose sharply",
                    d if *d == 1 => "rose",
                    d if *d == -1 => "fell",
                    _ => "fell harshly",
                };
                format!("{}'s {:?} {}!", pokemon, stat, direction)
            }
            BattleEvent::StatChangeFailed { pokemon, stat, .. } => {
                format!("{}'s {:?} won't go any further!", pokemon, stat)
            }
            BattleEvent::WeatherStarted { weather } => match weather {
                WeatherKind::Rain => "It started to rain!".to_string(),
                WeatherKind::Sun => "The sunlight turned harsh!".to_string(),
                WeatherKind::Sand => "A sandstorm kicked up!".to_string(),
                WeatherKind::HeavyRain => "A heavy rain began to fall!".to_string(),
                WeatherKind::HarshSun => "The sunlight turned extremely harsh!".to_string(),
            },
            BattleEvent::WeatherEnded { weather } => format!("The {} subsided.", weather),
            BattleEvent::WeatherChangeFailed { weather } => {
                format!("The {} could not take hold.", weather)
            }
            BattleEvent::TerrainStarted { terrain } => {
                format!("{} terrain spread across the field!", terrain)
            }
            BattleEvent::TerrainEnded { terrain } => {
                format!("The {} terrain faded.", terrain)
            }
            BattleEvent::ScreenStarted { side, screen } => {
                format!("{} raised by {}!", screen, side)
            }
            BattleEvent::ScreenEnded { side, screen } => {
                format!("{}'s {} wore off.", side, screen)
            }
            BattleEvent::Fainted { pokemon, .. } => format!("{} fainted!", pokemon),
            BattleEvent::ReplacementRequired { side } => {
                format!("{} must send out a replacement.", side)
            }
            BattleEvent::BattleEnded { winner } => match winner {
                Some(side) => format!("{} won the battle!", side),
                None => "The battle ended in a draw!".to_string(),
            },
        }
    }
}

/// Ordered transcript of a resolution. Consumers read it after the fact;
/// the engine only pushes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, predicate: impl Fn(&BattleEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{}", event.format())?;
        }
        Ok(())
    }
}

/// The whole battle between turns: both sides, the shared field, and the
/// random stream. The RNG is not serialized; a deserialized battle resumes
/// with randomness disabled unless re-seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub battle_id: String,
    pub sides: [Side; 2],
    pub field: FieldState,
    pub turn_number: u32,
    pub game_state: GameState,
    #[serde(skip)]
    pub rng: BattleRng,
}

impl BattleState {
    pub fn new(battle_id: impl Into<String>, sides: [Side; 2], rng: BattleRng) -> Self {
        Self {
            battle_id: battle_id.into(),
            sides,
            field: FieldState::default(),
            turn_number: 1,
            game_state: GameState::WaitingForDecisions,
            rng,
        }
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.index()]
    }
}
