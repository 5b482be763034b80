use std::collections::HashMap;
use std::fmt;

use crate::pokemon::{PokemonInst, StatusCondition};
use pokebattle_dex::{ScreenKind, StatKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    A,
    B,
}

impl SideId {
    pub fn index(&self) -> usize {
        match self {
            SideId::A => 0,
            SideId::B => 1,
        }
    }

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }

    pub fn from_index(index: usize) -> SideId {
        match index {
            0 => SideId::A,
            1 => SideId::B,
            _ => panic!("side index out of range: {}", index),
        }
    }

    pub fn both() -> [SideId; 2] {
        [SideId::A, SideId::B]
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideId::A => write!(f, "Side A"),
            SideId::B => write!(f, "Side B"),
        }
    }
}

/// Battle-scoped conditions with no fixed duration of their own. They are
/// cleared when the active creature leaves the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatileKind {
    Flinched,
    Confused,
    ChoiceLock,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum VolatileStatus {
    Flinched,
    Confused { turns_remaining: u8 },
    ChoiceLock { slot: usize },
}

impl VolatileStatus {
    pub fn kind(&self) -> VolatileKind {
        match self {
            VolatileStatus::Flinched => VolatileKind::Flinched,
            VolatileStatus::Confused { .. } => VolatileKind::Confused,
            VolatileStatus::ChoiceLock { .. } => VolatileKind::ChoiceLock,
        }
    }
}

/// One player's half of the battle: a roster of up to six, the active slot,
/// and field state that belongs to this side rather than the whole arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub name: String,
    pub team: [Option<PokemonInst>; 6],
    pub active_index: usize,
    /// Stat stages for the active creature, -6..=6. Reset on switch.
    pub stat_stages: HashMap<StatKind, i8>,
    pub volatiles: HashMap<VolatileKind, VolatileStatus>,
    /// Remaining turns per active screen.
    pub screens: HashMap<ScreenKind, u8>,
    pub last_move: Option<String>,
}

impl Side {
    pub fn new(name: impl Into<String>, roster: Vec<PokemonInst>) -> Self {
        let mut team: [Option<PokemonInst>; 6] = [const { None }; 6];
        for (i, member) in roster.into_iter().take(6).enumerate() {
            team[i] = Some(member);
        }
        Self {
            name: name.into(),
            team,
            active_index: 0,
            stat_stages: HashMap::new(),
            volatiles: HashMap::new(),
            screens: HashMap::new(),
            last_move: None,
        }
    }

    pub fn active(&self) -> Option<&PokemonInst> {
        self.team.get(self.active_index).and_then(|p| p.as_ref())
    }

    pub fn active_mut(&mut self) -> Option<&mut PokemonInst> {
        self.team.get_mut(self.active_index).and_then(|p| p.as_mut())
    }

    pub fn member(&self, index: usize) -> Option<&PokemonInst> {
        self.team.get(index).and_then(|p| p.as_ref())
    }

    pub fn stat_stage(&self, stat: StatKind) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Adjust a stage, clamped to -6..=6. Returns the applied delta, which is
    /// zero when already at the cap.
    pub fn change_stat_stage(&mut self, stat: StatKind, delta: i8) -> i8 {
        let current = self.stat_stage(stat);
        let next = (current + delta).clamp(-6, 6);
        if next == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, next);
        }
        next - current
    }

    pub fn has_volatile(&self, kind: VolatileKind) -> bool {
        self.volatiles.contains_key(&kind)
    }

    /// Clear everything tied to the departing creature: volatiles, stat
    /// stages, and the bad-poison ramp.
    pub fn clear_active_state(&mut self) {
        self.volatiles.clear();
        self.stat_stages.clear();
        self.last_move = None;
        if let Some(active) = self.active_mut() {
            if let Some(StatusCondition::Toxic { counter }) = &mut active.status {
                *counter = 1;
            }
        }
    }

    /// True if any benched roster member could still take the field.
    pub fn has_able_reserve(&self) -> bool {
        self.team.iter().enumerate().any(|(i, slot)| {
            i != self.active_index
                && slot.as_ref().is_some_and(|p| !p.is_fainted())
        })
    }

    /// True if every roster member has fainted.
    pub fn is_defeated(&self) -> bool {
        self.team
            .iter()
            .flatten()
            .all(|p| p.is_fainted())
    }

    /// Count down screen timers, returning the kinds that wore off.
    pub fn tick_screens(&mut self) -> Vec<ScreenKind> {
        let mut expired = Vec::new();
        self.screens.retain(|kind, turns| {
            *turns -= 1;
            if *turns == 0 {
                expired.push(*kind);
                false
            } else {
                true
            }
        });
        expired.sort_by_key(|k| *k as u8);
        expired
    }
}
