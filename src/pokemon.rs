use crate::errors::BattleResult;
use pokebattle_dex::{normalize_id, Dex, PokemonType};
use serde::{Deserialize, Serialize};

/// Major status conditions. A creature carries at most one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatusCondition {
    Sleep { turns_remaining: u8 },
    Poison,
    /// Badly poisoned: damage is counter/16 of max HP and the counter ramps
    /// each residual phase. The counter resets when the creature switches out.
    Toxic { counter: u8 },
    Burn,
    Paralysis,
    Freeze,
}

impl StatusCondition {
    pub fn name(&self) -> &'static str {
        match self {
            StatusCondition::Sleep { .. } => "sleep",
            StatusCondition::Poison => "poison",
            StatusCondition::Toxic { .. } => "bad poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Freeze => "freeze",
        }
    }
}

/// Form marker for disguise-style abilities. Busting persists for the whole
/// battle, across switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormState {
    Normal,
    Busted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: String,
    pub pp: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMoveError {
    NoPpRemaining,
    EmptySlot,
}

/// One combatant on a roster. Owned by its Side; mutated only through the
/// engine's command executor during turn resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub species_id: String,
    pub level: u8,
    /// Copied from the species record at construction.
    pub types: Vec<PokemonType>,
    pub ability_id: String,
    pub item_id: Option<String>,
    /// HP, Atk, Def, SpA, SpD, Spe - computed at construction.
    pub stats: [u16; 6],
    pub current_hp: u16,
    pub status: Option<StatusCondition>,
    pub moves: [Option<MoveSlot>; 4],
    pub form: FormState,
}

impl PokemonInst {
    /// Build a creature from catalog data at the given level, with neutral
    /// IVs (31) and no EVs. Every referenced id must resolve in the catalog.
    pub fn new(
        dex: &Dex,
        species: &str,
        level: u8,
        item: Option<&str>,
        move_names: &[&str],
    ) -> BattleResult<Self> {
        let species_id = normalize_id(species);
        let data = dex.get_species(&species_id)?;

        let base = &data.base_stats;
        let stats = [
            hp_stat(base.hp, level),
            other_stat(base.attack, level),
            other_stat(base.defense, level),
            other_stat(base.sp_attack, level),
            other_stat(base.sp_defense, level),
            other_stat(base.speed, level),
        ];

        // First listed ability is the default.
        let ability_id = data
            .abilities
            .first()
            .cloned()
            .unwrap_or_else(|| "noability".to_string());

        let item_id = match item {
            Some(name) => {
                let id = normalize_id(name);
                dex.get_item(&id)?;
                Some(id)
            }
            None => None,
        };

        let mut moves: [Option<MoveSlot>; 4] = [const { None }; 4];
        for (i, name) in move_names.iter().take(4).enumerate() {
            let move_id = normalize_id(name);
            let move_data = dex.get_move(&move_id)?;
            moves[i] = Some(MoveSlot {
                move_id,
                pp: move_data.pp,
            });
        }

        Ok(Self {
            name: data.name.clone(),
            species_id,
            level,
            types: data.types.clone(),
            ability_id,
            item_id,
            stats,
            current_hp: stats[0],
            status: None,
            moves,
            form: FormState::Normal,
        })
    }

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, saturating at zero. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let actual = amount.min(self.current_hp);
        self.current_hp -= actual;
        actual
    }

    /// Restore HP, saturating at max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let actual = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += actual;
        actual
    }

    pub fn has_type(&self, t: PokemonType) -> bool {
        self.types.contains(&t)
    }

    /// Grounded creatures are affected by terrain. Flying types and
    /// levitators are not.
    pub fn is_grounded(&self) -> bool {
        !self.has_type(PokemonType::Flying) && self.ability_id != "levitate"
    }

    /// Spend one PP from the given slot.
    pub fn use_move(&mut self, slot: usize) -> Result<(), UseMoveError> {
        match self.moves.get_mut(slot).and_then(|s| s.as_mut()) {
            Some(inst) if inst.pp > 0 => {
                inst.pp -= 1;
                Ok(())
            }
            Some(_) => Err(UseMoveError::NoPpRemaining),
            None => Err(UseMoveError::EmptySlot),
        }
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.item_id.as_deref() == Some(item_id)
    }
}

// Stat formulas with 31 IVs and no EVs: the standard neutral spread.
fn hp_stat(base: u8, level: u8) -> u16 {
    let base = base as u32;
    let level = level as u32;
    ((2 * base + 31) * level / 100 + level + 10) as u16
}

fn other_stat(base: u8, level: u8) -> u16 {
    let base = base as u32;
    let level = level as u32;
    ((2 * base + 31) * level / 100 + 5) as u16
}
