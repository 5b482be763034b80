use crate::battle::commands::BattleCommand;
use crate::battle::rng::BattleRng;
use crate::battle::state::BattleState;
use crate::pokemon::PokemonInst;
use crate::side::SideId;
use pokebattle_dex::{MoveData, PokemonType};

/// Effect hooks for abilities and held items. Each hook is a pure function
/// over the battle state that describes its consequences as commands; only
/// the command executor mutates anything. Hooks are plain fn pointers so
/// registries can live in statics.
///
/// `side` is always the hook holder's side.
pub struct AbilityHooks {
    /// Fires when the holder takes the field.
    pub on_switch_in: Option<fn(&BattleState, SideId) -> Vec<BattleCommand>>,
    /// Inspects an incoming damaging move before damage. Returning commands
    /// consumes the hit: the engine executes them instead of dealing damage.
    pub on_try_hit: Option<fn(&BattleState, SideId, &MoveData) -> Option<Vec<BattleCommand>>>,
    /// Type immunity beyond the type chart (holder is the defender).
    pub grants_immunity: Option<fn(&PokemonInst, PokemonType) -> bool>,
    /// Adjusts the holder's effective speed.
    pub on_modify_speed: Option<fn(&BattleState, SideId, u16) -> u16>,
    /// Adjusts base power of the holder's outgoing move.
    pub on_base_power: Option<fn(&PokemonInst, &MoveData, u16) -> u16>,
    /// Scales damage the holder is about to take.
    pub on_damage_taken: Option<fn(&PokemonInst, &MoveData, u32) -> u32>,
    /// Fires after the holder is damaged by a move; the attacker is the
    /// holder's opponent.
    pub on_after_damage:
        Option<fn(&BattleState, SideId, &MoveData, &mut BattleRng) -> Vec<BattleCommand>>,
    /// End-of-turn effect.
    pub on_residual: Option<fn(&BattleState, SideId) -> Vec<BattleCommand>>,
}

impl AbilityHooks {
    pub const NONE: AbilityHooks = AbilityHooks {
        on_switch_in: None,
        on_try_hit: None,
        grants_immunity: None,
        on_modify_speed: None,
        on_base_power: None,
        on_damage_taken: None,
        on_after_damage: None,
        on_residual: None,
    };
}

pub struct ItemHooks {
    /// Scales the holder's outgoing damage after the rest of the chain.
    /// Receives the type effectiveness so belts can condition on it.
    pub on_final_damage: Option<fn(&PokemonInst, &MoveData, f32, u32) -> u32>,
    /// Fires after the holder lands a damaging move.
    pub on_after_attack: Option<fn(&BattleState, SideId) -> Vec<BattleCommand>>,
    /// Adjusts the holder's effective speed.
    pub on_modify_speed: Option<fn(&BattleState, SideId, u16) -> u16>,
    /// End-of-turn effect.
    pub on_residual: Option<fn(&BattleState, SideId) -> Vec<BattleCommand>>,
}

impl ItemHooks {
    pub const NONE: ItemHooks = ItemHooks {
        on_final_damage: None,
        on_after_attack: None,
        on_modify_speed: None,
        on_residual: None,
    };
}

/// Look up the hooks in play for a side's active creature, ability first
/// then item. The fixed order keeps resolution deterministic.
pub fn hooks_for(state: &BattleState, side: SideId) -> (Option<&'static AbilityHooks>, Option<&'static ItemHooks>) {
    let Some(active) = state.side(side).active() else {
        return (None, None);
    };
    let ability = crate::battle::abilities::ability_hooks(&active.ability_id);
    let item = active
        .item_id
        .as_deref()
        .and_then(crate::battle::items::item_hooks);
    (ability, item)
}
