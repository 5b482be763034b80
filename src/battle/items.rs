use crate::battle::commands::BattleCommand;
use crate::battle::hooks::ItemHooks;
use crate::battle::state::{BattleEvent, BattleState, DamageSource};
use crate::pokemon::PokemonInst;
use crate::side::SideId;
use pokebattle_dex::MoveData;

/// Registry of held-item behavior, keyed by normalized item id.
pub fn item_hooks(id: &str) -> Option<&'static ItemHooks> {
    match id {
        "leftovers" => Some(&LEFTOVERS),
        "lifeorb" => Some(&LIFE_ORB),
        "choicescarf" => Some(&CHOICE_SCARF),
        "expertbelt" => Some(&EXPERT_BELT),
        _ => None,
    }
}

fn leftovers_residual(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    let Some(holder) = state.side(side).active() else {
        return Vec::new();
    };
    if holder.is_fainted() || holder.current_hp == holder.max_hp() {
        return Vec::new();
    }
    vec![
        BattleCommand::EmitEvent(BattleEvent::ItemActivated {
            pokemon: holder.name.clone(),
            item: "Leftovers".to_string(),
        }),
        BattleCommand::Heal { target: side, amount: (holder.max_hp() / 16).max(1) },
    ]
}

fn life_orb_damage(_user: &PokemonInst, _move_data: &MoveData, _effectiveness: f32, damage: u32) -> u32 {
    damage * 13 / 10
}

fn life_orb_recoil(state: &BattleState, side: SideId) -> Vec<BattleCommand> {
    let Some(holder) = state.side(side).active() else {
        return Vec::new();
    };
    if holder.is_fainted() {
        return Vec::new();
    }
    vec![BattleCommand::DealDamage {
        target: side,
        amount: (holder.max_hp() / 10).max(1),
        source: DamageSource::Item,
    }]
}

fn expert_belt_damage(_user: &PokemonInst, _move_data: &MoveData, effectiveness: f32, damage: u32) -> u32 {
    if effectiveness > 1.0 {
        damage * 6 / 5
    } else {
        damage
    }
}

static LEFTOVERS: ItemHooks =
    ItemHooks { on_residual: Some(leftovers_residual), ..ItemHooks::NONE };
static LIFE_ORB: ItemHooks = ItemHooks {
    on_final_damage: Some(life_orb_damage),
    on_after_attack: Some(life_orb_recoil),
    ..ItemHooks::NONE
};
// Scarf speed lives in the stat layer and the move lock in the decision
// layer, so the scarf carries no hooks of its own.
static CHOICE_SCARF: ItemHooks = ItemHooks { ..ItemHooks::NONE };
static EXPERT_BELT: ItemHooks =
    ItemHooks { on_final_damage: Some(expert_belt_damage), ..ItemHooks::NONE };
