use crate::battle::state::{BattleState, GameState};
use crate::errors::IllegalDecisionError;
use crate::side::{SideId, VolatileKind, VolatileStatus};
use serde::{Deserialize, Serialize};

/// Why a side submitted a non-chosen action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForcedReason {
    NoUsableMove,
}

/// One side's input for a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    UseMove { slot: usize },
    Switch { team_index: usize },
    Forced(ForcedReason),
    /// Explicit no-op. Always accepted while decisions are accepted, but only
    /// enumerated by `legal_decisions` when the other side is replacing a
    /// fainted creature.
    Pass,
}

/// Enumerate every decision the side could legally submit right now.
/// Replacement states restrict to switches (or `Pass` for the side not
/// replacing); otherwise moves with PP, respecting any choice lock, plus
/// switches to able reserves.
pub fn legal_decisions(state: &BattleState, side: SideId) -> Vec<Decision> {
    let side_state = state.side(side);
    let mut legal = Vec::new();

    match state.game_state {
        GameState::SideWon(_) | GameState::Draw | GameState::TurnInProgress => return legal,
        GameState::WaitingForReplacement(replacing) => {
            if replacing == side {
                push_switches(state, side, &mut legal);
            } else {
                legal.push(Decision::Pass);
            }
            return legal;
        }
        GameState::WaitingForBothReplacements => {
            push_switches(state, side, &mut legal);
            return legal;
        }
        GameState::WaitingForDecisions => {}
    }

    let Some(active) = side_state.active() else {
        return legal;
    };

    let locked_slot = match side_state.volatiles.get(&VolatileKind::ChoiceLock) {
        Some(VolatileStatus::ChoiceLock { slot }) => Some(*slot),
        _ => None,
    };

    for (slot, entry) in active.moves.iter().enumerate() {
        let Some(move_slot) = entry else { continue };
        if move_slot.pp == 0 {
            continue;
        }
        if locked_slot.is_some_and(|locked| locked != slot) {
            continue;
        }
        legal.push(Decision::UseMove { slot });
    }

    push_switches(state, side, &mut legal);

    if legal.is_empty() {
        legal.push(Decision::Forced(ForcedReason::NoUsableMove));
    }
    legal
}

fn push_switches(state: &BattleState, side: SideId, out: &mut Vec<Decision>) {
    let side_state = state.side(side);
    for (i, slot) in side_state.team.iter().enumerate() {
        if i == side_state.active_index {
            continue;
        }
        if slot.as_ref().is_some_and(|p| !p.is_fainted()) {
            out.push(Decision::Switch { team_index: i });
        }
    }
}

/// Reject a decision that the side cannot legally take. Validation happens
/// for both sides before any mutation, so an illegal decision leaves the
/// battle untouched.
pub fn validate_decision(
    state: &BattleState,
    side: SideId,
    decision: &Decision,
) -> Result<(), IllegalDecisionError> {
    match state.game_state {
        GameState::SideWon(_) | GameState::Draw | GameState::TurnInProgress => {
            return Err(IllegalDecisionError::NotAcceptingDecisions);
        }
        GameState::WaitingForReplacement(replacing) => {
            return match decision {
                Decision::Switch { team_index } if replacing == side => {
                    validate_switch(state, side, *team_index)
                }
                Decision::Pass if replacing != side => Ok(()),
                Decision::Switch { .. } => Err(IllegalDecisionError::NotInLegalSet(side)),
                _ if replacing == side => Err(IllegalDecisionError::SwitchRequired(side)),
                _ => Err(IllegalDecisionError::NotInLegalSet(side)),
            };
        }
        GameState::WaitingForBothReplacements => {
            return match decision {
                Decision::Switch { team_index } => validate_switch(state, side, *team_index),
                _ => Err(IllegalDecisionError::SwitchRequired(side)),
            };
        }
        GameState::WaitingForDecisions => {}
    }

    let side_state = state.side(side);
    let active = side_state
        .active()
        .ok_or(IllegalDecisionError::NoActivePokemon(side))?;

    match decision {
        Decision::UseMove { slot } => {
            let move_slot = active
                .moves
                .get(*slot)
                .and_then(|s| s.as_ref())
                .ok_or(IllegalDecisionError::InvalidMoveSlot { side, slot: *slot })?;
            if move_slot.pp == 0 {
                return Err(IllegalDecisionError::NoPpRemaining { side, slot: *slot });
            }
            if let Some(VolatileStatus::ChoiceLock { slot: locked }) =
                side_state.volatiles.get(&VolatileKind::ChoiceLock)
            {
                if locked != slot {
                    return Err(IllegalDecisionError::MoveLocked { side, slot: *slot });
                }
            }
            Ok(())
        }
        Decision::Switch { team_index } => validate_switch(state, side, *team_index),
        Decision::Forced(_) => {
            // Only legal when nothing else is.
            let legal = legal_decisions(state, side);
            if legal == vec![Decision::Forced(ForcedReason::NoUsableMove)] {
                Ok(())
            } else {
                Err(IllegalDecisionError::NotInLegalSet(side))
            }
        }
        Decision::Pass => Ok(()),
    }
}

fn validate_switch(
    state: &BattleState,
    side: SideId,
    team_index: usize,
) -> Result<(), IllegalDecisionError> {
    let side_state = state.side(side);
    if team_index >= side_state.team.len() || team_index == side_state.active_index {
        return Err(IllegalDecisionError::InvalidSwitchTarget { side, team_index });
    }
    match side_state.member(team_index) {
        None => Err(IllegalDecisionError::InvalidSwitchTarget { side, team_index }),
        Some(p) if p.is_fainted() => {
            Err(IllegalDecisionError::SwitchTargetFainted { side, team_index })
        }
        Some(_) => Ok(()),
    }
}
