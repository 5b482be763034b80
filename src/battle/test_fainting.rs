use crate::battle::decisions::{legal_decisions, Decision};
use crate::battle::engine::resolve_turn;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, GameState, SkipReason};
use crate::pokemon::PokemonInst;
use crate::side::{Side, SideId};
use pokebattle_dex::Dex;
use pretty_assertions::assert_eq;

fn state_with(dex: &Dex, a: Vec<PokemonInst>, b: Vec<PokemonInst>) -> BattleState {
    BattleState::new(
        "faint-test",
        [Side::new("Red", a), Side::new("Blue", b)],
        BattleRng::Disabled,
    )
}

fn mon(dex: &Dex, species: &str, moves: &[&str]) -> PokemonInst {
    PokemonInst::new(dex, species, 50, None, moves).unwrap()
}

#[test]
fn knockout_with_reserve_pauses_for_replacement() {
    let dex = Dex::bundled();
    let mut weak = mon(&dex, "Pikachu", &["tackle"]);
    weak.current_hp = 1;
    let mut state = state_with(
        &dex,
        vec![mon(&dex, "Garchomp", &["earthquake"])],
        vec![weak, mon(&dex, "Snorlax", &["bodyslam"])],
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert_eq!(state.game_state, GameState::WaitingForReplacement(SideId::B));
    assert!(bus.contains(|e| matches!(e, BattleEvent::Fainted { side: SideId::B, .. })));
    assert!(bus.contains(|e| matches!(e, BattleEvent::ReplacementRequired { side: SideId::B })));

    // Only switches for the replacing side, only Pass for the other.
    assert_eq!(
        legal_decisions(&state, SideId::B),
        vec![Decision::Switch { team_index: 1 }]
    );
    assert_eq!(legal_decisions(&state, SideId::A), vec![Decision::Pass]);

    // The replacement round brings in the reserve without advancing the turn.
    let turn_before = state.turn_number;
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::Pass, Decision::Switch { team_index: 1 }],
    )
    .unwrap();
    assert_eq!(state.turn_number, turn_before);
    assert_eq!(state.game_state, GameState::WaitingForDecisions);
    assert!(bus.contains(|e| matches!(e, BattleEvent::Switched { side: SideId::B, .. })));
    assert_eq!(state.side(SideId::B).active().unwrap().name, "Snorlax");
}

#[test]
fn last_knockout_ends_the_battle() {
    let dex = Dex::bundled();
    let mut weak = mon(&dex, "Pikachu", &["tackle"]);
    weak.current_hp = 1;
    let mut state = state_with(
        &dex,
        vec![mon(&dex, "Garchomp", &["earthquake"])],
        vec![weak],
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert_eq!(state.game_state, GameState::SideWon(SideId::A));
    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::BattleEnded { winner: Some(SideId::A) }
    )));

    // A decided battle takes no further decisions.
    let err = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        crate::errors::BattleEngineError::IllegalDecision(
            crate::errors::IllegalDecisionError::NotAcceptingDecisions
        )
    ));
}

#[test]
fn fainted_user_skips_its_queued_action() {
    let dex = Dex::bundled();
    let mut weak = mon(&dex, "Pikachu", &["tackle"]);
    weak.current_hp = 1;
    // Garchomp outspeeds and knocks out before the slower action runs.
    let mut state = state_with(
        &dex,
        vec![mon(&dex, "Garchomp", &["earthquake"])],
        vec![weak, mon(&dex, "Snorlax", &["bodyslam"])],
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::ActionSkipped { side: SideId::B, reason: SkipReason::UserFainted }
    )));
    // The skipped move spent no PP.
    let fallen = state.side(SideId::B).member(0).unwrap();
    let tackle = fallen.moves[0].as_ref().unwrap();
    assert_eq!(tackle.pp, dex.get_move("tackle").unwrap().pp);
}

#[test]
fn recoil_suicide_leaves_the_slower_move_without_a_target() {
    let dex = Dex::bundled();
    let mut kamikaze = mon(&dex, "Blaziken", &["flareblitz"]);
    kamikaze.current_hp = 1;
    let mut state = state_with(
        &dex,
        vec![kamikaze, mon(&dex, "Weezing", &["sludgebomb"])],
        vec![mon(&dex, "Snorlax", &["tackle"])],
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    // Blaziken drops to its own recoil, so Snorlax's slower tackle has
    // nothing left to hit.
    assert!(bus.contains(|e| matches!(e, BattleEvent::Fainted { side: SideId::A, .. })));
    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::ActionSkipped { side: SideId::B, reason: SkipReason::TargetFainted }
    )));
    assert_eq!(state.game_state, GameState::WaitingForReplacement(SideId::A));
}

#[test]
fn double_knockout_with_reserves_asks_both_sides() {
    let dex = Dex::bundled();
    // Blaziken outspeeds, knocks out the 1 HP Snorlax, and drops to its
    // own recoil: a double knockout from a single action.
    let mut kamikaze = mon(&dex, "Blaziken", &["flareblitz"]);
    kamikaze.current_hp = 1;
    let mut frail = mon(&dex, "Snorlax", &["tackle"]);
    frail.current_hp = 1;
    let mut state = state_with(
        &dex,
        vec![kamikaze, mon(&dex, "Weezing", &["sludgebomb"])],
        vec![frail, mon(&dex, "Pikachu", &["thunderbolt"])],
    );

    resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert_eq!(state.game_state, GameState::WaitingForBothReplacements);

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::Switch { team_index: 1 }, Decision::Switch { team_index: 1 }],
    )
    .unwrap();
    assert_eq!(state.game_state, GameState::WaitingForDecisions);
    assert_eq!(state.side(SideId::A).active().unwrap().name, "Weezing");
    assert_eq!(state.side(SideId::B).active().unwrap().name, "Pikachu");

    // Replacements come in by side order, not speed.
    let switchers: Vec<SideId> = bus
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Switched { side, .. } => Some(*side),
            _ => None,
        })
        .collect();
    assert_eq!(switchers, vec![SideId::A, SideId::B]);
}
