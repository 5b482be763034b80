use crate::battle::decisions::Decision;
use crate::battle::engine::resolve_turn;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, GameState};
use crate::errors::{BattleEngineError, IllegalDecisionError};
use crate::pokemon::PokemonInst;
use crate::side::{Side, SideId};
use pokebattle_dex::Dex;
use pretty_assertions::assert_eq;

fn mon(dex: &Dex, species: &str, moves: &[&str]) -> PokemonInst {
    PokemonInst::new(dex, species, 50, None, moves).unwrap()
}

fn turn_one_state(dex: &Dex, rng: BattleRng) -> BattleState {
    let a = Side::new(
        "Red",
        vec![
            mon(dex, "Garchomp", &["earthquake", "dragonclaw"]),
            mon(dex, "Snorlax", &["bodyslam"]),
        ],
    );
    let b = Side::new(
        "Blue",
        vec![mon(dex, "Blastoise", &["surf", "icebeam"]), mon(dex, "Weezing", &["sludgebomb"])],
    );
    BattleState::new("determinism-test", [a, b], rng)
}

#[test]
fn same_seed_produces_identical_turns() {
    let dex = Dex::bundled();
    let decisions = [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 1 }];

    let mut first = turn_one_state(&dex, BattleRng::seeded(1234));
    let mut second = turn_one_state(&dex, BattleRng::seeded(1234));

    for _ in 0..3 {
        let bus_a = resolve_turn(&mut first, &dex, decisions.clone()).unwrap();
        let bus_b = resolve_turn(&mut second, &dex, decisions.clone()).unwrap();
        assert_eq!(bus_a, bus_b);
        assert_eq!(first.sides, second.sides);
        assert_eq!(first.field, second.field);
        assert_eq!(first.game_state, second.game_state);
        if first.game_state != GameState::WaitingForDecisions {
            break;
        }
    }
}

#[test]
fn disabled_randomness_is_fully_reproducible() {
    let dex = Dex::bundled();
    let decisions = [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }];

    let mut first = turn_one_state(&dex, BattleRng::Disabled);
    let mut second = turn_one_state(&dex, BattleRng::Disabled);
    let bus_a = resolve_turn(&mut first, &dex, decisions.clone()).unwrap();
    let bus_b = resolve_turn(&mut second, &dex, decisions).unwrap();

    assert_eq!(bus_a, bus_b);
    // Best-case rolls: no crit events, no misses.
    assert!(!bus_a.contains(|e| matches!(e, BattleEvent::CriticalHit)));
    assert!(!bus_a.contains(|e| matches!(e, BattleEvent::MoveMissed { .. })));
}

#[test]
fn passing_opponent_takes_best_case_damage() {
    let dex = Dex::bundled();
    let mut state = turn_one_state(&dex, BattleRng::Disabled);

    let dragon_claw = dex.get_move("dragonclaw").unwrap();
    let expected = crate::battle::damage::compute_damage(&state, SideId::A, dragon_claw, false, 100).damage;
    let hp_before = state.side(SideId::B).active().unwrap().current_hp;

    let bus =
        resolve_turn(&mut state, &dex, [Decision::UseMove { slot: 1 }, Decision::Pass]).unwrap();

    let hp_after = state.side(SideId::B).active().unwrap().current_hp;
    assert_eq!(hp_before - hp_after, expected);
    assert_eq!(
        bus.events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::DamageDealt { .. }))
            .count(),
        1
    );
    assert!(!bus.contains(|e| matches!(e, BattleEvent::Fainted { .. })));
    assert_eq!(state.game_state, GameState::WaitingForDecisions);
}

#[test]
fn scripted_draws_pin_down_every_roll() {
    let dex = Dex::bundled();
    // Garchomp first (crit pass at 2, min roll), Blastoise second
    // (no crit, max roll).
    let script = vec![2, 1, 50, 16];
    let decisions = [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }];

    let mut first = turn_one_state(&dex, BattleRng::scripted(script.clone()));
    let mut second = turn_one_state(&dex, BattleRng::scripted(script));
    let bus_a = resolve_turn(&mut first, &dex, decisions.clone()).unwrap();
    let bus_b = resolve_turn(&mut second, &dex, decisions).unwrap();

    assert_eq!(bus_a, bus_b);
    assert!(bus_a.contains(|e| matches!(e, BattleEvent::CriticalHit)));
}

#[test]
fn illegal_decision_rejects_without_touching_state() {
    let dex = Dex::bundled();
    let mut state = turn_one_state(&dex, BattleRng::Disabled);
    let before_sides = state.sides.clone();
    let before_field = state.field.clone();
    let before_turn = state.turn_number;
    let before_game_state = state.game_state;

    // Slot 3 is empty on Garchomp.
    let err = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 3 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap_err();

    assert_eq!(
        err,
        BattleEngineError::IllegalDecision(IllegalDecisionError::InvalidMoveSlot {
            side: SideId::A,
            slot: 3,
        })
    );
    assert_eq!(state.sides, before_sides);
    assert_eq!(state.field, before_field);
    assert_eq!(state.turn_number, before_turn);
    assert_eq!(state.game_state, before_game_state);

    // A valid pair still resolves afterwards.
    resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert_eq!(state.turn_number, before_turn + 1);
}

#[test]
fn switch_to_fainted_reserve_is_rejected_cleanly() {
    let dex = Dex::bundled();
    let mut state = turn_one_state(&dex, BattleRng::Disabled);
    state.side_mut(SideId::B).team[1].as_mut().unwrap().current_hp = 0;
    let before_sides = state.sides.clone();

    let err = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::Switch { team_index: 1 }],
    )
    .unwrap_err();

    assert_eq!(
        err,
        BattleEngineError::IllegalDecision(IllegalDecisionError::SwitchTargetFainted {
            side: SideId::B,
            team_index: 1,
        })
    );
    assert_eq!(state.sides, before_sides);
}
