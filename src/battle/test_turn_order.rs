use crate::battle::decisions::Decision;
use crate::battle::engine::{begin_battle, resolve_turn};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState};
use crate::pokemon::PokemonInst;
use crate::side::{Side, SideId};
use pokebattle_dex::{Dex, WeatherKind};
use pretty_assertions::assert_eq;

fn duel(dex: &Dex, a: (&str, &[&str]), b: (&str, &[&str]), rng: BattleRng) -> BattleState {
    let side_a = Side::new("Red", vec![PokemonInst::new(dex, a.0, 50, None, a.1).unwrap()]);
    let side_b = Side::new("Blue", vec![PokemonInst::new(dex, b.0, 50, None, b.1).unwrap()]);
    BattleState::new("order-test", [side_a, side_b], rng)
}

fn move_users(bus: &crate::battle::state::EventBus) -> Vec<SideId> {
    bus.events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::MoveUsed { side, .. } => Some(*side),
            _ => None,
        })
        .collect()
}

#[test]
fn faster_side_moves_first() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        ("Pikachu", &["tackle"]),
        ("Snorlax", &["tackle"]),
        BattleRng::Disabled,
    );
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert_eq!(move_users(&bus), vec![SideId::A, SideId::B]);
}

#[test]
fn priority_trumps_speed() {
    let dex = Dex::bundled();
    // Snorlax is far slower but its priority move still goes first.
    let mut state = duel(
        &dex,
        ("Snorlax", &["shadowsneak"]),
        ("Pikachu", &["thunderbolt"]),
        BattleRng::Disabled,
    );
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert_eq!(move_users(&bus), vec![SideId::A, SideId::B]);
}

#[test]
fn switches_resolve_before_any_move() {
    let dex = Dex::bundled();
    let side_a = Side::new(
        "Red",
        vec![
            PokemonInst::new(&dex, "Snorlax", 50, None, &["tackle"]).unwrap(),
            PokemonInst::new(&dex, "Weezing", 50, None, &["sludgebomb"]).unwrap(),
        ],
    );
    let side_b = Side::new(
        "Blue",
        vec![PokemonInst::new(&dex, "Pikachu", 50, None, &["quickattack"]).unwrap()],
    );
    let mut state = BattleState::new("order-test", [side_a, side_b], BattleRng::Disabled);

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::Switch { team_index: 1 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    let switch_pos = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::Switched { .. }))
        .unwrap();
    let move_pos = bus
        .events()
        .iter()
        .position(|e| matches!(e, BattleEvent::MoveUsed { .. }))
        .unwrap();
    assert!(switch_pos < move_pos);
    // The incoming creature takes the hit.
    assert_eq!(state.side(SideId::A).active_index, 1);
    assert!(state.side(SideId::A).active().unwrap().current_hp < state.side(SideId::A).active().unwrap().max_hp());
}

#[test]
fn speed_ties_fall_to_the_coin() {
    let dex = Dex::bundled();
    // Identical creatures, identical moves: the scripted flip decides.
    // Draw order: tie flip, then crit and damage roll per hit.
    let mut state = duel(
        &dex,
        ("Kyogre", &["tackle"]),
        ("Kyogre", &["tackle"]),
        BattleRng::scripted(vec![2, 50, 16, 50, 16]),
    );
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    // An even flip sends the second side first.
    assert_eq!(move_users(&bus), vec![SideId::B, SideId::A]);

    let mut state = duel(
        &dex,
        ("Kyogre", &["tackle"]),
        ("Kyogre", &["tackle"]),
        BattleRng::scripted(vec![1, 50, 16, 50, 16]),
    );
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert_eq!(move_users(&bus), vec![SideId::A, SideId::B]);
}

#[test]
fn opening_entry_hooks_respect_the_tie_coin() {
    let dex = Dex::bundled();
    // Kyogre and Groudon tie on speed, and the later primal entry owns the
    // sky, so the final weather exposes the opening order.
    let mut state = duel(
        &dex,
        ("Kyogre", &["tackle"]),
        ("Groudon", &["tackle"]),
        BattleRng::scripted(vec![2]),
    );
    begin_battle(&mut state).unwrap();
    // Even flip: Groudon enters first, Kyogre's sea lands on top.
    assert_eq!(state.field.weather_kind(), Some(WeatherKind::HeavyRain));

    let mut state = duel(
        &dex,
        ("Kyogre", &["tackle"]),
        ("Groudon", &["tackle"]),
        BattleRng::scripted(vec![1]),
    );
    begin_battle(&mut state).unwrap();
    assert_eq!(state.field.weather_kind(), Some(WeatherKind::HarshSun));
}

#[test]
fn disabled_rng_resolves_ties_in_submission_order() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        ("Kyogre", &["tackle"]),
        ("Kyogre", &["tackle"]),
        BattleRng::Disabled,
    );
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert_eq!(move_users(&bus), vec![SideId::A, SideId::B]);
}
