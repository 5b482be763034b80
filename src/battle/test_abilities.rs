use crate::battle::decisions::Decision;
use crate::battle::engine::{begin_battle, resolve_turn};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleState, DamageSource};
use crate::pokemon::{FormState, PokemonInst, StatusCondition};
use crate::side::{Side, SideId};
use pokebattle_dex::{Dex, StatKind, WeatherKind};
use pretty_assertions::assert_eq;

fn mon(dex: &Dex, species: &str, moves: &[&str]) -> PokemonInst {
    PokemonInst::new(dex, species, 50, None, moves).unwrap()
}

fn duel(dex: &Dex, a: PokemonInst, b: PokemonInst, rng: BattleRng) -> BattleState {
    BattleState::new(
        "ability-test",
        [Side::new("Red", vec![a]), Side::new("Blue", vec![b])],
        rng,
    )
}

#[test]
fn disguise_eats_the_first_damaging_hit() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        mon(&dex, "Garchomp", &["ironhead"]),
        mon(&dex, "Mimikyu", &["shadowball"]),
        BattleRng::Disabled,
    );
    let mimikyu_max = state.side(SideId::B).active().unwrap().max_hp();

    let both = [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }];
    let bus = resolve_turn(&mut state, &dex, both.clone()).unwrap();

    // The hit lands on the disguise, not on Mimikyu.
    assert!(bus.contains(|e| matches!(e, BattleEvent::HitBlocked { .. })));
    assert!(bus.contains(|e| matches!(e, BattleEvent::FormChanged { .. })));
    assert!(!bus.contains(|e| matches!(
        e,
        BattleEvent::DamageDealt { target: SideId::B, source: DamageSource::Move, .. }
    )));
    let mimikyu = state.side(SideId::B).active().unwrap();
    assert_eq!(mimikyu.current_hp, mimikyu_max);
    assert_eq!(mimikyu.form, FormState::Busted);

    // The second hit goes through; the bust never resets.
    let bus = resolve_turn(&mut state, &dex, both).unwrap();
    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::DamageDealt { target: SideId::B, source: DamageSource::Move, .. }
    )));
    assert!(state.side(SideId::B).active().unwrap().current_hp < mimikyu_max);
}

#[test]
fn disguise_ignores_status_moves() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        mon(&dex, "Pikachu", &["thunderwave"]),
        mon(&dex, "Mimikyu", &["shadowball"]),
        BattleRng::Disabled,
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    // Status moves pass the disguise untouched and leave it intact.
    assert!(!bus.contains(|e| matches!(e, BattleEvent::HitBlocked { .. })));
    let mimikyu = state.side(SideId::B).active().unwrap();
    assert_eq!(mimikyu.form, FormState::Normal);
    assert_eq!(mimikyu.status, Some(StatusCondition::Paralysis));
}

#[test]
fn intimidate_lowers_the_opposing_attack_on_entry() {
    let dex = Dex::bundled();
    let a = Side::new(
        "Red",
        vec![mon(&dex, "Blastoise", &["surf"]), mon(&dex, "Gyarados", &["waterfall"])],
    );
    let b = Side::new("Blue", vec![mon(&dex, "Snorlax", &["bodyslam"])]);
    let mut state = BattleState::new("ability-test", [a, b], BattleRng::Disabled);

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::Switch { team_index: 1 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::AbilityActivated { ability, .. } if ability == "Intimidate"
    )));
    assert_eq!(state.side(SideId::B).stat_stage(StatKind::Attack), -1);
}

#[test]
fn entry_weather_and_the_primal_pecking_order() {
    let dex = Dex::bundled();
    let a = Side::new("Red", vec![mon(&dex, "Kyogre", &["recover"])]);
    let b = Side::new("Blue", vec![mon(&dex, "Torkoal", &["flamethrower"])]);
    let mut state = BattleState::new("ability-test", [a, b], BattleRng::Disabled);

    // Kyogre is faster, so its sea wins the opening exchange; Torkoal's
    // ordinary sun cannot displace it.
    let bus = begin_battle(&mut state).unwrap();
    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::WeatherStarted { weather: WeatherKind::HeavyRain }
    )));
    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::WeatherChangeFailed { weather: WeatherKind::Sun }
    )));
    assert_eq!(state.field.weather_kind(), Some(WeatherKind::HeavyRain));

    // Fire attacks fizzle outright under the heavy rain.
    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();
    assert!(bus.contains(|e| matches!(e, BattleEvent::MoveFailed { side: SideId::B, .. })));
    assert!(!bus.contains(|e| matches!(
        e,
        BattleEvent::DamageDealt { target: SideId::A, source: DamageSource::Move, .. }
    )));

    // The indefinite rain is still up after an ordinary setter's five turns
    // would have lapsed.
    for _ in 0..6 {
        resolve_turn(
            &mut state,
            &dex,
            [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
        )
        .unwrap();
    }
    assert_eq!(state.field.weather_kind(), Some(WeatherKind::HeavyRain));
}

#[test]
fn levitate_voids_ground_moves() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        mon(&dex, "Garchomp", &["earthquake"]),
        mon(&dex, "Weezing", &["sludgebomb"]),
        BattleRng::Disabled,
    );
    let weezing_max = state.side(SideId::B).active().unwrap().max_hp();

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::AbilityActivated { ability, .. } if ability == "Levitate"
    )));
    assert!(bus.contains(|e| matches!(e, BattleEvent::MoveHadNoEffect { .. })));
    assert_eq!(state.side(SideId::B).active().unwrap().current_hp, weezing_max);
}

#[test]
fn static_can_paralyze_on_contact() {
    let dex = Dex::bundled();
    // Draws: Pikachu's priority hit (crit, roll), then Snorlax's tackle
    // (crit, roll) and the 30% contact check, scripted to pass.
    let mut state = duel(
        &dex,
        mon(&dex, "Snorlax", &["tackle"]),
        mon(&dex, "Pikachu", &["quickattack"]),
        BattleRng::scripted(vec![50, 16, 50, 16, 10]),
    );

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::AbilityActivated { ability, .. } if ability == "Static"
    )));
    assert_eq!(
        state.side(SideId::A).active().unwrap().status,
        Some(StatusCondition::Paralysis)
    );
}

#[test]
fn rough_skin_chips_contact_attackers() {
    let dex = Dex::bundled();
    let mut state = duel(
        &dex,
        mon(&dex, "Snorlax", &["bodyslam"]),
        mon(&dex, "Garchomp", &["swordsdance"]),
        BattleRng::Disabled,
    );
    let snorlax_max = state.side(SideId::A).active().unwrap().max_hp();

    let bus = resolve_turn(
        &mut state,
        &dex,
        [Decision::UseMove { slot: 0 }, Decision::UseMove { slot: 0 }],
    )
    .unwrap();

    assert!(bus.contains(|e| matches!(
        e,
        BattleEvent::DamageDealt {
            target: SideId::A,
            source: DamageSource::Ability,
            amount,
            ..
        } if *amount == snorlax_max / 8
    )));
}
