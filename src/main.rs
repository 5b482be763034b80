use pokebattle::battle::ai::ScoringPolicy;
use pokebattle::battle::rng::BattleRng;
use pokebattle::battle::runner::BattleRunner;
use pokebattle::battle::state::BattleState;
use pokebattle::teams;
use pokebattle_dex::Dex;

/// Runs a demo battle between the two prefab rosters and prints the
/// transcript. An optional first argument seeds the randomness; without
/// one the battle runs with randomness disabled, so repeated runs agree.
fn main() {
    let rng = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => BattleRng::seeded(seed),
            Err(_) => {
                eprintln!("usage: pokebattle [seed]");
                std::process::exit(2);
            }
        },
        None => BattleRng::Disabled,
    };

    let dex = Dex::bundled();
    let red = match teams::kanto_classics(&dex, "Red") {
        Ok(side) => side,
        Err(err) => {
            eprintln!("roster error: {}", err);
            std::process::exit(1);
        }
    };
    let blue = match teams::weather_squad(&dex, "Blue") {
        Ok(side) => side,
        Err(err) => {
            eprintln!("roster error: {}", err);
            std::process::exit(1);
        }
    };

    let state = BattleState::new("demo", [red, blue], rng);
    let mut runner = BattleRunner::new(
        &dex,
        state,
        [Box::new(ScoringPolicy), Box::new(ScoringPolicy)],
    );

    match runner.run_to_completion(300) {
        Ok(outcome) => {
            for bus in runner.transcript() {
                print!("{}", bus);
            }
            match outcome.winner {
                Some(side) => println!("Winner after {} turns: {}", outcome.turns, side),
                None => println!("No winner after {} turns.", outcome.turns),
            }
        }
        Err(err) => {
            eprintln!("battle error: {}", err);
            std::process::exit(1);
        }
    }
}
