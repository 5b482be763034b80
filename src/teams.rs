use crate::errors::BattleResult;
use crate::pokemon::PokemonInst;
use crate::side::Side;
use pokebattle_dex::Dex;

/// Prefab rosters for demos and quick battles. Every entry resolves
/// against the bundled catalog.
pub fn kanto_classics(dex: &Dex, name: &str) -> BattleResult<Side> {
    let roster = vec![
        PokemonInst::new(dex, "Pikachu", 50, Some("choicescarf"), &["thunderbolt", "quickattack", "thunderwave", "lightscreen"])?,
        PokemonInst::new(dex, "Charizard", 50, None, &["flamethrower", "dragonclaw", "sunnyday", "willowisp"])?,
        PokemonInst::new(dex, "Blastoise", 50, Some("leftovers"), &["surf", "icebeam", "toxic", "recover"])?,
        PokemonInst::new(dex, "Venusaur", 50, None, &["energyball", "sludgebomb", "spore", "gigadrain"])?,
        PokemonInst::new(dex, "Snorlax", 50, Some("leftovers"), &["bodyslam", "crunch", "earthquake", "recover"])?,
        PokemonInst::new(dex, "Garchomp", 50, Some("lifeorb"), &["earthquake", "dragonclaw", "ironhead", "swordsdance"])?,
    ];
    Ok(Side::new(name, roster))
}

pub fn weather_squad(dex: &Dex, name: &str) -> BattleResult<Side> {
    let roster = vec![
        PokemonInst::new(dex, "Pelipper", 50, None, &["hydropump", "surf", "icebeam", "raindance"])?,
        PokemonInst::new(dex, "Ludicolo", 50, Some("lifeorb"), &["surf", "energyball", "icebeam", "gigadrain"])?,
        PokemonInst::new(dex, "Tyranitar", 50, Some("leftovers"), &["rockslide", "crunch", "earthquake", "sandstorm"])?,
        PokemonInst::new(dex, "Torkoal", 50, None, &["flamethrower", "bodyslam", "sunnyday", "willowisp"])?,
        PokemonInst::new(dex, "Mimikyu", 50, Some("lifeorb"), &["playrough", "shadowsneak", "swordsdance", "shadowball"])?,
        PokemonInst::new(dex, "Blaziken", 50, Some("expertbelt"), &["flareblitz", "ironhead", "earthquake", "flamethrower"])?,
    ];
    Ok(Side::new(name, roster))
}
