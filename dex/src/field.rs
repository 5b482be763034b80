use serde::{Deserialize, Serialize};

/// Weather kinds the catalog can reference.
///
/// `HeavyRain` and `HarshSun` are the primal variants: set only by their
/// designated abilities, with indefinite duration, and only displaced by a
/// competing weather-setting effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum WeatherKind {
    Rain,
    Sun,
    Sand,
    HeavyRain,
    HarshSun,
}

impl WeatherKind {
    /// Whether this weather is only ever set with indefinite duration.
    pub fn is_primal(self) -> bool {
        matches!(self, WeatherKind::HeavyRain | WeatherKind::HarshSun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TerrainKind {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ScreenKind {
    Reflect,
    LightScreen,
}
