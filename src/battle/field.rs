use pokebattle_dex::{TerrainKind, WeatherKind};
use serde::{Deserialize, Serialize};

/// How long a field condition lasts. Primal weather is indefinite: it never
/// ticks down and only yields to another primal setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldDuration {
    Turns(u8),
    Indefinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    pub duration: FieldDuration,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainState {
    pub kind: TerrainKind,
    pub duration: FieldDuration,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Option<WeatherState>,
    pub terrain: Option<TerrainState>,
}

impl FieldState {
    /// Replace the weather. Ordinary weather cannot displace primal weather;
    /// returns whether the change took effect. Re-setting the same kind also
    /// fails, matching move behavior.
    pub fn set_weather(&mut self, kind: WeatherKind, duration: FieldDuration) -> bool {
        if let Some(current) = &self.weather {
            if current.kind == kind {
                return false;
            }
            if current.kind.is_primal() && !kind.is_primal() {
                return false;
            }
        }
        self.weather = Some(WeatherState { kind, duration });
        true
    }

    pub fn set_terrain(&mut self, kind: TerrainKind, duration: FieldDuration) -> bool {
        if let Some(current) = &self.terrain {
            if current.kind == kind {
                return false;
            }
        }
        self.terrain = Some(TerrainState { kind, duration });
        true
    }

    pub fn weather_kind(&self) -> Option<WeatherKind> {
        self.weather.map(|w| w.kind)
    }

    pub fn terrain_kind(&self) -> Option<TerrainKind> {
        self.terrain.map(|t| t.kind)
    }

    /// Count down timed conditions. Indefinite conditions are exempt. Returns
    /// the weather and terrain that ended this turn, if any.
    pub fn tick(&mut self) -> (Option<WeatherKind>, Option<TerrainKind>) {
        let mut ended_weather = None;
        if let Some(state) = &mut self.weather {
            if let FieldDuration::Turns(turns) = &mut state.duration {
                *turns -= 1;
                if *turns == 0 {
                    ended_weather = Some(state.kind);
                    self.weather = None;
                }
            }
        }
        let mut ended_terrain = None;
        if let Some(state) = &mut self.terrain {
            if let FieldDuration::Turns(turns) = &mut state.duration {
                *turns -= 1;
                if *turns == 0 {
                    ended_terrain = Some(state.kind);
                    self.terrain = None;
                }
            }
        }
        (ended_weather, ended_terrain)
    }
}
