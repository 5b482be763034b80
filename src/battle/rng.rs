use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every stochastic decision in turn resolution flows through here, so a
/// battle is fully determined by its seed (or its script).
#[derive(Debug, Clone)]
pub enum BattleRng {
    /// Reproducible randomness from a fixed seed.
    Seeded(StdRng),
    /// A fixed list of outcomes, consumed in order. For tests: panics when a
    /// draw is requested past the end of the script, so a test that asks for
    /// more randomness than it provided fails loudly.
    Scripted { values: Vec<u8>, cursor: usize },
    /// No randomness at all: every roll takes its best-case value. Hits land,
    /// secondary effects never trigger, damage rolls are maximal, nothing
    /// crits, and ties resolve in submission order.
    Disabled,
}

impl BattleRng {
    pub fn seeded(seed: u64) -> Self {
        BattleRng::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn scripted(values: Vec<u8>) -> Self {
        BattleRng::Scripted { values, cursor: 0 }
    }

    fn next_scripted(&mut self, label: &str) -> Option<u8> {
        match self {
            BattleRng::Scripted { values, cursor } => {
                let value = *values
                    .get(*cursor)
                    .unwrap_or_else(|| panic!("rng script exhausted at draw '{}'", label));
                *cursor += 1;
                Some(value)
            }
            _ => None,
        }
    }

    /// Draw 1..=100. The label names what the draw decides; it surfaces in
    /// the panic message when a script runs dry.
    pub fn percent(&mut self, label: &str) -> u8 {
        if let Some(v) = self.next_scripted(label) {
            return v.clamp(1, 100);
        }
        match self {
            BattleRng::Seeded(rng) => rng.random_range(1..=100),
            BattleRng::Disabled => 1,
            BattleRng::Scripted { .. } => unreachable!(),
        }
    }

    /// True with the given probability. Disabled mode never triggers chance
    /// effects: the check only passes at 100%.
    pub fn chance(&mut self, percent: u8, label: &str) -> bool {
        if percent >= 100 {
            return true;
        }
        if percent == 0 {
            return false;
        }
        match self {
            BattleRng::Disabled => false,
            _ => self.percent(label) <= percent,
        }
    }

    /// Damage spread, 85..=100. Disabled mode always rolls full.
    pub fn damage_roll(&mut self) -> u8 {
        if let Some(v) = self.next_scripted("damage roll") {
            return 85 + (v.saturating_sub(1) % 16);
        }
        match self {
            BattleRng::Seeded(rng) => rng.random_range(85..=100),
            BattleRng::Disabled => 100,
            BattleRng::Scripted { .. } => unreachable!(),
        }
    }

    /// Even-odds tiebreak. Disabled mode always answers true, which keeps
    /// ordering stable for the first-submitted action.
    pub fn coin_flip(&mut self, label: &str) -> bool {
        if let Some(v) = self.next_scripted(label) {
            return v % 2 == 1;
        }
        match self {
            BattleRng::Seeded(rng) => rng.random_bool(0.5),
            BattleRng::Disabled => true,
            BattleRng::Scripted { .. } => unreachable!(),
        }
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        BattleRng::Disabled
    }
}
