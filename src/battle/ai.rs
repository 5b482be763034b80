use crate::battle::damage::compute_damage;
use crate::battle::decisions::Decision;
use crate::battle::state::BattleState;
use crate::side::SideId;
use ordered_float::OrderedFloat;
use pokebattle_dex::Dex;

/// A decision source for one side. Implementations must return a decision
/// from the provided legal set; the runner rejects anything else.
pub trait DecisionPolicy {
    fn choose(
        &mut self,
        state: &BattleState,
        dex: &Dex,
        side: SideId,
        legal: &[Decision],
    ) -> Decision;
}

/// Greedy one-turn lookahead: score each legal decision by projected
/// damage against the current opposing creature and take the best. Ties
/// break toward the earlier option in the legal set, which keeps the
/// policy deterministic.
#[derive(Debug, Default)]
pub struct ScoringPolicy;

impl ScoringPolicy {
    fn score(&self, state: &BattleState, dex: &Dex, side: SideId, decision: &Decision) -> f32 {
        match decision {
            Decision::UseMove { slot } => {
                let Some(active) = state.side(side).active() else { return 0.0 };
                let Some(move_slot) = active.moves.get(*slot).and_then(|s| s.as_ref()) else {
                    return 0.0;
                };
                let Ok(move_data) = dex.get_move(&move_slot.move_id) else { return 0.0 };
                if !move_data.is_damaging() {
                    // Flat nudge so status moves beat switching but lose to
                    // any real damage.
                    return 5.0;
                }
                // Average roll, no crit: a stable projection.
                let outcome = compute_damage(state, side, move_data, false, 92);
                let target_hp = state
                    .side(side.opponent())
                    .active()
                    .map_or(1, |p| p.current_hp.max(1));
                let fraction = outcome.damage as f32 / target_hp as f32;
                // A projected knockout is worth the same no matter the
                // overkill.
                fraction.min(1.0) * 100.0
            }
            Decision::Switch { .. } => 1.0,
            Decision::Forced(_) | Decision::Pass => 0.0,
        }
    }
}

impl DecisionPolicy for ScoringPolicy {
    fn choose(
        &mut self,
        state: &BattleState,
        dex: &Dex,
        side: SideId,
        legal: &[Decision],
    ) -> Decision {
        let mut best: Option<(OrderedFloat<f32>, &Decision)> = None;
        for decision in legal {
            let score = OrderedFloat(self.score(state, dex, side, decision));
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, decision));
            }
        }
        best.map(|(_, d)| d.clone()).unwrap_or(Decision::Pass)
    }
}

/// Always takes the first legal decision. Useful as a dumb baseline and
/// in tests that need a predictable opponent.
#[derive(Debug, Default)]
pub struct FirstLegalPolicy;

impl DecisionPolicy for FirstLegalPolicy {
    fn choose(
        &mut self,
        _state: &BattleState,
        _dex: &Dex,
        _side: SideId,
        legal: &[Decision],
    ) -> Decision {
        legal.first().cloned().unwrap_or(Decision::Pass)
    }
}
