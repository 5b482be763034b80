use crate::battle::ai::DecisionPolicy;
use crate::battle::decisions::{legal_decisions, Decision};
use crate::battle::engine::{begin_battle, resolve_turn};
use crate::battle::state::{BattleState, EventBus, GameState};
use crate::errors::{BattleResult, IllegalDecisionError};
use crate::side::SideId;
use pokebattle_dex::Dex;

#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub winner: Option<SideId>,
    pub turns: u32,
}

/// Drives a battle between two decision policies until someone wins, the
/// battle draws, or the turn cap trips. Accumulates the full transcript.
pub struct BattleRunner<'d> {
    dex: &'d Dex,
    pub state: BattleState,
    policies: [Box<dyn DecisionPolicy>; 2],
    transcript: Vec<EventBus>,
    started: bool,
}

impl<'d> BattleRunner<'d> {
    pub fn new(
        dex: &'d Dex,
        state: BattleState,
        policies: [Box<dyn DecisionPolicy>; 2],
    ) -> Self {
        Self { dex, state, policies, transcript: Vec::new(), started: false }
    }

    /// One resolution step: ask both policies, resolve, record the events.
    /// A policy that wanders outside its legal set is an engine-level
    /// error, not a quiet fallback.
    pub fn step(&mut self) -> BattleResult<&EventBus> {
        if !self.started {
            let opening = begin_battle(&mut self.state)?;
            self.transcript.push(opening);
            self.started = true;
        }
        let mut decisions: [Decision; 2] = [Decision::Pass, Decision::Pass];
        for side in SideId::both() {
            let legal = legal_decisions(&self.state, side);
            let choice =
                self.policies[side.index()].choose(&self.state, self.dex, side, &legal);
            if !legal.contains(&choice) {
                return Err(IllegalDecisionError::NotInLegalSet(side).into());
            }
            decisions[side.index()] = choice;
        }
        let bus = resolve_turn(&mut self.state, self.dex, decisions)?;
        self.transcript.push(bus);
        Ok(self.transcript.last().expect("just pushed"))
    }

    pub fn run_to_completion(&mut self, max_turns: u32) -> BattleResult<BattleOutcome> {
        while !self.state.game_state.is_terminal() && self.state.turn_number <= max_turns {
            self.step()?;
        }
        let winner = match self.state.game_state {
            GameState::SideWon(side) => Some(side),
            _ => None,
        };
        Ok(BattleOutcome { winner, turns: self.state.turn_number.saturating_sub(1) })
    }

    pub fn transcript(&self) -> &[EventBus] {
        &self.transcript
    }
}
