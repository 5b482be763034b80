use crate::side::SideId;
use pokebattle_dex::DexError;
use std::fmt;

/// Main error type for the battle engine.
///
/// `IllegalDecision` is recoverable: the caller may resubmit. The other two
/// classes are fatal for the battle and are always propagated, never
/// swallowed.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEngineError {
    /// A submitted decision violates the current legal-action set.
    IllegalDecision(IllegalDecisionError),
    /// The data catalog is missing a referenced identifier.
    DataNotFound(DexError),
    /// An internal consistency check failed; this is an engine bug, not bad
    /// input.
    InvariantViolation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IllegalDecisionError {
    /// The battle is terminal or mid-turn; no decisions are accepted.
    NotAcceptingDecisions,
    /// The side has no active creature to act with.
    NoActivePokemon(SideId),
    /// Move slot is out of bounds or empty.
    InvalidMoveSlot { side: SideId, slot: usize },
    /// The selected move has no uses remaining.
    NoPpRemaining { side: SideId, slot: usize },
    /// A choice-lock restricts the side to a different move slot.
    MoveLocked { side: SideId, slot: usize },
    /// Switch target is out of bounds, empty, or already active.
    InvalidSwitchTarget { side: SideId, team_index: usize },
    /// Switch target has fainted.
    SwitchTargetFainted { side: SideId, team_index: usize },
    /// A replacement phase requires this side to switch.
    SwitchRequired(SideId),
    /// The decision is not a member of the supplied legal set (AI contract).
    NotInLegalSet(SideId),
}

impl fmt::Display for BattleEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEngineError::IllegalDecision(err) => write!(f, "illegal decision: {}", err),
            BattleEngineError::DataNotFound(err) => write!(f, "data not found: {}", err),
            BattleEngineError::InvariantViolation(details) => {
                write!(f, "invariant violation: {}", details)
            }
        }
    }
}

impl fmt::Display for IllegalDecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalDecisionError::NotAcceptingDecisions => {
                write!(f, "battle is not accepting decisions")
            }
            IllegalDecisionError::NoActivePokemon(side) => {
                write!(f, "{} has no active pokemon", side)
            }
            IllegalDecisionError::InvalidMoveSlot { side, slot } => {
                write!(f, "{} selected invalid move slot {}", side, slot)
            }
            IllegalDecisionError::NoPpRemaining { side, slot } => {
                write!(f, "{} move slot {} has no PP remaining", side, slot)
            }
            IllegalDecisionError::MoveLocked { side, slot } => {
                write!(f, "{} is locked into a different move than slot {}", side, slot)
            }
            IllegalDecisionError::InvalidSwitchTarget { side, team_index } => {
                write!(f, "{} selected invalid switch target {}", side, team_index)
            }
            IllegalDecisionError::SwitchTargetFainted { side, team_index } => {
                write!(f, "{} switch target {} has fainted", side, team_index)
            }
            IllegalDecisionError::SwitchRequired(side) => {
                write!(f, "{} must switch in a replacement", side)
            }
            IllegalDecisionError::NotInLegalSet(side) => {
                write!(f, "{} submitted a decision outside the legal set", side)
            }
        }
    }
}

impl std::error::Error for BattleEngineError {}
impl std::error::Error for IllegalDecisionError {}

impl From<IllegalDecisionError> for BattleEngineError {
    fn from(err: IllegalDecisionError) -> Self {
        BattleEngineError::IllegalDecision(err)
    }
}

impl From<DexError> for BattleEngineError {
    fn from(err: DexError) -> Self {
        BattleEngineError::DataNotFound(err)
    }
}

/// Type alias for Results using BattleEngineError.
pub type BattleResult<T> = Result<T, BattleEngineError>;
