//! Turn resolution engine for two-sided, one-active-each battles.
//!
//! The core entry point is [`battle::engine::resolve_turn`]: battle state
//! plus one decision per side in, the next state plus an ordered event
//! transcript out. Everything stochastic flows through [`battle::rng::BattleRng`],
//! so a seed (or a script, or disabling randomness outright) pins down the
//! entire battle.

pub mod battle;
pub mod errors;
pub mod pokemon;
pub mod side;
pub mod teams;

pub use battle::ai::{DecisionPolicy, FirstLegalPolicy, ScoringPolicy};
pub use battle::decisions::{legal_decisions, Decision, ForcedReason};
pub use battle::engine::{begin_battle, resolve_turn};
pub use battle::rng::BattleRng;
pub use battle::runner::{BattleOutcome, BattleRunner};
pub use battle::state::{BattleEvent, BattleState, EventBus, GameState};
pub use errors::{BattleEngineError, BattleResult, IllegalDecisionError};
pub use pokemon::{PokemonInst, StatusCondition};
pub use side::{Side, SideId};
