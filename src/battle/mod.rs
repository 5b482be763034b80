pub mod abilities;
pub mod ai;
pub mod commands;
pub mod damage;
pub mod decisions;
pub mod engine;
pub mod field;
pub mod hooks;
pub mod items;
pub mod rng;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
mod test_abilities;
#[cfg(test)]
mod test_determinism;
#[cfg(test)]
mod test_fainting;
#[cfg(test)]
mod test_turn_order;
