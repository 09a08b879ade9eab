//! Round rules: the state machine and the leader's type selection.
//!
//! - `RoundEngine`: owns the game state, validates and records rounds,
//!   rotates the lead, edits the last round, resets
//! - `TypeSelection`: the draft a leader fills in before ending a round

pub mod engine;
pub mod selection;

pub use engine::{AvailabilityRow, RoundEngine};
pub use selection::TypeSelection;
