//! Core engine types: players, state, configuration, errors.
//!
//! These are the data the rest of the crate operates on. They carry no
//! rule logic beyond the derived queries the engine and aggregator share.

pub mod player;
pub mod state;
pub mod config;
pub mod error;

pub use player::{Player, PlayerId, Roster};
pub use state::{Counts, Distribution, GameState, Phase, Round, Scores};
pub use config::{EngineConfig, DEFAULT_STORAGE_KEY, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{EngineError, Result, ValidationOutcome};
