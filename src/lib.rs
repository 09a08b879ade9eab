//! # king-score
//!
//! Round and scoring state engine for King, a 3-4 player trick-avoidance
//! card game.
//!
//! Each player in turn leads a round under a game type they have not led
//! yet. Players report the outcome (who took how many queens, who took the
//! king of hearts, ...) and the game type converts it into points. The game
//! ends once every player has led all nine types.
//!
//! ## Design Principles
//!
//! 1. **Single owner**: `RoundEngine` exclusively owns the `GameState`.
//!    Callers send intents and receive read-only views.
//!
//! 2. **Derived scores**: round scores come from the catalog, totals and
//!    winner from round history. Nothing is entered twice.
//!
//! 3. **Recoverable errors**: a rejected intent leaves state untouched and
//!    carries a user-facing message. Persistence failures are swallowed.
//!
//! ## Modules
//!
//! - `core`: players, state, configuration, errors
//! - `catalog`: the nine game types and round scoring
//! - `rules`: the round state machine and the leader's type selection
//! - `scoring`: totals, standings, winner, score sheet
//! - `snapshot`: JSON snapshots, key-value stores, persistent session
//!
//! ## Example
//!
//! ```
//! use king_score::{Distribution, PlayerId, RoundEngine, ScoreAggregator};
//!
//! let mut engine = RoundEngine::default();
//! engine.start_with_names(["Ann", "Bob", "Cid"]).unwrap();
//!
//! // Ann leads "No King of hearts"; Bob takes it.
//! engine
//!     .record_round(&PlayerId::new("p1"), "K", Distribution::target("p2"))
//!     .unwrap();
//!
//! let totals = ScoreAggregator::totals(engine.state());
//! assert_eq!(totals[&PlayerId::new("p2")], -40);
//! assert_eq!(engine.active_leader().unwrap().name, "Bob");
//! ```

pub mod core;
pub mod catalog;
pub mod rules;
pub mod scoring;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{
    Counts, Distribution, EngineConfig, EngineError, GameState, Phase, Player, PlayerId, Roster,
    Round, Scores, ValidationOutcome,
};

pub use crate::catalog::{GameKind, GameType, GameTypeCatalog, STANDARD_TYPES};

pub use crate::rules::{AvailabilityRow, RoundEngine, TypeSelection};

pub use crate::scoring::{ScoreAggregator, ScoreSheet, SheetRow, Standing};

pub use crate::snapshot::{
    FileSnapshotStore, MemorySnapshotStore, ScoreKeeper, SnapshotError, SnapshotStore,
};
