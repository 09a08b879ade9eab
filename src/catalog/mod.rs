//! Game type catalog.
//!
//! - `GameType`: one contract (code, label, count or single rule)
//! - `GameTypeCatalog`: the fixed, ordered set and the scoring function

pub mod game_type;
pub mod registry;

pub use game_type::{GameKind, GameType};
pub use registry::{GameTypeCatalog, STANDARD_TYPES};
