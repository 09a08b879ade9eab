//! Engine configuration.
//!
//! The rule catalog is fixed; what callers configure is the seating range
//! and where the snapshot lives in the key-value store.

use serde::{Deserialize, Serialize};

/// Storage key the snapshot is saved under by default.
pub const DEFAULT_STORAGE_KEY: &str = "king-score-state";

/// Fewest players King can seat.
pub const MIN_PLAYERS: usize = 3;

/// Most players King can seat.
pub const MAX_PLAYERS: usize = 4;

/// Configuration for a `RoundEngine` and its persistence session.
///
/// ## Example
///
/// ```
/// use king_score::core::EngineConfig;
///
/// let config = EngineConfig::default().with_storage_key("table-2");
/// assert_eq!(config.min_players, 3);
/// assert_eq!(config.max_players, 4);
/// assert_eq!(config.storage_key, "table-2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fewest players that can be seated. Never below `MIN_PLAYERS`.
    pub min_players: usize,

    /// Most players that can be seated. Never above `MAX_PLAYERS`.
    pub max_players: usize,

    /// Key under which the snapshot is stored.
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the allowed player count range.
    ///
    /// Bounds are clamped to `MIN_PLAYERS..=MAX_PLAYERS`.
    #[must_use]
    pub fn with_player_range(mut self, min_players: usize, max_players: usize) -> Self {
        self.min_players = min_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.max_players = max_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self
    }

    /// Effective seat range, the configured bounds intersected with
    /// `MIN_PLAYERS..=MAX_PLAYERS`.
    ///
    /// Deserialized configs are not clamped on load, so the engine reads
    /// the bounds through here.
    #[must_use]
    pub fn seat_range(&self) -> (usize, usize) {
        (
            self.min_players.max(MIN_PLAYERS),
            self.max_players.min(MAX_PLAYERS),
        )
    }

    /// Set the snapshot storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
