//! Game type catalog and round scoring.
//!
//! The `GameTypeCatalog` holds the fixed set of contracts in catalog order
//! and converts a reported outcome into per-player points.

use super::game_type::{GameKind, GameType};
use crate::core::{Distribution, Roster, Scores};

/// The nine contracts of King, in catalog order.
///
/// Penalties over one cycle total -240 and the three pluses total +240.
pub const STANDARD_TYPES: [GameType; 9] = [
    GameType::single("K", "K - No King of hearts", -40),
    GameType::count("Q", "Q - No Queens", 4, -10, "Queens"),
    GameType::count("J", "J - No Jacks", 4, -10, "Jacks"),
    GameType::count("H", "<3 - No Hearts", 8, -5, "Hearts"),
    GameType::count("L2", "L2 - No Last 2", 2, -20, "Last 2"),
    GameType::count("T", "- - No Tricks", 10, -4, "Tricks"),
    GameType::count("P1", "+ - Pluses (1)", 10, 8, "Tricks"),
    GameType::count("P2", "+ - Pluses (2)", 10, 8, "Tricks"),
    GameType::count("P3", "+ - Pluses (3)", 10, 8, "Tricks"),
];

/// Immutable catalog of game types.
///
/// ## Example
///
/// ```
/// use king_score::catalog::GameTypeCatalog;
///
/// let catalog = GameTypeCatalog::standard();
/// assert_eq!(catalog.len(), 9);
///
/// let queens = catalog.find_by_code("Q").unwrap();
/// assert_eq!(queens.total_units(), 4);
/// assert!(catalog.find_by_code("X").is_none());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GameTypeCatalog {
    types: &'static [GameType],
}

impl Default for GameTypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameTypeCatalog {
    /// The standard King catalog.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            types: &STANDARD_TYPES,
        }
    }

    /// All game types in catalog order.
    #[must_use]
    pub fn list_all(&self) -> &'static [GameType] {
        self.types
    }

    /// Find a game type by code.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&'static GameType> {
        self.types.iter().find(|t| t.code == code)
    }

    /// Check if a code is in the catalog.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.find_by_code(code).is_some()
    }

    /// Number of game types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all game types.
    pub fn iter(&self) -> impl Iterator<Item = &'static GameType> {
        self.types.iter()
    }

    /// Convert a reported outcome into points for every seated player.
    ///
    /// - No type: empty map.
    /// - Count kind: units reported for the player times points per unit,
    ///   with unreported players taking 0 units.
    /// - Single kind: the target receives the type's points, others 0.
    ///
    /// Pure; nothing is validated here.
    #[must_use]
    pub fn compute_scores(
        game_type: Option<&GameType>,
        players: &Roster,
        distribution: &Distribution,
    ) -> Scores {
        let Some(game_type) = game_type else {
            return Scores::default();
        };

        match game_type.kind {
            GameKind::Count {
                points_per_unit, ..
            } => players
                .ids()
                .map(|id| (id.clone(), i64::from(distribution.units_for(id)) * points_per_unit))
                .collect(),
            GameKind::Single { points } => {
                let target = distribution.single_target_player_id.as_ref();
                players
                    .ids()
                    .map(|id| (id.clone(), if Some(id) == target { points } else { 0 }))
                    .collect()
            }
        }
    }
}
