//! Game type definitions - static rule data.
//!
//! A `GameType` is one of the contracts a leader can choose for a round,
//! such as "No Queens" or "Pluses". The rule is a tagged variant:
//! - `Count`: a fixed number of units is split among the players, each
//!   unit worth a fixed number of points to whoever took it.
//! - `Single`: one designated player takes a fixed penalty or bonus.

/// How a game type turns a reported outcome into points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameKind {
    /// Distribute exactly `total_units` among players.
    Count {
        total_units: u32,
        points_per_unit: i64,
        /// Display name for the units ("Queens", "Tricks", ...).
        unit_label: &'static str,
    },
    /// One player receives `points`, everyone else zero.
    Single { points: i64 },
}

/// Static game type definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameType {
    /// Unique code, also the value persisted in each round.
    pub code: &'static str,

    /// Human-readable name.
    pub label: &'static str,

    pub kind: GameKind,
}

impl GameType {
    /// Define a count-kind type.
    #[must_use]
    pub const fn count(
        code: &'static str,
        label: &'static str,
        total_units: u32,
        points_per_unit: i64,
        unit_label: &'static str,
    ) -> Self {
        Self {
            code,
            label,
            kind: GameKind::Count {
                total_units,
                points_per_unit,
                unit_label,
            },
        }
    }

    /// Define a single-kind type.
    #[must_use]
    pub const fn single(code: &'static str, label: &'static str, points: i64) -> Self {
        Self {
            code,
            label,
            kind: GameKind::Single { points },
        }
    }

    /// Units that must be accounted for in one round. Single kinds count as one.
    #[must_use]
    pub const fn total_units(&self) -> u32 {
        match self.kind {
            GameKind::Count { total_units, .. } => total_units,
            GameKind::Single { .. } => 1,
        }
    }

    #[must_use]
    pub const fn is_count(&self) -> bool {
        matches!(self.kind, GameKind::Count { .. })
    }

    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self.kind, GameKind::Single { .. })
    }

    /// Unit name used in validation messages.
    #[must_use]
    pub const fn unit_label(&self) -> &'static str {
        match self.kind {
            GameKind::Count { unit_label, .. } => unit_label,
            GameKind::Single { .. } => "units",
        }
    }

    /// Points at stake over the whole round.
    ///
    /// ```
    /// use king_score::catalog::GameType;
    ///
    /// let queens = GameType::count("Q", "No Queens", 4, -10, "Queens");
    /// assert_eq!(queens.round_value(), -40);
    /// ```
    #[must_use]
    pub const fn round_value(&self) -> i64 {
        match self.kind {
            GameKind::Count {
                total_units,
                points_per_unit,
                ..
            } => total_units as i64 * points_per_unit,
            GameKind::Single { points } => points,
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_accessors() {
        let hearts = GameType::count("H", "No Hearts", 8, -5, "Hearts");

        assert!(hearts.is_count());
        assert!(!hearts.is_single());
        assert_eq!(hearts.total_units(), 8);
        assert_eq!(hearts.unit_label(), "Hearts");
        assert_eq!(hearts.round_value(), -40);
    }

    #[test]
    fn test_single_accessors() {
        let king = GameType::single("K", "No King of hearts", -40);

        assert!(king.is_single());
        assert_eq!(king.total_units(), 1);
        assert_eq!(king.unit_label(), "units");
        assert_eq!(king.round_value(), -40);
        assert_eq!(format!("{}", king), "No King of hearts");
    }
}
