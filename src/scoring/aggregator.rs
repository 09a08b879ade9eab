//! Totals, standings and winner, derived from round history.
//!
//! Nothing here is stored; every value is recomputed from a `GameState`.
//! Ties on the top total go to the player in the earliest seat.

use crate::core::{GameState, Player, PlayerId, Scores};

/// A player's running total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing<'a> {
    pub player: &'a Player,
    pub total: i64,
}

/// One row of the score sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based round number.
    pub number: usize,
    pub game_type_code: String,
    /// Scores in seat order.
    pub scores: Vec<i64>,
}

/// Score sheet: one row per round plus totals, in seat order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSheet {
    pub rows: Vec<SheetRow>,
    pub totals: Vec<i64>,
}

/// Pure aggregation over a game state.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Total score per seated player.
    ///
    /// A round missing a player's score counts as 0 for that player.
    #[must_use]
    pub fn totals(state: &GameState) -> Scores {
        let Some(players) = &state.players else {
            return Scores::default();
        };
        players
            .ids()
            .map(|id| (id.clone(), Self::total_for(state, id)))
            .collect()
    }

    /// Total for one player.
    #[must_use]
    pub fn total_for(state: &GameState, player: &PlayerId) -> i64 {
        state.rounds.iter().map(|r| r.score_for(player)).sum()
    }

    /// Players ordered by total, highest first; ties keep seat order.
    #[must_use]
    pub fn standings(state: &GameState) -> Vec<Standing<'_>> {
        let Some(players) = &state.players else {
            return Vec::new();
        };
        let mut standings: Vec<_> = players
            .iter()
            .map(|player| Standing {
                player,
                total: Self::total_for(state, &player.id),
            })
            .collect();
        // Stable sort: equal totals stay in seat order.
        standings.sort_by(|a, b| b.total.cmp(&a.total));
        standings
    }

    /// Player with the highest total, earliest seat on ties.
    ///
    /// `None` before the game starts.
    #[must_use]
    pub fn winner(state: &GameState) -> Option<Standing<'_>> {
        Self::standings(state).into_iter().next()
    }

    /// Per-round rows and totals in seat order.
    #[must_use]
    pub fn score_sheet(state: &GameState) -> ScoreSheet {
        let Some(players) = &state.players else {
            return ScoreSheet {
                rows: Vec::new(),
                totals: Vec::new(),
            };
        };
        let rows = state
            .rounds
            .iter()
            .enumerate()
            .map(|(i, round)| SheetRow {
                number: i + 1,
                game_type_code: round.game_type_code.clone(),
                scores: players.ids().map(|id| round.score_for(id)).collect(),
            })
            .collect();
        let totals = players.ids().map(|id| Self::total_for(state, id)).collect();
        ScoreSheet { rows, totals }
    }
}
