//! Game state: roster, active leader, and round history.
//!
//! ## GameState
//!
//! - `players`: `None` during setup, the seated roster afterwards
//! - `active_leader_index`: seat of the player choosing the next game type
//! - `rounds`: recorded rounds in play order
//!
//! Field names serialize in the persisted snapshot layout
//! (`players`, `activeLeaderIndex`, `rounds`, ...).
//!
//! ## Round
//!
//! One played hand. Exactly one of `counts_by_player_id` and
//! `single_target_player_id` is set, matching the kind of its game type.
//! Only the most recent round may change after it is recorded.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::player::{Player, PlayerId, Roster};

/// Units reported per player for a count-kind round.
pub type Counts = FxHashMap<PlayerId, u32>;

/// Point deltas per player.
pub type Scores = FxHashMap<PlayerId, i64>;

/// Lifecycle phase, derived from the state and the catalog size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No players seated.
    Setup,
    /// Players seated, rounds remain.
    InProgress,
    /// Every player has led every game type.
    Finished,
}

/// Reported outcome of a round, or a patch to the last round's outcome.
///
/// Count kinds read `counts_by_player_id`, single kinds read
/// `single_target_player_id`; the other field is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(default)]
    pub counts_by_player_id: Option<Counts>,
    #[serde(default)]
    pub single_target_player_id: Option<PlayerId>,
}

impl Distribution {
    /// Outcome for a count-kind type.
    ///
    /// ```
    /// use king_score::core::{Distribution, PlayerId};
    ///
    /// let d = Distribution::counts([("p1", 1), ("p2", 3)]);
    /// assert_eq!(d.units_for(&PlayerId::new("p2")), 3);
    /// assert_eq!(d.units_for(&PlayerId::new("p3")), 0);
    /// ```
    pub fn counts<P: Into<PlayerId>>(counts: impl IntoIterator<Item = (P, u32)>) -> Self {
        Self {
            counts_by_player_id: Some(counts.into_iter().map(|(p, n)| (p.into(), n)).collect()),
            single_target_player_id: None,
        }
    }

    /// Outcome for a single-kind type.
    pub fn target(player: impl Into<PlayerId>) -> Self {
        Self {
            counts_by_player_id: None,
            single_target_player_id: Some(player.into()),
        }
    }

    /// Units reported for a player, 0 if absent.
    #[must_use]
    pub fn units_for(&self, player: &PlayerId) -> u32 {
        self.counts_by_player_id
            .as_ref()
            .and_then(|counts| counts.get(player).copied())
            .unwrap_or(0)
    }

    /// Sum of units reported for the seated players.
    ///
    /// Entries for IDs outside the roster are not counted.
    #[must_use]
    pub fn units_sum(&self, roster: &Roster) -> u64 {
        roster.ids().map(|id| u64::from(self.units_for(id))).sum()
    }
}

/// One recorded round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub leader_player_id: PlayerId,
    pub game_type_code: String,
    #[serde(default)]
    pub counts_by_player_id: Option<Counts>,
    #[serde(default)]
    pub single_target_player_id: Option<PlayerId>,
    pub scores: Scores,
}

impl Round {
    /// The round's outcome as a distribution.
    #[must_use]
    pub fn distribution(&self) -> Distribution {
        Distribution {
            counts_by_player_id: self.counts_by_player_id.clone(),
            single_target_player_id: self.single_target_player_id.clone(),
        }
    }

    /// Score for a player, 0 if missing.
    #[must_use]
    pub fn score_for(&self, player: &PlayerId) -> i64 {
        self.scores.get(player).copied().unwrap_or(0)
    }
}

/// Complete game state.
///
/// Uses an `im::Vector` for rounds so read views clone in O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Option<Roster>,
    #[serde(default, alias = "activePlayerIndex", deserialize_with = "null_as_zero")]
    pub active_leader_index: usize,
    pub rounds: Vector<Round>,
}

/// A stored leader index of `null` means seat 0.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(Option::<usize>::deserialize(deserializer)?.unwrap_or(0))
}

impl GameState {
    /// Create an empty state in the setup phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with seated players and no rounds.
    #[must_use]
    pub fn with_players(players: Roster) -> Self {
        Self {
            players: Some(players),
            active_leader_index: 0,
            rounds: Vector::new(),
        }
    }

    /// Check if players are seated.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.players.is_some()
    }

    /// Number of seated players (0 during setup).
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.as_ref().map_or(0, Roster::len)
    }

    /// Rounds needed to finish: every player leads every type once.
    #[must_use]
    pub fn target_rounds(&self, type_count: usize) -> usize {
        self.player_count() * type_count
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self, type_count: usize) -> Phase {
        if !self.is_started() {
            Phase::Setup
        } else if self.rounds.len() >= self.target_rounds(type_count) {
            Phase::Finished
        } else {
            Phase::InProgress
        }
    }

    /// Player whose turn it is to lead.
    #[must_use]
    pub fn active_leader(&self) -> Option<&Player> {
        self.players.as_ref()?.get(self.active_leader_index)
    }

    /// Most recent round.
    #[must_use]
    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Codes already led by a player, in play order.
    pub fn codes_led_by<'a>(&'a self, leader: &'a PlayerId) -> impl Iterator<Item = &'a str> + 'a {
        self.rounds
            .iter()
            .filter(move |r| &r.leader_player_id == leader)
            .map(|r| r.game_type_code.as_str())
    }

    /// Check if a player has already led a game type.
    #[must_use]
    pub fn has_led(&self, leader: &PlayerId, code: &str) -> bool {
        self.codes_led_by(leader).any(|c| c == code)
    }
}
