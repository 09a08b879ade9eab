//! Player identification and the seated roster.
//!
//! ## PlayerId
//!
//! Stable string identifier, unique for the lifetime of a game.
//! Rosters built from names assign `p1`, `p2`, ... by seat order.
//!
//! ## Roster
//!
//! Ordered list of seated players. Seat order is the leader rotation order
//! and the tie-break order for the winner. Backed by a `SmallVec` since a
//! game never seats more than four players.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Index;

/// Stable player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a player ID from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// ID assigned to the player in the given 0-based seat.
    ///
    /// ```
    /// use king_score::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::from_seat(0).as_str(), "p1");
    /// assert_eq!(PlayerId::from_seat(3).as_str(), "p4");
    /// ```
    #[must_use]
    pub fn from_seat(seat: usize) -> Self {
        Self(format!("p{}", seat + 1))
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A seated player. Never mutated during a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Ordered roster of seated players.
///
/// ## Example
///
/// ```
/// use king_score::core::Roster;
///
/// let roster = Roster::from_names(["  Ann ", "Bob", "Cid"]);
/// assert_eq!(roster.len(), 3);
/// assert_eq!(roster[0].name, "Ann");
/// assert_eq!(roster[2].id.as_str(), "p3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: SmallVec<[Player; 4]>,
}

impl Roster {
    /// Create a roster from already-identified players.
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players.into_iter().collect(),
        }
    }

    /// Seat players by name, trimming whitespace and assigning seat IDs.
    pub fn from_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            names
                .into_iter()
                .enumerate()
                .map(|(seat, name)| Player::new(PlayerId::from_seat(seat), name.as_ref().trim())),
        )
    }

    /// Number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Player in the given seat.
    #[must_use]
    pub fn get(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    /// Look up a player by ID.
    #[must_use]
    pub fn find(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.seat_of(id).is_some()
    }

    /// Iterate players in seat order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Iterate player IDs in seat order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.id)
    }

    /// Check that the roster can seat a game.
    ///
    /// Returns a human-readable reason on failure.
    pub fn check(&self, min_players: usize, max_players: usize) -> Result<(), String> {
        if !(min_players..=max_players).contains(&self.len()) {
            return Err(format!(
                "expected {}-{} players, got {}",
                min_players,
                max_players,
                self.len()
            ));
        }
        for (seat, player) in self.players.iter().enumerate() {
            if player.name.trim().is_empty() {
                return Err(format!("player {} has an empty name", seat + 1));
            }
            if self.players[..seat].iter().any(|p| p.id == player.id) {
                return Err(format!("duplicate player id {}", player.id));
            }
        }
        Ok(())
    }
}

impl Index<usize> for Roster {
    type Output = Player;

    fn index(&self, seat: usize) -> &Self::Output {
        &self.players[seat]
    }
}

impl FromIterator<Player> for Roster {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self::new(iter)
    }
}
