//! Engine errors and round validation outcomes.
//!
//! Every error here is recoverable: the rejected intent leaves state
//! untouched, and the `Display` text is the message shown to the user.

use thiserror::Error;

use super::player::PlayerId;
use crate::catalog::GameType;

/// Reasons an engine intent is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("game has not started")]
    NotStarted,
    #[error("invalid players: {0}")]
    InvalidPlayers(String),
    #[error("game is finished")]
    GameFinished,
    #[error("it is {expected}'s turn to lead, not {actual}'s")]
    NotLeader { expected: PlayerId, actual: PlayerId },
    #[error("unknown game type {0}")]
    UnknownType(String),
    #[error("{leader} has already led {code}")]
    TypeUnavailable { leader: PlayerId, code: String },
    #[error("Choose a game type")]
    NeedsType,
    #[error("Distribute exactly {expected} {unit_label} across players (got {actual})")]
    InvalidDistribution {
        expected: u32,
        actual: u64,
        unit_label: &'static str,
    },
    #[error("Select the player who took it")]
    NoTarget,
    #[error("no rounds recorded yet")]
    NoRounds,
    #[error("only the last round can be edited (asked for {index}, last is {last})")]
    NotLastRound { index: usize, last: usize },
    #[error("corrupted snapshot: {0}")]
    CorruptedSnapshot(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Outcome of checking a reported distribution against a game type.
///
/// Only `Ok` permits recording a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    /// No game type chosen.
    NeedsType,
    /// Count kind whose reported units do not sum to the type's total.
    DistributionMismatch { expected: u32, actual: u64 },
    /// Single kind with no seated target chosen.
    NeedsTarget,
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == ValidationOutcome::Ok
    }

    /// Convert into an engine result.
    ///
    /// `game_type` supplies the unit label for mismatch messages.
    pub fn into_result(self, game_type: Option<&GameType>) -> Result<()> {
        match self {
            ValidationOutcome::Ok => Ok(()),
            ValidationOutcome::NeedsType => Err(EngineError::NeedsType),
            ValidationOutcome::DistributionMismatch { expected, actual } => {
                Err(EngineError::InvalidDistribution {
                    expected,
                    actual,
                    unit_label: game_type.map_or("units", GameType::unit_label),
                })
            }
            ValidationOutcome::NeedsTarget => Err(EngineError::NoTarget),
        }
    }

    /// User-facing message, empty when the outcome is `Ok`.
    #[must_use]
    pub fn message(self, game_type: Option<&GameType>) -> String {
        match self.into_result(game_type) {
            Ok(()) => String::new(),
            Err(EngineError::InvalidDistribution {
                expected,
                unit_label,
                ..
            }) => format!("Distribute exactly {} {} across players", expected, unit_label),
            Err(err) => err.to_string(),
        }
    }
}
