//! Snapshot encoding.
//!
//! A snapshot is the JSON form of `GameState`:
//!
//! ```json
//! { "players": [{"id": "p1", "name": "Ann"}, ...] | null,
//!   "activeLeaderIndex": 0,
//!   "rounds": [{"leaderPlayerId": "p1", "gameTypeCode": "K", ...}] }
//! ```
//!
//! Decoding checks the document shape before deserializing: `rounds` must
//! be a list and `players` must be a list or null. Anything else is
//! reported as corrupted.

use serde_json::Value;

use super::SnapshotError;
use crate::core::GameState;

/// Encode a state as a snapshot document.
pub fn encode(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode and shape-check a snapshot document.
pub fn decode(body: &str) -> Result<GameState, SnapshotError> {
    let value: Value = serde_json::from_str(body)?;
    check_shape(&value)?;
    serde_json::from_value(value).map_err(|e| SnapshotError::Corrupted(e.to_string()))
}

fn check_shape(value: &Value) -> Result<(), SnapshotError> {
    let Some(doc) = value.as_object() else {
        return Err(SnapshotError::Corrupted("snapshot is not an object".to_string()));
    };
    if !doc.get("rounds").is_some_and(Value::is_array) {
        return Err(SnapshotError::Corrupted("rounds is not a list".to_string()));
    }
    match doc.get("players") {
        Some(Value::Null) | Some(Value::Array(_)) => Ok(()),
        _ => Err(SnapshotError::Corrupted(
            "players is neither a list nor null".to_string(),
        )),
    }
}
