//! Snapshot persistence.
//!
//! - `codec`: JSON encode/decode of `GameState` with a shape check
//! - `store`: the key-value `SnapshotStore` trait, in-memory and file stores
//! - `session`: `ScoreKeeper`, which hydrates an engine at startup and saves
//!   after every mutation
//!
//! Persistence is best effort. A missing, unreadable or corrupted snapshot
//! starts a fresh game; a failed save is logged and play continues in memory.

pub mod codec;
pub mod store;
pub mod session;

use thiserror::Error;

pub use session::ScoreKeeper;
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

/// Errors surfaced by snapshot stores and the codec.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted snapshot: {0}")]
    Corrupted(String),
}
