//! Persistent scoring session.
//!
//! `ScoreKeeper` wraps a `RoundEngine` and a `SnapshotStore`:
//! 1. `open` loads, decodes and validates the stored snapshot, falling back
//!    to a fresh engine on any failure
//! 2. every successful mutation saves the new state
//! 3. `reset` clears the stored entry
//!
//! Store failures never reach the caller.

use super::codec;
use super::store::SnapshotStore;
use super::SnapshotError;
use crate::catalog::GameType;
use crate::core::{
    Distribution, EngineConfig, GameState, Phase, PlayerId, Result, Roster, Round, Scores,
};
use crate::rules::{RoundEngine, TypeSelection};
use crate::scoring::{ScoreAggregator, ScoreSheet, Standing};

/// Engine plus best-effort persistence.
pub struct ScoreKeeper<S: SnapshotStore> {
    engine: RoundEngine,
    store: S,
}

impl<S: SnapshotStore> ScoreKeeper<S> {
    /// Open a session, hydrating from the store when possible.
    pub fn open(store: S, config: EngineConfig) -> Self {
        let engine = match Self::load(&store, &config) {
            Ok(Some(engine)) => {
                tracing::info!(
                    rounds = engine.state().rounds.len(),
                    "restored game from snapshot"
                );
                engine
            }
            Ok(None) => RoundEngine::new(config),
            Err(e) => {
                tracing::warn!("discarding stored snapshot: {}", e);
                RoundEngine::new(config)
            }
        };
        Self { engine, store }
    }

    fn load(store: &S, config: &EngineConfig) -> std::result::Result<Option<RoundEngine>, SnapshotError> {
        let Some(body) = store.get(&config.storage_key)? else {
            return Ok(None);
        };
        let state = codec::decode(&body)?;
        RoundEngine::from_state(config.clone(), state)
            .map(Some)
            .map_err(|e| SnapshotError::Corrupted(e.to_string()))
    }

    fn persist(&self) {
        let key = &self.engine.config().storage_key;
        let saved = codec::encode(self.engine.state()).and_then(|body| self.store.set(key, &body));
        if let Err(e) = saved {
            tracing::warn!("failed to save snapshot: {}", e);
        }
    }

    // === Read accessors ===

    #[must_use]
    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn current_state(&self) -> GameState {
        self.engine.current_state()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    #[must_use]
    pub fn available_types_for(&self, leader: &PlayerId) -> Vec<&'static GameType> {
        self.engine.available_types_for(leader)
    }

    #[must_use]
    pub fn is_available(&self, leader: &PlayerId, code: &str) -> bool {
        self.engine.is_available(leader, code)
    }

    #[must_use]
    pub fn totals(&self) -> Scores {
        ScoreAggregator::totals(self.engine.state())
    }

    #[must_use]
    pub fn winner(&self) -> Option<Standing<'_>> {
        ScoreAggregator::winner(self.engine.state())
    }

    #[must_use]
    pub fn score_sheet(&self) -> ScoreSheet {
        ScoreAggregator::score_sheet(self.engine.state())
    }

    // === Intents ===

    pub fn start(&mut self, players: Roster) -> Result<()> {
        self.engine.start(players)?;
        self.persist();
        Ok(())
    }

    pub fn start_with_names<N: AsRef<str>>(&mut self, names: impl IntoIterator<Item = N>) -> Result<()> {
        self.start(Roster::from_names(names))
    }

    pub fn record_round(&mut self, leader: &PlayerId, code: &str, distribution: Distribution) -> Result<Round> {
        let round = self.engine.record_round(leader, code, distribution)?.clone();
        self.persist();
        Ok(round)
    }

    /// Record the round drafted in `selection`, clearing it on success.
    pub fn submit(&mut self, selection: &mut TypeSelection) -> Result<Round> {
        let round = selection.submit(&mut self.engine)?.clone();
        self.persist();
        Ok(round)
    }

    pub fn edit_last_round(&mut self, patch: &Distribution) -> Result<Round> {
        let round = self.engine.edit_last_round(patch)?.clone();
        self.persist();
        Ok(round)
    }

    /// Edit the last round only if the patched outcome is valid.
    pub fn edit_last_round_checked(&mut self, patch: &Distribution) -> Result<Round> {
        let outcome = self.engine.validate_edit(patch)?;
        let game_type = self
            .engine
            .state()
            .last_round()
            .and_then(|last| self.engine.catalog().find_by_code(&last.game_type_code));
        outcome.into_result(game_type)?;
        self.edit_last_round(patch)
    }

    pub fn edit_round(&mut self, index: usize, patch: &Distribution) -> Result<Round> {
        let round = self.engine.edit_round(index, patch)?.clone();
        self.persist();
        Ok(round)
    }

    /// Return to setup and clear the stored snapshot.
    ///
    /// If the entry cannot be removed, the empty setup state is saved over
    /// it so the old game is not restored on the next `open`.
    pub fn reset(&mut self) {
        self.engine.reset();
        if let Err(e) = self.store.remove(&self.engine.config().storage_key) {
            tracing::warn!("failed to clear snapshot, saving setup state instead: {}", e);
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineError;
    use crate::snapshot::MemorySnapshotStore;

    fn key() -> String {
        EngineConfig::default().storage_key
    }

    #[test]
    fn test_open_empty_store() {
        let keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        assert_eq!(keeper.phase(), Phase::Setup);
    }

    #[test]
    fn test_mutations_are_saved() {
        let mut keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        keeper.start_with_names(["A", "B", "C"]).unwrap();
        keeper
            .record_round(&PlayerId::new("p1"), "K", Distribution::target("p2"))
            .unwrap();

        let body = keeper.store().get(&key()).unwrap().unwrap();
        assert_eq!(codec::decode(&body).unwrap(), keeper.current_state());
    }

    #[test]
    fn test_rejected_intent_does_not_save() {
        let mut keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        assert!(keeper.start_with_names(["A"]).is_err());
        assert_eq!(keeper.store().get(&key()).unwrap(), None);
    }

    #[test]
    fn test_checked_edit_rejects_invalid_patch() {
        let mut keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        keeper.start_with_names(["A", "B", "C"]).unwrap();
        keeper
            .record_round(&PlayerId::new("p1"), "J", Distribution::counts([("p1", 4)]))
            .unwrap();
        let before = keeper.current_state();

        let err = keeper
            .edit_last_round_checked(&Distribution::counts([("p1", 5)]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDistribution { expected: 4, actual: 5, .. }));
        assert_eq!(keeper.current_state(), before);

        let round = keeper
            .edit_last_round_checked(&Distribution::counts([("p2", 4)]))
            .unwrap();
        assert_eq!(round.scores[&PlayerId::new("p2")], -40);
    }

    #[test]
    fn test_checked_edit_without_rounds() {
        let mut keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        keeper.start_with_names(["A", "B", "C"]).unwrap();

        assert_eq!(
            keeper.edit_last_round_checked(&Distribution::target("p1")).unwrap_err(),
            EngineError::NoRounds
        );
    }

    #[test]
    fn test_reset_clears_store() {
        let mut keeper = ScoreKeeper::open(MemorySnapshotStore::new(), EngineConfig::default());
        keeper.start_with_names(["A", "B", "C"]).unwrap();
        assert!(keeper.store().get(&key()).unwrap().is_some());

        keeper.reset();
        assert_eq!(keeper.phase(), Phase::Setup);
        assert_eq!(keeper.store().get(&key()).unwrap(), None);
    }
}
