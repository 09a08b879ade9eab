//! Type selection for the active leader's round.
//!
//! `TypeSelection` is the draft a leader builds before ending a round: the
//! chosen game type and the outcome being entered. It replaces broadcast
//! "preselect" signalling with a direct call, `preselect`, which applies the
//! hinted code only when the engine says the active leader may still lead it.

use super::engine::RoundEngine;
use crate::catalog::GameType;
use crate::core::{Counts, Distribution, EngineError, PlayerId, Result, Round, ValidationOutcome};

/// Draft of the round being entered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSelection {
    selected: Option<&'static GameType>,
    counts: Counts,
    target: Option<PlayerId>,
}

impl TypeSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected game type.
    #[must_use]
    pub fn selected(&self) -> Option<&'static GameType> {
        self.selected
    }

    /// Apply a preselect hint from the availability matrix.
    ///
    /// Returns whether the hint was applied. Hints for types the active
    /// leader has already led, or for unknown codes, are ignored.
    pub fn preselect(&mut self, engine: &RoundEngine, code: &str) -> bool {
        let Some(leader) = engine.active_leader() else {
            return false;
        };
        if engine.is_finished() || !engine.is_available(&leader.id, code) {
            tracing::debug!(code, "ignoring preselect hint");
            return false;
        }
        self.select(engine, code).is_ok()
    }

    /// Choose a game type for the active leader.
    ///
    /// Changing the type keeps the entered outcome; only the fields matching
    /// the type's kind are submitted.
    pub fn select(&mut self, engine: &RoundEngine, code: &str) -> Result<()> {
        let leader = engine.active_leader().ok_or(EngineError::NotStarted)?;
        let game_type = engine
            .catalog()
            .find_by_code(code)
            .ok_or_else(|| EngineError::UnknownType(code.to_string()))?;
        if !engine.is_available(&leader.id, code) {
            return Err(EngineError::TypeUnavailable {
                leader: leader.id.clone(),
                code: code.to_string(),
            });
        }
        self.selected = Some(game_type);
        Ok(())
    }

    /// Enter units taken by a player. Negative input clamps to zero.
    pub fn set_count(&mut self, player: impl Into<PlayerId>, units: i64) {
        let units = u32::try_from(units.max(0)).unwrap_or(u32::MAX);
        self.counts.insert(player.into(), units);
    }

    /// Choose the player who took a single-kind penalty.
    pub fn set_target(&mut self, player: impl Into<PlayerId>) {
        self.target = Some(player.into());
    }

    /// Sum of entered units across the seated players.
    #[must_use]
    pub fn units_entered(&self, engine: &RoundEngine) -> u64 {
        engine
            .players()
            .map_or(0, |players| self.distribution().units_sum(players))
    }

    /// Outcome to submit, holding only the field the selected kind reads.
    #[must_use]
    pub fn distribution(&self) -> Distribution {
        match self.selected {
            Some(t) if t.is_single() => Distribution {
                counts_by_player_id: None,
                single_target_player_id: self.target.clone(),
            },
            _ => Distribution {
                counts_by_player_id: Some(self.counts.clone()),
                single_target_player_id: None,
            },
        }
    }

    #[must_use]
    pub fn validation(&self, engine: &RoundEngine) -> ValidationOutcome {
        engine.validate(self.selected, &self.distribution())
    }

    /// Message explaining why the round cannot end yet, empty if it can.
    #[must_use]
    pub fn validation_message(&self, engine: &RoundEngine) -> String {
        self.validation(engine).message(self.selected)
    }

    /// Record the round through the engine and clear the draft.
    ///
    /// On error the draft is kept so the user can correct it.
    pub fn submit<'e>(&mut self, engine: &'e mut RoundEngine) -> Result<&'e Round> {
        let game_type = self.selected.ok_or(EngineError::NeedsType)?;
        let leader = engine
            .active_leader()
            .map(|p| p.id.clone())
            .ok_or(EngineError::NotStarted)?;

        let round = engine.record_round(&leader, game_type.code, self.distribution())?;
        *self = Self::default();
        Ok(round)
    }

    /// Discard the draft.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> RoundEngine {
        let mut engine = RoundEngine::default();
        engine.start_with_names(["A", "B", "C"]).unwrap();
        engine
    }

    #[test]
    fn test_preselect_applies_available_type() {
        let engine = started();
        let mut selection = TypeSelection::new();

        assert!(selection.preselect(&engine, "H"));
        assert_eq!(selection.selected().map(|t| t.code), Some("H"));
    }

    #[test]
    fn test_preselect_ignores_used_and_unknown() {
        let mut engine = started();
        let mut selection = TypeSelection::new();

        assert!(!selection.preselect(&engine, "NOPE"));

        // p1 leads K, then p2 and p3 take turns so p1 leads again.
        engine
            .record_round(&PlayerId::new("p1"), "K", Distribution::target("p2"))
            .unwrap();
        engine
            .record_round(&PlayerId::new("p2"), "K", Distribution::target("p3"))
            .unwrap();
        engine
            .record_round(&PlayerId::new("p3"), "K", Distribution::target("p1"))
            .unwrap();

        assert!(!selection.preselect(&engine, "K"));
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_preselect_before_start() {
        let engine = RoundEngine::default();
        let mut selection = TypeSelection::new();
        assert!(!selection.preselect(&engine, "K"));
    }

    #[test]
    fn test_validation_messages_follow_draft() {
        let engine = started();
        let mut selection = TypeSelection::new();
        assert_eq!(selection.validation_message(&engine), "Choose a game type");

        selection.select(&engine, "Q").unwrap();
        selection.set_count("p1", 3);
        assert_eq!(selection.units_entered(&engine), 3);
        assert_eq!(
            selection.validation_message(&engine),
            "Distribute exactly 4 Queens across players"
        );

        selection.set_count("p2", 1);
        assert_eq!(selection.validation_message(&engine), "");

        selection.select(&engine, "K").unwrap();
        assert_eq!(selection.validation_message(&engine), "Select the player who took it");
        selection.set_target("p3");
        assert!(selection.validation(&engine).is_ok());
    }

    #[test]
    fn test_set_count_clamps_negative() {
        let engine = started();
        let mut selection = TypeSelection::new();
        selection.select(&engine, "L2").unwrap();
        selection.set_count("p1", -3);
        selection.set_count("p2", 2);

        assert_eq!(selection.distribution().units_for(&PlayerId::new("p1")), 0);
        assert!(selection.validation(&engine).is_ok());
    }

    #[test]
    fn test_submit_records_and_clears() {
        let mut engine = started();
        let mut selection = TypeSelection::new();
        selection.select(&engine, "K").unwrap();
        selection.set_target("p2");

        let round = selection.submit(&mut engine).unwrap();
        assert_eq!(round.scores[&PlayerId::new("p2")], -40);
        assert_eq!(selection, TypeSelection::new());
        assert_eq!(engine.state().active_leader_index, 1);
    }

    #[test]
    fn test_submit_invalid_keeps_draft() {
        let mut engine = started();
        let mut selection = TypeSelection::new();
        assert_eq!(selection.submit(&mut engine).unwrap_err(), EngineError::NeedsType);

        selection.select(&engine, "J").unwrap();
        selection.set_count("p1", 1);
        assert!(matches!(
            selection.submit(&mut engine),
            Err(EngineError::InvalidDistribution { expected: 4, actual: 1, .. })
        ));
        assert_eq!(selection.selected().map(|t| t.code), Some("J"));
        assert!(engine.state().rounds.is_empty());
    }
}
