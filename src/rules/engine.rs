//! Round engine: the game state machine.
//!
//! `Setup` -> `InProgress` -> `Finished`, where the game finishes once every
//! seated player has led every catalog type exactly once.
//!
//! The engine exclusively owns the `GameState`. Callers send intents
//! (`start`, `record_round`, `edit_last_round`, `reset`) and read through
//! `state()` or the cheap `current_state()` clone.
//!
//! ## Setup-phase policy
//!
//! While no players are seated, every mutating intent except `start` and
//! `reset` returns `EngineError::NotStarted` and leaves state untouched.
//! Queries return empty or absent values.

use crate::catalog::{GameType, GameTypeCatalog};
use crate::core::{
    Distribution, EngineConfig, EngineError, GameState, Phase, Player, PlayerId, Result, Roster,
    Round, ValidationOutcome,
};

/// One row of the availability matrix: a game type and, per seat, whether
/// that player may still lead it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityRow {
    pub code: &'static str,
    pub available: Vec<bool>,
}

/// The round/scoring state machine.
#[derive(Clone, Debug)]
pub struct RoundEngine {
    config: EngineConfig,
    catalog: GameTypeCatalog,
    state: GameState,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RoundEngine {
    /// Create an engine in the setup phase.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: GameTypeCatalog::standard(),
            state: GameState::new(),
        }
    }

    /// Create an engine from an existing state, checking its invariants.
    ///
    /// Used when hydrating from a snapshot. A state that could not have been
    /// produced by the engine is rejected with `CorruptedSnapshot`.
    pub fn from_state(config: EngineConfig, state: GameState) -> Result<Self> {
        let engine = Self {
            config,
            catalog: GameTypeCatalog::standard(),
            state,
        };
        engine.check_invariants()?;
        Ok(engine)
    }

    fn check_invariants(&self) -> Result<()> {
        let corrupted = |reason: String| -> Result<()> { Err(EngineError::CorruptedSnapshot(reason)) };

        let Some(players) = &self.state.players else {
            if !self.state.rounds.is_empty() {
                return corrupted("rounds recorded without players".to_string());
            }
            return Ok(());
        };

        let (min_players, max_players) = self.config.seat_range();
        players
            .check(min_players, max_players)
            .map_err(EngineError::CorruptedSnapshot)?;

        if self.state.active_leader_index >= players.len() {
            return corrupted(format!(
                "active leader index {} out of range",
                self.state.active_leader_index
            ));
        }
        if self.state.rounds.len() > self.target_rounds() {
            return corrupted(format!(
                "{} rounds recorded, at most {} allowed",
                self.state.rounds.len(),
                self.target_rounds()
            ));
        }

        for (index, round) in self.state.rounds.iter().enumerate() {
            if !players.contains(&round.leader_player_id) {
                return corrupted(format!("round {} led by unknown player", index + 1));
            }
            if !self.catalog.contains(&round.game_type_code) {
                return corrupted(format!(
                    "round {} has unknown game type {}",
                    index + 1,
                    round.game_type_code
                ));
            }
            let repeats = self
                .state
                .rounds
                .iter()
                .take(index)
                .any(|r| {
                    r.leader_player_id == round.leader_player_id
                        && r.game_type_code == round.game_type_code
                });
            if repeats {
                return corrupted(format!("round {} repeats a led game type", index + 1));
            }
            if players.ids().any(|id| !round.scores.contains_key(id)) {
                return corrupted(format!("round {} is missing player scores", index + 1));
            }
        }
        Ok(())
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &GameTypeCatalog {
        &self.catalog
    }

    /// Borrow the current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Read-only snapshot of the current state.
    ///
    /// Rounds are an `im::Vector`, so this clone shares structure.
    #[must_use]
    pub fn current_state(&self) -> GameState {
        self.state.clone()
    }

    /// Consume the engine, returning its state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Seated players, `None` during setup.
    #[must_use]
    pub fn players(&self) -> Option<&Roster> {
        self.state.players.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase(self.catalog.len())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase() == Phase::Finished
    }

    /// Rounds in a full game (0 during setup).
    #[must_use]
    pub fn target_rounds(&self) -> usize {
        self.state.target_rounds(self.catalog.len())
    }

    /// 1-based number of the round about to be played.
    #[must_use]
    pub fn current_round_number(&self) -> usize {
        self.state.rounds.len() + 1
    }

    /// Player whose turn it is to lead.
    #[must_use]
    pub fn active_leader(&self) -> Option<&Player> {
        self.state.active_leader()
    }

    // === Availability ===

    /// Game types the leader has not led yet, in catalog order.
    ///
    /// Availability is per leader: other players' rounds do not matter.
    #[must_use]
    pub fn available_types_for(&self, leader: &PlayerId) -> Vec<&'static GameType> {
        if !self.state.is_started() {
            return Vec::new();
        }
        self.catalog
            .iter()
            .filter(|t| !self.state.has_led(leader, t.code))
            .collect()
    }

    /// Check if a leader may still choose a game type.
    #[must_use]
    pub fn is_available(&self, leader: &PlayerId, code: &str) -> bool {
        self.state.is_started()
            && self.catalog.contains(code)
            && !self.state.has_led(leader, code)
    }

    /// Codes each seated player has led, in seat order.
    #[must_use]
    pub fn used_types_by_player(&self) -> Vec<(PlayerId, Vec<&str>)> {
        let Some(players) = self.players() else {
            return Vec::new();
        };
        players
            .ids()
            .map(|id| (id.clone(), self.state.codes_led_by(id).collect()))
            .collect()
    }

    /// Catalog x seat availability grid.
    #[must_use]
    pub fn availability_matrix(&self) -> Vec<AvailabilityRow> {
        let Some(players) = self.players() else {
            return Vec::new();
        };
        self.catalog
            .iter()
            .map(|t| AvailabilityRow {
                code: t.code,
                available: players.ids().map(|id| !self.state.has_led(id, t.code)).collect(),
            })
            .collect()
    }

    // === Validation ===

    /// Check a reported outcome against a game type.
    ///
    /// Count kinds must report exactly the type's total units across the
    /// seated players. Single kinds need a seated target.
    #[must_use]
    pub fn validate(&self, game_type: Option<&GameType>, distribution: &Distribution) -> ValidationOutcome {
        let Some(game_type) = game_type else {
            return ValidationOutcome::NeedsType;
        };
        let empty = Roster::default();
        let players = self.players().unwrap_or(&empty);

        if game_type.is_count() {
            let actual = distribution.units_sum(players);
            let expected = game_type.total_units();
            if actual != u64::from(expected) {
                return ValidationOutcome::DistributionMismatch { expected, actual };
            }
            ValidationOutcome::Ok
        } else {
            match &distribution.single_target_player_id {
                Some(target) if players.contains(target) => ValidationOutcome::Ok,
                _ => ValidationOutcome::NeedsTarget,
            }
        }
    }

    /// Validate what the last round would look like with a patch applied.
    ///
    /// The engine does not require this before `edit_last_round`; callers
    /// use it to block saving an invalid edit.
    ///
    /// Fails like `edit_last_round` when there is no round to edit.
    pub fn validate_edit(&self, patch: &Distribution) -> Result<ValidationOutcome> {
        if !self.state.is_started() {
            return Err(EngineError::NotStarted);
        }
        let last = self.state.last_round().ok_or(EngineError::NoRounds)?;
        let game_type = self.catalog.find_by_code(&last.game_type_code);
        let mut patched = last.clone();
        apply_patch(&mut patched, game_type, patch);
        Ok(self.validate(game_type, &patched.distribution()))
    }

    // === Intents ===

    /// Seat players and begin a new game.
    ///
    /// Valid from any phase; any game in progress is discarded.
    pub fn start(&mut self, players: Roster) -> Result<()> {
        let (min_players, max_players) = self.config.seat_range();
        players
            .check(min_players, max_players)
            .map_err(EngineError::InvalidPlayers)?;

        tracing::info!(players = players.len(), "starting game");
        self.state = GameState::with_players(players);
        Ok(())
    }

    /// Seat players by name, assigning seat IDs.
    pub fn start_with_names<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) -> Result<()> {
        self.start(Roster::from_names(names))
    }

    /// Record a round led by the active leader.
    ///
    /// On success, scores the round, appends it, and rotates the lead to the
    /// next seat. On any error, state is unchanged.
    pub fn record_round(
        &mut self,
        leader: &PlayerId,
        code: &str,
        distribution: Distribution,
    ) -> Result<&Round> {
        let players = self.players().ok_or(EngineError::NotStarted)?;
        if self.is_finished() {
            return Err(EngineError::GameFinished);
        }

        let active = &players[self.state.active_leader_index];
        if &active.id != leader {
            return Err(EngineError::NotLeader {
                expected: active.id.clone(),
                actual: leader.clone(),
            });
        }

        let game_type = self
            .catalog
            .find_by_code(code)
            .ok_or_else(|| EngineError::UnknownType(code.to_string()))?;
        if self.state.has_led(leader, code) {
            return Err(EngineError::TypeUnavailable {
                leader: leader.clone(),
                code: code.to_string(),
            });
        }
        self.validate(Some(game_type), &distribution)
            .into_result(Some(game_type))?;

        let scores = GameTypeCatalog::compute_scores(Some(game_type), players, &distribution);
        let (counts, target) = if game_type.is_count() {
            (distribution.counts_by_player_id, None)
        } else {
            (None, distribution.single_target_player_id)
        };
        let round = Round {
            leader_player_id: leader.clone(),
            game_type_code: game_type.code.to_string(),
            counts_by_player_id: counts,
            single_target_player_id: target,
            scores,
        };

        let player_count = players.len();
        self.state.rounds.push_back(round);
        self.state.active_leader_index = (self.state.active_leader_index + 1) % player_count;

        tracing::debug!(
            round = self.state.rounds.len(),
            leader = %leader,
            code = game_type.code,
            "recorded round"
        );
        if self.is_finished() {
            tracing::info!(rounds = self.state.rounds.len(), "game finished");
        }

        let last = self.state.rounds.len() - 1;
        Ok(&self.state.rounds[last])
    }

    /// Replace the most recent round's outcome and rescore it.
    ///
    /// Only the field matching the round's kind is taken from the patch.
    /// The patch is not validated: scores are recomputed from whatever is
    /// given (see `validate_edit`). Leader rotation and round count are
    /// unchanged.
    pub fn edit_last_round(&mut self, patch: &Distribution) -> Result<&Round> {
        let players = self.players().ok_or(EngineError::NotStarted)?.clone();
        let catalog = self.catalog;
        let last = self.state.rounds.back_mut().ok_or(EngineError::NoRounds)?;
        let game_type = catalog.find_by_code(&last.game_type_code);

        apply_patch(last, game_type, patch);
        last.scores = GameTypeCatalog::compute_scores(game_type, &players, &last.distribution());

        let index = self.state.rounds.len() - 1;
        tracing::debug!(round = index + 1, "edited last round");
        Ok(&self.state.rounds[index])
    }

    /// Edit the round at `index`, which must be the most recent one.
    pub fn edit_round(&mut self, index: usize, patch: &Distribution) -> Result<&Round> {
        if !self.state.is_started() {
            return Err(EngineError::NotStarted);
        }
        let count = self.state.rounds.len();
        if count == 0 {
            return Err(EngineError::NoRounds);
        }
        if index != count - 1 {
            return Err(EngineError::NotLastRound {
                index,
                last: count - 1,
            });
        }
        self.edit_last_round(patch)
    }

    /// Discard players and rounds, returning to setup.
    pub fn reset(&mut self) {
        tracing::info!(rounds = self.state.rounds.len(), "resetting game");
        self.state = GameState::new();
    }
}

/// Overwrite the distribution field matching the round's kind.
fn apply_patch(round: &mut Round, game_type: Option<&GameType>, patch: &Distribution) {
    match game_type {
        Some(t) if t.is_count() => {
            if let Some(counts) = &patch.counts_by_player_id {
                round.counts_by_player_id = Some(counts.clone());
            }
        }
        Some(_) => {
            if let Some(target) = &patch.single_target_player_id {
                round.single_target_player_id = Some(target.clone());
            }
        }
        None => {}
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

    fn id(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    #[test]
    fn test_setup_phase_rejects_intents() {
        let mut engine = RoundEngine::default();

        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(
            engine.record_round(&id("p1"), "K", Distribution::target("p1")).unwrap_err(),
            EngineError::NotStarted
        );
        assert_eq!(
            engine.edit_last_round(&Distribution::target("p1")).unwrap_err(),
            EngineError::NotStarted
        );
        assert!(engine.available_types_for(&id("p1")).is_empty());
        assert!(!engine.is_available(&id("p1"), "K"));
        assert!(engine.availability_matrix().is_empty());
        assert_eq!(engine.state(), &GameState::new());
    }

    #[test]
    fn test_start_validates_players() {
        let mut engine = RoundEngine::default();

        assert!(matches!(
            engine.start_with_names(["A", "B"]),
            Err(EngineError::InvalidPlayers(_))
        ));
        assert!(matches!(
            engine.start_with_names(["A", " ", "C"]),
            Err(EngineError::InvalidPlayers(_))
        ));
        assert!(!engine.state().is_started());

        engine.start_with_names(["A", "B", "C", "D"]).unwrap();
        assert_eq!(engine.phase(), Phase::InProgress);
        assert_eq!(engine.target_rounds(), 36);
        assert_eq!(engine.active_leader().map(|p| p.name.as_str()), Some("A"));
    }

    #[test]
    fn test_record_rejects_wrong_leader() {
        let mut engine = started();
        let err = engine
            .record_round(&id("p2"), "K", Distribution::target("p1"))
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::NotLeader {
                expected: id("p1"),
                actual: id("p2"),
            }
        );
        assert!(engine.state().rounds.is_empty());
    }

    #[test]
    fn test_record_rejects_unknown_and_used_types() {
        let mut engine = started();

        assert_eq!(
            engine.record_round(&id("p1"), "ZZ", Distribution::target("p1")).unwrap_err(),
            EngineError::UnknownType("ZZ".to_string())
        );

        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();
        engine.record_round(&id("p2"), "K", Distribution::target("p3")).unwrap();
        engine.record_round(&id("p3"), "L2", Distribution::counts([("p1", 2)])).unwrap();

        assert_eq!(
            engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap_err(),
            EngineError::TypeUnavailable {
                leader: id("p1"),
                code: "K".to_string(),
            }
        );
    }

    #[test]
    fn test_single_target_must_be_seated() {
        let engine = started();
        let king = engine.catalog().find_by_code("K");

        assert_eq!(
            engine.validate(king, &Distribution::target("p9")),
            ValidationOutcome::NeedsTarget
        );
        assert_eq!(
            engine.validate(king, &Distribution::default()),
            ValidationOutcome::NeedsTarget
        );
        assert_eq!(engine.validate(None, &Distribution::default()), ValidationOutcome::NeedsType);
    }

    #[test]
    fn test_record_stores_only_matching_field() {
        let mut engine = started();
        let mut mixed = Distribution::counts([("p1", 4)]);
        mixed.single_target_player_id = Some(id("p2"));

        let round = engine.record_round(&id("p1"), "K", mixed.clone()).unwrap().clone();
        assert!(round.counts_by_player_id.is_none());
        assert_eq!(round.single_target_player_id, Some(id("p2")));

        let round = engine.record_round(&id("p2"), "Q", mixed).unwrap();
        assert!(round.single_target_player_id.is_none());
        assert!(round.counts_by_player_id.is_some());
    }

    #[test]
    fn test_availability_is_per_leader() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();

        assert!(!engine.is_available(&id("p1"), "K"));
        assert!(engine.is_available(&id("p2"), "K"));
        assert!(!engine.is_available(&id("p2"), "NOPE"));

        let codes: Vec<_> = engine.available_types_for(&id("p1")).iter().map(|t| t.code).collect();
        assert_eq!(codes.len(), 8);
        assert!(!codes.contains(&"K"));

        let matrix = engine.availability_matrix();
        assert_eq!(matrix.len(), 9);
        assert_eq!(matrix[0], AvailabilityRow { code: "K", available: vec![false, true, true] });

        let used = engine.used_types_by_player();
        assert_eq!(used[0], (id("p1"), vec!["K"]));
        assert!(used[1].1.is_empty());
    }

    #[test]
    fn test_edit_single_round_target() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();

        let round = engine.edit_last_round(&Distribution::target("p3")).unwrap();
        assert_eq!(round.single_target_player_id, Some(id("p3")));
        assert_eq!(round.scores[&id("p2")], 0);
        assert_eq!(round.scores[&id("p3")], -40);
    }

    #[test]
    fn test_edit_ignores_mismatched_patch_kind() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();
        let before = engine.current_state();

        engine.edit_last_round(&Distribution::counts([("p1", 1)])).unwrap();
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_edit_without_rounds() {
        let mut engine = started();
        assert_eq!(
            engine.edit_last_round(&Distribution::target("p1")).unwrap_err(),
            EngineError::NoRounds
        );
        assert_eq!(
            engine.edit_round(0, &Distribution::target("p1")).unwrap_err(),
            EngineError::NoRounds
        );
    }

    #[test]
    fn test_validate_edit_needs_a_round() {
        let patch = Distribution::target("p1");
        assert_eq!(
            RoundEngine::default().validate_edit(&patch),
            Err(EngineError::NotStarted)
        );

        let mut engine = started();
        assert_eq!(engine.validate_edit(&patch), Err(EngineError::NoRounds));

        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();
        assert_eq!(engine.validate_edit(&patch), Ok(ValidationOutcome::Ok));
        assert_eq!(
            engine.validate_edit(&Distribution::target("p9")),
            Ok(ValidationOutcome::NeedsTarget)
        );
    }

    #[test]
    fn test_edit_round_rejects_earlier_rounds() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();
        engine.record_round(&id("p2"), "K", Distribution::target("p3")).unwrap();
        let before = engine.current_state();

        assert_eq!(
            engine.edit_round(0, &Distribution::target("p1")).unwrap_err(),
            EngineError::NotLastRound { index: 0, last: 1 }
        );
        assert_eq!(engine.state(), &before);

        engine.edit_round(1, &Distribution::target("p1")).unwrap();
        assert_eq!(engine.state().rounds[1].scores[&id("p1")], -40);
    }

    #[test]
    fn test_edit_applies_invalid_patch() {
        let mut engine = started();
        engine
            .record_round(&id("p1"), "Q", Distribution::counts([("p1", 4)]))
            .unwrap();

        let patch = Distribution::counts([("p2", 1)]);
        assert_eq!(
            engine.validate_edit(&patch),
            Ok(ValidationOutcome::DistributionMismatch { expected: 4, actual: 1 })
        );

        let round = engine.edit_last_round(&patch).unwrap();
        assert_eq!(round.scores[&id("p1")], 0);
        assert_eq!(round.scores[&id("p2")], -10);
        assert_eq!(engine.state().rounds.len(), 1);
        assert_eq!(engine.state().active_leader_index, 1);
    }

    #[test]
    fn test_reset_returns_to_setup() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();

        engine.reset();
        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(engine.state(), &GameState::new());
    }

    #[test]
    fn test_from_state_rejects_broken_invariants() {
        let mut engine = started();
        engine.record_round(&id("p1"), "K", Distribution::target("p2")).unwrap();
        let good = engine.current_state();

        assert!(RoundEngine::from_state(EngineConfig::default(), good.clone()).is_ok());

        let mut bad = good.clone();
        bad.active_leader_index = 3;
        assert!(matches!(
            RoundEngine::from_state(EngineConfig::default(), bad),
            Err(EngineError::CorruptedSnapshot(_))
        ));

        let mut bad = good.clone();
        bad.rounds[0].game_type_code = "ZZ".to_string();
        assert!(RoundEngine::from_state(EngineConfig::default(), bad).is_err());

        let mut bad = good.clone();
        bad.players = None;
        assert!(RoundEngine::from_state(EngineConfig::default(), bad).is_err());

        let mut bad = good;
        let repeat = bad.rounds[0].clone();
        bad.rounds.push_back(repeat);
        assert!(RoundEngine::from_state(EngineConfig::default(), bad).is_err());
    }
}
