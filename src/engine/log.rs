//! The game aggregate and its append-only action log.
//!
//! A [`Game`] holds only what is needed to rebuild an engine: identity, the
//! players in seating order, the seed, and every accepted action in the
//! order it was accepted. Engine state is never stored; it is recomputed by
//! [`replay`].
//!
//! ## Persistence
//!
//! | Format | Encode | Decode |
//! |--------|--------|--------|
//! | JSON   | [`Game::to_json`], [`Game::write_to`] | [`Game::from_json`], [`Game::read_from`] |
//! | bincode | [`Game::to_bytes`] | [`Game::from_bytes`] |
//!
//! Every decode path runs [`Game::validate`] before handing the game back,
//! so a caller never sees a structurally broken aggregate.
//!
//! ```
//! use turnworks::core::{Action, GameSetup, Player};
//! use turnworks::engine::{replay, Game};
//! use turnworks::games::tally::TallyEngine;
//!
//! let setup = GameSetup::builder()
//!     .id("g-1")
//!     .name("Tally")
//!     .player(Player::new("A", "Allen"))
//!     .player(Player::new("B", "Bob"))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let game = Game::from_parts(setup, [Action::new("A"), Action::new("P")]);
//! let restored = Game::from_json(&game.to_json().unwrap()).unwrap();
//!
//! let mut engine = TallyEngine::new();
//! let state = replay(&restored, &mut engine).unwrap();
//! assert_eq!(state.acting_player.unwrap().name, "Bob");
//! ```

use std::io::{Read, Write};

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::GameEngine;
use crate::core::config::validate_players;
use crate::core::{Action, GameId, GameSetup, GameState, Player};
use crate::error::{GameError, Result};

/// One game: players, seed and the ordered log of accepted actions.
///
/// Cloning is cheap; the log is a persistent vector that shares structure
/// with its clones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    name: String,
    players: Vec<Player>,
    seed: u64,
    actions: Vector<Action>,
}

impl Game {
    /// A game with an empty log.
    #[must_use]
    pub fn from_setup(setup: GameSetup) -> Self {
        Self::from_parts(setup, std::iter::empty())
    }

    /// A game with a log recovered from elsewhere. Call [`Game::validate`]
    /// (or [`replay`], which does) before trusting it.
    pub fn from_parts(setup: GameSetup, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            id: setup.id,
            name: setup.name,
            players: setup.players,
            seed: setup.seed,
            actions: actions.into_iter().collect(),
        }
    }

    /// The inputs `GameEngine::start` needs.
    #[must_use]
    pub fn setup(&self) -> GameSetup {
        GameSetup {
            id: self.id.clone(),
            name: self.name.clone(),
            players: self.players.clone(),
            seed: self.seed,
        }
    }

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Players in seating order. Fixed for the life of the game.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The log, oldest first.
    #[must_use]
    pub fn actions(&self) -> &Vector<Action> {
        &self.actions
    }

    /// Number of logged actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Look up a player by id.
    #[must_use]
    pub fn player(&self, id: &crate::core::PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Append an action the engine has already accepted.
    pub(crate) fn record(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    /// Check the structure a replay depends on.
    ///
    /// Player problems are reported without an index; a bad log entry
    /// reports its position.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(GameError::corrupt("game id is empty"));
        }
        validate_players(&self.players).map_err(|e| match e {
            GameError::Config(detail) => GameError::corrupt(detail),
            other => other,
        })?;
        if let Some(index) = self.actions.iter().position(|a| a.abbr.is_empty()) {
            return Err(GameError::corrupt_at(index, "action has no abbreviation"));
        }
        Ok(())
    }

    // === Persistence ===

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GameError::corrupt(format!("encode failed: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let game: Self = serde_json::from_str(json)
            .map_err(|e| GameError::corrupt(format!("decode failed: {e}")))?;
        game.validate()?;
        Ok(game)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::corrupt(format!("encode failed: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let game: Self = bincode::deserialize(bytes)
            .map_err(|e| GameError::corrupt(format!("decode failed: {e}")))?;
        game.validate()?;
        Ok(game)
    }

    /// Write the game as JSON.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)
            .map_err(|e| GameError::corrupt(format!("write failed: {e}")))
    }

    /// Read a JSON game written by [`Game::write_to`].
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let game: Self = serde_json::from_reader(reader)
            .map_err(|e| GameError::corrupt(format!("read failed: {e}")))?;
        game.validate()?;
        Ok(game)
    }
}

impl From<GameSetup> for Game {
    fn from(setup: GameSetup) -> Self {
        Self::from_setup(setup)
    }
}

/// Rebuild an engine's state from a game's log.
///
/// Starts the engine from the game's setup, then feeds it every logged
/// action in order. Intermediate states are discarded; the state after the
/// last action is returned. The first action the engine rejects stops the
/// replay with [`GameError::Corrupt`] carrying that action's index. The
/// engine is left wherever the replay stopped.
pub fn replay(game: &Game, engine: &mut dyn GameEngine) -> Result<GameState> {
    game.validate()?;

    let mut state = engine.start(&game.setup())?;
    for (index, action) in game.actions.iter().enumerate() {
        state = engine.handle_action(action).map_err(|e| {
            warn!(game = %game.id, index, abbr = %action.abbr, error = %e, "replay stopped");
            GameError::corrupt_at(index, e.to_string())
        })?;
    }

    debug!(game = %game.id, kind = engine.kind(), actions = game.len(), "replayed");
    if state.is_terminal() {
        info!(game = %game.id, "replayed to a finished game");
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::games::tally::TallyEngine;

    fn setup() -> GameSetup {
        GameSetup::builder()
            .id("g-1")
            .name("Tally")
            .player(Player::new("A", "Allen"))
            .player(Player::new("B", "Bob"))
            .player(Player::new("C", "Cara"))
            .seed(11)
            .build()
            .unwrap()
    }

    fn logged(abbrs: &[&str]) -> Game {
        Game::from_parts(setup(), abbrs.iter().map(|a| Action::new(*a)))
    }

    #[test]
    fn test_from_setup_starts_empty() {
        let game = Game::from_setup(setup());
        assert!(game.is_empty());
        assert_eq!(game.players().len(), 3);
        assert_eq!(game.setup(), setup());
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut game = Game::from_setup(setup());
        game.record(Action::new("A"));
        game.record(Action::new("P"));
        let abbrs: Vec<_> = game.actions().iter().map(|a| a.abbr.as_str()).collect();
        assert_eq!(abbrs, vec!["A", "P"]);
    }

    #[test]
    fn test_clone_shares_log_but_diverges() {
        let mut a = logged(&["A"]);
        let b = a.clone();
        a.record(Action::new("P"));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_replay_reaches_final_state() {
        let game = logged(&["A", "A", "P", "P"]);
        let mut engine = TallyEngine::new();
        let state = replay(&game, &mut engine).unwrap();
        assert_eq!(state.acting_player.unwrap().name, "Cara");
        assert_eq!(engine.action_count(), 2);
    }

    #[test]
    fn test_replay_reports_failing_index() {
        let game = logged(&["A", "P", "X", "P"]);
        let err = replay(&game, &mut TallyEngine::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
        assert_eq!(err.log_index(), Some(2));
    }

    #[test]
    fn test_replay_after_terminal_is_corrupt() {
        let game = logged(&["Q", "A"]);
        let err = replay(&game, &mut TallyEngine::new()).unwrap_err();
        assert_eq!(err.log_index(), Some(1));
    }

    #[test]
    fn test_validate_rejects_empty_abbr() {
        let game = logged(&["A", ""]);
        let err = game.validate().unwrap_err();
        assert_eq!(err.log_index(), Some(1));
    }

    #[test]
    fn test_json_roundtrip_preserves_log() {
        let game = logged(&["A", "P", "Q"]);
        let back = Game::from_json(&game.to_json().unwrap()).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn test_bincode_roundtrip_preserves_log() {
        let game = logged(&["P", "A"]);
        let back = Game::from_bytes(&game.to_bytes().unwrap()).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn test_write_read_stream() {
        let game = logged(&["A"]);
        let mut buf = Vec::new();
        game.write_to(&mut buf).unwrap();
        let back = Game::read_from(buf.as_slice()).unwrap();
        assert_eq!(back, game);
    }

    #[test]
    fn test_decode_garbage_is_corrupt_without_index() {
        let err = Game::from_json("{\"id\": 3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
        assert_eq!(err.log_index(), None);

        let err = Game::from_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
    }

    #[test]
    fn test_decode_duplicate_players_is_corrupt() {
        let json = r#"{"id":"g","name":"n","players":[{"id":"A","name":"a"},{"id":"A","name":"b"}],"seed":1,"actions":[]}"#;
        let err = Game::from_json(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
        assert!(err.to_string().contains("duplicate player id A"));
    }
}
