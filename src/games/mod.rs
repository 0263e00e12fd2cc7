//! Game implementations.
//!
//! - [`tally`]: act, pass or quit. Drives replay and persistence tests.
//! - [`werks`]: locomotive development with three phases per turn.

pub mod tally;
pub mod werks;

use crate::core::SessionConfig;
use crate::engine::GameEngine;
use crate::error::{GameError, Result};

/// Build a fresh engine of the named kind (`"tally"` or `"werks"`).
///
/// A [`Game`](crate::engine::Game) does not record its kind; whoever stores
/// a game keeps the kind alongside it and passes it here on restore.
pub fn engine_for(kind: &str, config: &SessionConfig) -> Result<Box<dyn GameEngine>> {
    match kind {
        tally::TallyEngine::KIND => Ok(Box::new(tally::TallyEngine::new())),
        werks::WerksEngine::KIND => Ok(Box::new(werks::WerksEngine::standard(config)?)),
        other => Err(GameError::config(format!("unknown game kind {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_engine_for_known_kinds() {
        let config = SessionConfig::default();
        assert_eq!(engine_for("tally", &config).unwrap().kind(), "tally");
        assert_eq!(engine_for("werks", &config).unwrap().kind(), "werks");
    }

    #[test]
    fn test_engine_for_applies_config() {
        use crate::core::{Action, GameSetup, Player};

        let config = SessionConfig::default().with_turns(1);
        let mut engine = engine_for(werks::WerksEngine::KIND, &config).unwrap();
        let setup = GameSetup::builder()
            .id("w")
            .player(Player::new("A", "Allen"))
            .seed(1)
            .build()
            .unwrap();
        engine.start(&setup).unwrap();
        // One turn, one player: a pass per phase ends it.
        let mut state = engine.handle_action(&Action::new("P")).unwrap();
        for _ in 0..2 {
            state = engine.handle_action(&Action::new("P")).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_engine_for_unknown_kind() {
        let err = engine_for("chess", &SessionConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
