//! Error type shared by every layer of the crate.
//!
//! Four kinds of failure reach callers, and all of them are returned as
//! values. Nothing in the library panics or exits on bad input:
//!
//! - **Invalid action**: the abbreviation is not among the current choices,
//!   or the game is already over. The engine is left untouched.
//! - **Unknown entity**: a game or player id that doesn't exist.
//! - **Data corruption**: a persisted game that fails to decode, or a log
//!   entry that fails to replay. Carries the failing log index when known.
//! - **Configuration**: missing setup (seed, players, rules data).

use thiserror::Error;

use crate::core::{GameId, PlayerId};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;

/// Coarse classification of a [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidAction,
    UnknownEntity,
    DataCorruption,
    Configuration,
}

/// Errors surfaced by engines, replay, sessions and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid action {abbr:?}: {reason}")]
    InvalidAction { abbr: String, reason: String },

    #[error("unknown game id: {0}")]
    UnknownGame(GameId),

    #[error("unknown player id: {0}")]
    UnknownPlayer(PlayerId),

    #[error("corrupt game data{}: {detail}", fmt_index(.index))]
    Corrupt {
        /// Position of the offending entry in the action log, if any.
        index: Option<usize>,
        detail: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at action {i}"),
        None => String::new(),
    }
}

impl GameError {
    pub fn invalid_action(abbr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            abbr: abbr.into(),
            reason: reason.into(),
        }
    }

    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Corrupt {
            index: None,
            detail: detail.into(),
        }
    }

    pub fn corrupt_at(index: usize, detail: impl Into<String>) -> Self {
        Self::Corrupt {
            index: Some(index),
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    /// Which of the four failure kinds this is.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidAction { .. } => ErrorKind::InvalidAction,
            GameError::UnknownGame(_) | GameError::UnknownPlayer(_) => ErrorKind::UnknownEntity,
            GameError::Corrupt { .. } => ErrorKind::DataCorruption,
            GameError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Stable machine-readable code for transports.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidAction { .. } => "INVALID_ACTION",
            GameError::UnknownGame(_) => "UNKNOWN_GAME",
            GameError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            GameError::Corrupt { .. } => "DATA_CORRUPTION",
            GameError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Text suitable for showing to an end user.
    ///
    /// Rejected requests carry their reason; corrupt games are reported as
    /// unavailable rather than exposing decoder output.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GameError::InvalidAction { reason, .. } => format!("Request rejected: {reason}"),
            GameError::UnknownGame(id) => format!("Request rejected: no game {id}"),
            GameError::UnknownPlayer(id) => format!("Request rejected: no player {id}"),
            GameError::Corrupt { .. } => "Game unavailable".to_string(),
            GameError::Config(detail) => format!("Game could not be set up: {detail}"),
        }
    }

    /// Log index of a corruption error, if it has one.
    #[must_use]
    pub fn log_index(&self) -> Option<usize> {
        match self {
            GameError::Corrupt { index, .. } => *index,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(GameError::invalid_action("X", "no").kind(), ErrorKind::InvalidAction);
        assert_eq!(GameError::UnknownGame(GameId::new("g")).kind(), ErrorKind::UnknownEntity);
        assert_eq!(GameError::UnknownPlayer(PlayerId::new("p")).kind(), ErrorKind::UnknownEntity);
        assert_eq!(GameError::corrupt("bad").kind(), ErrorKind::DataCorruption);
        assert_eq!(GameError::config("no seed").kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_display_includes_index() {
        let err = GameError::corrupt_at(7, "unknown abbreviation");
        assert_eq!(err.to_string(), "corrupt game data at action 7: unknown abbreviation");
        assert_eq!(err.log_index(), Some(7));

        let err = GameError::corrupt("truncated");
        assert_eq!(err.to_string(), "corrupt game data: truncated");
        assert_eq!(err.log_index(), None);
    }

    #[test]
    fn test_user_message_hides_corruption_detail() {
        let err = GameError::corrupt_at(3, "expected value at line 1 column 9");
        assert_eq!(err.user_message(), "Game unavailable");
    }

    #[test]
    fn test_codes() {
        assert_eq!(GameError::invalid_action("Z", "nope").code(), "INVALID_ACTION");
        assert_eq!(GameError::config("x").code(), "CONFIG_ERROR");
    }
}
