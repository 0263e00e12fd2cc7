//! The engine contract and the action log that replays through it.
//!
//! Games implement [`GameEngine`] to define their rules. The rest of the
//! crate drives engines only through this trait and never inspects their
//! internal state.
//!
//! ## Implementation Notes
//!
//! - `start`: reset everything from the setup; all randomness must come
//!   from `setup.seed`
//! - `handle_action`: validate against the choices the engine generated;
//!   on error, leave state exactly as it was
//! - `refresh_client`, `debug`, `snapshot`: read-only
//! - `snapshot`: every field that defines internal state, rules data
//!   included, so two engines that compare equal are interchangeable

pub mod log;

pub use log::{replay, Game};

use serde::Serialize;

use crate::core::{Action, GameSetup, GameState, PlayerId};
use crate::error::{GameError, Result};

/// Rules for one kind of game.
pub trait GameEngine: Send {
    /// Tag naming the concrete engine kind. Engines of different kinds never
    /// compare equal.
    fn kind(&self) -> &'static str;

    /// Initialize internal state from scratch.
    ///
    /// Calling `start` and then replaying N actions must reach the same
    /// state as playing those N actions live from the same setup.
    fn start(&mut self, setup: &GameSetup) -> Result<GameState>;

    /// Apply the acting player's action.
    ///
    /// Fails with `InvalidAction` if the abbreviation is not among the
    /// current choices, if the game is over, or if the engine hasn't been
    /// started. A failed call changes nothing.
    fn handle_action(&mut self, action: &Action) -> Result<GameState>;

    /// Serializable view for a reconnecting client.
    fn refresh_client(&self, player: &PlayerId) -> Result<serde_json::Value>;

    /// Human-readable dump of internal state.
    fn debug(&self) -> String;

    /// Structural snapshot of internal state, used by [`GameEngine::equals`].
    fn snapshot(&self) -> Result<serde_json::Value>;

    /// Structural equality with another engine.
    ///
    /// Engines of different kinds are unequal; same-kind engines are equal
    /// when their snapshots match. An engine whose snapshot fails equals
    /// nothing.
    fn equals(&self, other: &dyn GameEngine) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        match (self.snapshot(), other.snapshot()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Serialize engine state for [`GameEngine::snapshot`].
pub fn snapshot_of<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| GameError::corrupt(format!("snapshot failed: {e}")))
}

impl std::fmt::Debug for dyn GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
