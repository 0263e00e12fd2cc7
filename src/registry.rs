//! Live sessions by game id.
//!
//! The map sits behind a read-write lock and each session behind its own
//! mutex. Work on one game never waits on another game's lock: callers
//! take the map lock only long enough to clone the session's `Arc`.
//!
//! Lock order is map, then session. Only [`GameRegistry::archive`] holds
//! both at once.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::info;

use crate::core::{Action, GameId, GameState, PlayerId, SessionConfig};
use crate::engine::{Game, GameEngine};
use crate::error::{GameError, Result};
use crate::session::Session;

/// Shared handle to one session.
pub type SharedSession = Arc<Mutex<Session>>;

/// Every live game in the process.
///
/// ```
/// use turnworks::core::{Action, GameId, GameSetup, Player, PlayerId, SessionConfig};
/// use turnworks::games::tally::TallyEngine;
/// use turnworks::registry::GameRegistry;
///
/// let registry = GameRegistry::new();
/// let game = GameSetup::builder()
///     .id("g-1")
///     .player(Player::new("A", "Allen"))
///     .seed(9)
///     .build()
///     .unwrap()
///     .into_game();
///
/// let id = registry
///     .start(game, Box::new(TallyEngine::new()), &SessionConfig::default())
///     .unwrap();
/// registry.perform(&id, &PlayerId::new("A"), Action::new("Q")).unwrap();
///
/// let archived = registry.archive(&id).unwrap();
/// assert_eq!(archived.len(), 1);
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: RwLock<FxHashMap<GameId, SharedSession>>,
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Fails if its game id is taken.
    pub fn insert(&self, session: Session) -> Result<SharedSession> {
        let id = session.game().id().clone();
        let mut games = self.games.write();
        if games.contains_key(&id) {
            return Err(GameError::config(format!("game {id} is already registered")));
        }
        let shared = Arc::new(Mutex::new(session));
        games.insert(id, Arc::clone(&shared));
        Ok(shared)
    }

    /// Start a new game and register it.
    pub fn start(
        &self,
        game: Game,
        engine: Box<dyn GameEngine>,
        config: &SessionConfig,
    ) -> Result<GameId> {
        let id = game.id().clone();
        if self.contains(&id) {
            return Err(GameError::config(format!("game {id} is already registered")));
        }
        self.insert(Session::start(game, engine, config)?)?;
        Ok(id)
    }

    /// Replay a persisted game and register it.
    pub fn restore(
        &self,
        game: Game,
        engine: Box<dyn GameEngine>,
        config: &SessionConfig,
    ) -> Result<GameId> {
        let id = game.id().clone();
        if self.contains(&id) {
            return Err(GameError::config(format!("game {id} is already registered")));
        }
        self.insert(Session::restore(game, engine, config)?)?;
        Ok(id)
    }

    /// Handle to a session.
    pub fn get(&self, id: &GameId) -> Result<SharedSession> {
        self.games
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownGame(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, id: &GameId) -> bool {
        self.games.read().contains_key(id)
    }

    /// Run `f` under the session's lock.
    ///
    /// The lock is not reentrant: `f` must not call back into the registry
    /// for the same game (`perform`, `with_session`, `archive`), or it
    /// deadlocks. Return what you need and act after `with_session` returns.
    pub fn with_session<R>(&self, id: &GameId, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let shared = self.get(id)?;
        let mut session = shared.lock();
        Ok(f(&mut session))
    }

    /// [`Session::perform`] under the session's lock.
    pub fn perform(&self, id: &GameId, player: &PlayerId, action: Action) -> Result<GameState> {
        self.with_session(id, |session| session.perform(player, action))?
    }

    /// Drop a game from the registry whether or not it is finished.
    pub fn remove(&self, id: &GameId) -> Result<SharedSession> {
        self.games
            .write()
            .remove(id)
            .ok_or_else(|| GameError::UnknownGame(id.clone()))
    }

    /// Remove a finished game and hand back its aggregate for storage.
    pub fn archive(&self, id: &GameId) -> Result<Game> {
        let mut games = self.games.write();
        let shared = games
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownGame(id.clone()))?;
        let session = shared.lock();
        if !session.is_finished() {
            return Err(GameError::invalid_action("archive", format!("game {id} is not finished")));
        }
        games.remove(id);
        let game = session.game().clone();
        info!(game = %id, actions = game.len(), "game archived");
        Ok(game)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.games.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }
}
