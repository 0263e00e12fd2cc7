//! Configuration types.
//!
//! - `SessionConfig`: knobs for running a session (queue capacities,
//!   starting money, game length). Has defaults; may be loaded from JSON.
//! - `GameSetup`: everything an engine's `start` needs (id, name, players,
//!   seed). Built through `GameSetupBuilder`, which refuses incomplete
//!   setups instead of filling in defaults.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::id::{GameId, PlayerId};
use super::player::{Player, Seat};
use crate::engine::Game;
use crate::error::{GameError, Result};

/// Session-level settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the game-wide message queue.
    pub message_capacity: usize,

    /// Capacity of each player's chat queue.
    pub chat_capacity: usize,

    /// Money each player starts with (games that track money).
    pub starting_money: i64,

    /// Number of full turns before the game ends (games with a fixed length).
    pub turns: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            message_capacity: 500,
            chat_capacity: 500,
            starting_money: 12,
            turns: 3,
        }
    }
}

impl SessionConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GameError::config(format!("unreadable session config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no session can run with.
    pub fn validate(&self) -> Result<()> {
        if self.message_capacity == 0 {
            return Err(GameError::config("message_capacity must be at least 1"));
        }
        if self.chat_capacity == 0 {
            return Err(GameError::config("chat_capacity must be at least 1"));
        }
        if self.turns == 0 {
            return Err(GameError::config("turns must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_chat_capacity(mut self, capacity: usize) -> Self {
        self.chat_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    #[must_use]
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }
}

/// Inputs to `GameEngine::start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub id: GameId,
    pub name: String,
    /// In seating order. At least one, ids unique.
    pub players: Vec<Player>,
    pub seed: u64,
}

impl GameSetup {
    /// Start building a setup.
    #[must_use]
    pub fn builder() -> GameSetupBuilder {
        GameSetupBuilder::default()
    }

    /// Seat of the player with the given id.
    #[must_use]
    pub fn seat_of(&self, id: &PlayerId) -> Option<Seat> {
        self.players
            .iter()
            .position(|p| &p.id == id)
            .map(|i| Seat(i as u8))
    }

    /// Check the invariants `start` relies on. Anything accepted here also
    /// passes [`Game::validate`] once logged.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(GameError::config("game id is required"));
        }
        validate_players(&self.players)
    }

    /// The game aggregate for this setup, with an empty log.
    #[must_use]
    pub fn into_game(self) -> Game {
        Game::from_setup(self)
    }
}

pub(crate) fn validate_players(players: &[Player]) -> Result<()> {
    if players.is_empty() {
        return Err(GameError::config("a game needs at least one player"));
    }
    if players.len() > 255 {
        return Err(GameError::config("at most 255 players supported"));
    }
    let mut seen = FxHashSet::default();
    for p in players {
        if p.id.is_empty() {
            return Err(GameError::config("player id must not be empty"));
        }
        if !seen.insert(&p.id) {
            return Err(GameError::config(format!("duplicate player id {}", p.id)));
        }
    }
    Ok(())
}

/// Builder for [`GameSetup`].
///
/// ```
/// use turnworks::core::{GameSetup, Player};
///
/// let setup = GameSetup::builder()
///     .id("T")
///     .name("Test")
///     .player(Player::new("A", "Allen"))
///     .player(Player::new("B", "Bob"))
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(setup.players.len(), 2);
///
/// // No seed: refused rather than drawn from entropy.
/// assert!(GameSetup::builder().id("T").player(Player::new("A", "Allen")).build().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GameSetupBuilder {
    id: Option<GameId>,
    name: String,
    players: Vec<Player>,
    seed: Option<u64>,
}

impl GameSetupBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<GameId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    #[must_use]
    pub fn players(mut self, players: impl IntoIterator<Item = Player>) -> Self {
        self.players.extend(players);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<GameSetup> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GameError::config("game id is required"))?;
        let seed = self
            .seed
            .ok_or_else(|| GameError::config("seed is required"))?;
        let setup = GameSetup {
            id,
            name: self.name,
            players: self.players,
            seed,
        };
        setup.validate()?;
        Ok(setup)
    }
}
