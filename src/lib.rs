//! # turnworks
//!
//! Server-side sessions for turn-based multiplayer games.
//!
//! ## Design Principles
//!
//! 1. **The log is the truth**: a game is its players, its seed and the
//!    ordered actions it accepted. Engine state is always rebuildable by
//!    replaying that log.
//!
//! 2. **Engines own the rules**: the crate drives every game through the
//!    [`GameEngine`] trait and never looks inside.
//!
//! 3. **Errors are values**: invalid moves, unknown ids, corrupt data and
//!    bad configuration come back as [`GameError`]. Nothing panics on input.
//!
//! ## Architecture
//!
//! - **Deterministic replay**: engines draw randomness only from the game
//!   seed (ChaCha8), so replay reproduces live play exactly.
//!
//! - **Persistent log**: the action log is an `im` vector, cheap to clone
//!   for snapshots and archiving.
//!
//! - **Per-game locking**: the [`GameRegistry`] locks each session on its
//!   own; games never wait on each other.
//!
//! ## Modules
//!
//! - `core`: ids, players, choices/actions/events, game state, RNG, config
//! - `engine`: the engine contract, the game aggregate, replay
//! - `schedule`: money-ranked turn order
//! - `notify`: bounded message and chat queues
//! - `session`: one live game with its queues
//! - `registry`: live sessions by id
//! - `games`: tally (test game) and werks (locomotive development)
//! - `console`: terminal play

pub mod core;
pub mod error;
pub mod notify;
pub mod schedule;
pub mod engine;
pub mod session;
pub mod registry;
pub mod games;
pub mod console;

// Re-export commonly used types
pub use crate::core::{
    Action, Choice, Event, GameId, GameRng, GameSetup, GameState, Payload, Player, PlayerId, Seat,
    SeatMap, SessionConfig, UserId,
};

pub use crate::error::{ErrorKind, GameError, Result};

pub use crate::engine::{replay, Game, GameEngine};

pub use crate::schedule::{PlayerInfo, RankQueue, TurnOrder};

pub use crate::notify::{BoundedQueue, ChatMessage, Notification, TextMessage};

pub use crate::session::Session;

pub use crate::registry::{GameRegistry, SharedSession};

pub use crate::console::play_to_console;
