//! Core vocabulary: identities, players, choices/actions/events, game
//! state, deterministic RNG, configuration.
//!
//! Nothing here knows about any particular game.

pub mod id;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use id::{GameId, PlayerId, UserId};
pub use player::{Player, Seat, SeatMap};
pub use rng::{GameRng, GameRngState};
pub use config::{GameSetup, GameSetupBuilder, SessionConfig};
pub use action::{Action, Choice, Event, Payload};
pub use state::GameState;
