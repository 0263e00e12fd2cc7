//! The externally visible projection of a game.
//!
//! A `GameState` says what the game is waiting for: who acts next and what
//! they may choose. The authoritative rules state lives inside the engine.
//! A chess engine knows where every piece is, but its `GameState` is only
//! ever "white to move", "black to move", or "over".
//!
//! A state with no choices is terminal. Terminal is absorbing.

use serde::{Deserialize, Serialize};

use super::action::{Action, Choice, Event};
use super::player::Player;

/// What the game is currently waiting on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// What just happened (sent to all players).
    pub outcome: Event,

    /// Who is expected to act. `None` once the game is over.
    pub acting_player: Option<Player>,

    /// What the acting player may do. Empty means the game has ended.
    pub choices: Vec<Choice>,
}

impl GameState {
    /// A state awaiting `player`'s choice among `choices`.
    pub fn awaiting(outcome: Event, player: Player, choices: Vec<Choice>) -> Self {
        Self {
            outcome,
            acting_player: Some(player),
            choices,
        }
    }

    /// A terminal state.
    pub fn finished(outcome: Event) -> Self {
        Self {
            outcome,
            acting_player: None,
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// The offered choice `action` selects, if any.
    #[must_use]
    pub fn find_choice(&self, action: &Action) -> Option<&Choice> {
        self.choices.iter().find(|c| action.matches(c))
    }

    /// Look up a choice by abbreviation, ignoring ASCII case.
    ///
    /// Used by interactive front ends where players type abbreviations.
    #[must_use]
    pub fn find_choice_ignore_case(&self, abbr: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|c| c.abbr.eq_ignore_ascii_case(abbr))
    }
}
