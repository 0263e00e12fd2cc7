//! Tally: the smallest game that exercises the engine contract.
//!
//! On their turn a player may:
//! - `A` act: the tally goes up and the same player acts again
//! - `P` pass: the next seat acts
//! - `Q` quit: the game ends
//!
//! There is no randomness and nothing to win. It exists to drive replay,
//! persistence and session tests.

use serde::Serialize;

use crate::core::{Action, Choice, Event, GameId, GameSetup, GameState, Player, PlayerId};
use crate::engine::{snapshot_of, GameEngine};
use crate::error::{GameError, Result};

/// Engine for the act/pass/quit game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TallyEngine {
    id: GameId,
    name: String,
    players: Vec<Player>,
    acting: usize,
    action_count: u64,
    finished: bool,
}

impl TallyEngine {
    pub const KIND: &'static str = "tally";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times anyone has acted.
    #[must_use]
    pub fn action_count(&self) -> u64 {
        self.action_count
    }

    fn choices() -> Vec<Choice> {
        vec![
            Choice::new("A", "Act"),
            Choice::new("P", "Pass"),
            Choice::new("Q", "Quit"),
        ]
    }

    fn awaiting(&self, text: String) -> GameState {
        GameState::awaiting(
            Event::text(text),
            self.players[self.acting].clone(),
            Self::choices(),
        )
    }
}

impl GameEngine for TallyEngine {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn start(&mut self, setup: &GameSetup) -> Result<GameState> {
        setup.validate()?;
        *self = Self {
            id: setup.id.clone(),
            name: setup.name.clone(),
            players: setup.players.clone(),
            ..Self::default()
        };
        Ok(self.awaiting("Started game.".to_string()))
    }

    fn handle_action(&mut self, action: &Action) -> Result<GameState> {
        if self.players.is_empty() {
            return Err(GameError::invalid_action(&action.abbr, "game not started"));
        }
        if self.finished {
            return Err(GameError::invalid_action(&action.abbr, "game is over"));
        }

        let name = self.players[self.acting].name.clone();
        match action.abbr.as_str() {
            "A" => {
                self.action_count += 1;
                Ok(self.awaiting(format!("{name} acted.")))
            }
            "P" => {
                self.acting = (self.acting + 1) % self.players.len();
                Ok(self.awaiting(format!("{name} passed.")))
            }
            "Q" => {
                self.finished = true;
                Ok(GameState::finished(Event::text(format!(
                    "{name} quit, game over."
                ))))
            }
            _ => Err(GameError::invalid_action(&action.abbr, "not an offered choice")),
        }
    }

    fn refresh_client(&self, player: &PlayerId) -> Result<serde_json::Value> {
        let me = self
            .players
            .iter()
            .find(|p| &p.id == player)
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
        Ok(serde_json::json!({
            "game": self.id,
            "name": self.name,
            "you": me.name,
            "acting": self.players.get(self.acting).map(|p| &p.name),
            "actionCount": self.action_count,
            "finished": self.finished,
        }))
    }

    fn debug(&self) -> String {
        format!(
            "id={}\nname={}\nactionCount={}\nactingPlayer={}\nplayers={}\nfinished={}\n",
            self.id,
            self.name,
            self.action_count,
            self.acting,
            self.players.len(),
            self.finished
        )
    }

    fn snapshot(&self) -> Result<serde_json::Value> {
        snapshot_of(self)
    }
}
