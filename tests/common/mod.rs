//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use turnworks::core::{Action, GameSetup, Player};
use turnworks::engine::Game;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per test binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Players named by the given names, ids taken from their first letter.
pub fn players(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .map(|name| Player::new(&name[..1], *name))
        .collect()
}

pub fn setup(id: &str, names: &[&str], seed: u64) -> GameSetup {
    GameSetup::builder()
        .id(id)
        .name("Test")
        .players(players(names))
        .seed(seed)
        .build()
        .expect("valid setup")
}

/// The two-player game used throughout the replay tests.
pub fn allen_and_bob() -> GameSetup {
    setup("T", &["Allen", "Bob"], 0)
}

pub fn actions(abbrs: &[&str]) -> Vec<Action> {
    abbrs.iter().map(|a| Action::new(*a)).collect()
}

pub fn logged_game(setup: GameSetup, abbrs: &[&str]) -> Game {
    Game::from_parts(setup, actions(abbrs))
}
