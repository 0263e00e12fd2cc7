//! Werks: a locomotive development game.
//!
//! Each turn has three phases, played in turn order:
//!
//! 1. **Locomotive Development**: open a factory for a locomotive that has
//!    orders showing, is not obsolete, and that you can afford and don't
//!    already build.
//! 2. **Production Capacity**: add capacity to one of your factories.
//! 3. **Locomotive Production**: every factory earns its income times its
//!    capacity once all players have passed.
//!
//! After the configured number of turns the richest player wins, the
//! earlier seat taking a tie.
//!
//! Rules data comes from a [`LocoCatalog`]. All dice are drawn from the
//! game seed, so a logged game replays to the same board.

mod board;
mod catalog;
mod engine;

pub use board::{Die, Factory, Firm, LocoBoard, DICE_SLOTS, MAX_CAPACITY, OPENING_ORDERS};
pub use catalog::{LocoCatalog, LocoKind, LocoSpec};
pub use engine::{Move, Phase, WerksEngine};
