//! Turn-order scheduling.
//!
//! Players are ranked by money, then by seating order. The ranking is
//! fixed when the game starts; each phase walks a copy of it.

mod rank;
mod turn_order;

pub use rank::{PlayerInfo, RankQueue};
pub use turn_order::TurnOrder;
