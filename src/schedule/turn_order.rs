//! Who acts next.
//!
//! Two queues are kept:
//!
//! - `ranking`: built once from the players' money and seats at game
//!   start. Never popped; only copied.
//! - `rotation`: consumed one player at a time as a phase progresses.
//!
//! `next(false)` walks the rotation once and then reports `None`, which a
//! game reads as "everyone has acted this phase". `next(true)` refills the
//! rotation from the ranking whenever it runs dry, so players rotate
//! forever. A refill is a straight copy, so every cycle repeats the same
//! order.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::rank::{PlayerInfo, RankQueue};
use crate::core::{Seat, SeatMap};

/// Turn-order scheduler.
///
/// ```
/// use turnworks::core::{Seat, SeatMap};
/// use turnworks::schedule::TurnOrder;
///
/// let money: SeatMap<i64> = [12, 12, 12, 13].into_iter().collect();
/// let mut order = TurnOrder::from_money(&money);
///
/// let seats: Vec<_> = (0..6).filter_map(|_| order.next(true)).collect();
/// assert_eq!(seats, vec![Seat(3), Seat(0), Seat(1), Seat(2), Seat(3), Seat(0)]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOrder {
    ranking: RankQueue<PlayerInfo>,
    rotation: RankQueue<PlayerInfo>,
}

impl TurnOrder {
    /// Rank the given entries. The rotation starts full.
    pub fn new(entries: impl IntoIterator<Item = PlayerInfo>) -> Self {
        let entries: Vec<PlayerInfo> = entries.into_iter().collect();
        let mut ranking = RankQueue::with_capacity(entries.len());
        for entry in entries {
            // Capacity is exactly the entry count.
            let _ = ranking.push(entry);
        }
        Self {
            rotation: ranking.clone(),
            ranking,
        }
    }

    /// Rank every seat by its current money.
    pub fn from_money(money: &SeatMap<i64>) -> Self {
        Self::new(money.iter().map(|(seat, &m)| PlayerInfo::new(seat, m)))
    }

    /// Next player to act, or `None` when the rotation is exhausted and
    /// `wrap` is false.
    pub fn next(&mut self, wrap: bool) -> Option<Seat> {
        if self.rotation.is_empty() {
            if !wrap {
                return None;
            }
            self.refill();
        }
        self.rotation.pop().map(|info| info.seat)
    }

    /// Reset the rotation to a full copy of the ranking.
    pub fn refill(&mut self) {
        self.rotation = self.ranking.clone();
    }

    /// Players still to act in the current rotation.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rotation.len()
    }

    /// Number of ranked players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Every seat in ranking order, best first.
    #[must_use]
    pub fn ranked_seats(&self) -> Vec<Seat> {
        self.ranking.ranked().into_iter().map(|p| p.seat).collect()
    }

    /// The seat that ranks first.
    #[must_use]
    pub fn start_seat(&self) -> Option<Seat> {
        self.ranking.peek().map(|p| p.seat)
    }

    /// Position of `seat` in the ranking (0 = goes first).
    #[must_use]
    pub fn position_of(&self, seat: Seat) -> Option<usize> {
        self.ranked_seats().iter().position(|&s| s == seat)
    }
}

impl Serialize for TurnOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TurnOrder", 2)?;
        s.serialize_field("ranking", &self.ranking.ranked())?;
        s.serialize_field("rotation", &self.rotation.ranked())?;
        s.end()
    }
}
