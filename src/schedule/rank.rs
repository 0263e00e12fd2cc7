//! Ranked entries and the bounded priority structure that holds them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::Seat;

/// Scheduler entry for one player.
///
/// Ranked by `10 * money - seat`, highest first. Ten units of seating
/// order are worth one unit of money, so at equal money the lower seat
/// goes first and any strictly richer player (at tables under ten) goes
/// before a poorer one. Exact composite ties fall back to the lower seat.
///
/// ```
/// use turnworks::core::Seat;
/// use turnworks::schedule::PlayerInfo;
///
/// let rich = PlayerInfo::new(Seat(3), 13);
/// let first = PlayerInfo::new(Seat(0), 12);
/// let second = PlayerInfo::new(Seat(1), 12);
///
/// assert!(rich > first);
/// assert!(first > second);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Seating order assigned at game start.
    pub seat: Seat,
    /// Money at the time the entry was ranked.
    pub money: i64,
}

impl PlayerInfo {
    #[must_use]
    pub const fn new(seat: Seat, money: i64) -> Self {
        Self { seat, money }
    }

    /// Composite ranking key.
    #[must_use]
    pub fn priority(&self) -> i64 {
        10 * self.money - self.seat.0 as i64
    }
}

impl Ord for PlayerInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| other.seat.cmp(&self.seat))
    }
}

impl PartialOrd for PlayerInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-priority queue with a fixed capacity.
///
/// The greatest element (by `Ord`) pops first. Pushing past capacity is
/// refused and the rejected element handed back.
#[derive(Clone, Debug)]
pub struct RankQueue<T: Ord> {
    heap: BinaryHeap<T>,
    capacity: usize,
}

impl<T: Ord> RankQueue<T> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert an entry, or give it back if the queue is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.heap.len() >= self.capacity {
            return Err(item);
        }
        self.heap.push(item);
        Ok(())
    }

    /// Remove and return the highest-ranked entry.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, highest first, without consuming the queue.
    #[must_use]
    pub fn ranked(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items = self.heap.clone().into_sorted_vec();
        items.reverse();
        items
    }
}

impl<T: Ord + Clone> PartialEq for RankQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.ranked() == other.ranked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_money_lower_seat_first() {
        let a = PlayerInfo::new(Seat(0), 12);
        let b = PlayerInfo::new(Seat(1), 12);
        assert!(a > b);
        assert_eq!(a.priority(), 120);
        assert_eq!(b.priority(), 119);
    }

    #[test]
    fn test_more_money_outranks_seat() {
        let rich = PlayerInfo::new(Seat(3), 13);
        let poor = PlayerInfo::new(Seat(0), 12);
        assert!(rich > poor);
    }

    #[test]
    fn test_exact_composite_tie_prefers_lower_seat() {
        // 10*13 - 10 == 10*12 - 0
        let late = PlayerInfo::new(Seat(10), 13);
        let early = PlayerInfo::new(Seat(0), 12);
        assert_eq!(late.priority(), early.priority());
        assert!(early > late);
    }

    #[test]
    fn test_rank_queue_pops_highest_first() {
        let mut q = RankQueue::with_capacity(4);
        for (seat, money) in [(0, 30), (1, 12), (2, 12), (3, 13)] {
            q.push(PlayerInfo::new(Seat(seat), money)).unwrap();
        }
        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|p| p.seat).collect();
        assert_eq!(order, vec![Seat(0), Seat(3), Seat(1), Seat(2)]);
    }

    #[test]
    fn test_rank_queue_refuses_past_capacity() {
        let mut q = RankQueue::with_capacity(1);
        assert!(q.push(5).is_ok());
        assert_eq!(q.push(6), Err(6));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_ranked_does_not_consume() {
        let mut q = RankQueue::with_capacity(3);
        q.push(1).unwrap();
        q.push(3).unwrap();
        q.push(2).unwrap();
        assert_eq!(q.ranked(), vec![3, 2, 1]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek(), Some(&3));
    }
}
