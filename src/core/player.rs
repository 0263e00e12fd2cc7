//! Players, seats, and per-seat storage.
//!
//! ## Player
//!
//! The identity and presentation of one participant. A `Player` never holds
//! a reference to its game, so engines can keep copies of players without
//! tying their state to any session or transport.
//!
//! ## Seat
//!
//! 0-based seating index assigned at game start, in the order the players
//! were listed. Seats never change during a game.
//!
//! ## SeatMap
//!
//! Dense per-seat storage backed by `Vec` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::action::Payload;
use super::id::{PlayerId, UserId};

/// One participant in one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique within the game.
    pub id: PlayerId,

    /// Display name.
    pub name: String,

    /// The owning user account.
    #[serde(default)]
    pub user_id: UserId,

    /// Opaque presentation data (avatar, colour, ...).
    #[serde(default)]
    pub detail: Option<Payload>,
}

impl Player {
    /// Create a player with no owning user and no detail.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            user_id: UserId::default(),
            detail: None,
        }
    }

    /// Set the owning user.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Attach presentation data.
    #[must_use]
    pub fn with_detail(mut self, detail: Payload) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Seating position, 0-based. Seat 0 is the first listed player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats at a table of `player_count` players.
    ///
    /// ```
    /// use turnworks::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all(3).collect();
    /// assert_eq!(seats, vec![Seat(0), Seat(1), Seat(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use turnworks::core::{Seat, SeatMap};
///
/// let mut money: SeatMap<i64> = SeatMap::with_value(4, 12);
/// money[Seat(1)] -= 5;
/// assert_eq!(money[Seat(0)], 12);
/// assert_eq!(money[Seat(1)], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a SeatMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(Seat) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(Seat(i))).collect();
        Self { data }
    }

    /// Create a SeatMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, seat: Seat) -> Option<&T> {
        self.data.get(seat.index())
    }

    pub fn get_mut(&mut self, seat: Seat) -> Option<&mut T> {
        self.data.get_mut(seat.index())
    }

    /// Iterate over (Seat, &T) pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs in seating order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (Seat(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> FromIterator<T> for SeatMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let data: Vec<T> = iter.into_iter().collect();
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_builder() {
        let p = Player::new("A", "Allen").with_user("u-1");
        assert_eq!(p.id, PlayerId::new("A"));
        assert_eq!(p.name, "Allen");
        assert_eq!(p.user_id, UserId::new("u-1"));
        assert!(p.detail.is_none());
    }

    #[test]
    fn test_player_serde_defaults() {
        let p = Player::new("A", "Allen");

        let back: Player = serde_json::from_str(r#"{"id":"A","name":"Allen"}"#).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_seat_basics() {
        assert_eq!(Seat::new(2).index(), 2);
        assert_eq!(format!("{}", Seat(1)), "Seat 1");
        assert!(Seat(0) < Seat(3));
    }

    #[test]
    fn test_seat_map_new() {
        let map: SeatMap<i64> = SeatMap::new(4, |s| s.index() as i64 * 10);
        assert_eq!(map[Seat(0)], 0);
        assert_eq!(map[Seat(3)], 30);
        assert_eq!(map.player_count(), 4);
        assert!(map.get(Seat(4)).is_none());
    }

    #[test]
    fn test_seat_map_mutation_and_iter() {
        let mut map: SeatMap<i64> = SeatMap::with_value(3, 12);
        map[Seat(2)] = 13;
        for (_, v) in map.iter_mut() {
            *v += 1;
        }
        let pairs: Vec<_> = map.iter().map(|(s, v)| (s, *v)).collect();
        assert_eq!(pairs, vec![(Seat(0), 13), (Seat(1), 13), (Seat(2), 14)]);
    }

    #[test]
    fn test_seat_map_from_iter() {
        let map: SeatMap<&str> = ["a", "b"].into_iter().collect();
        assert_eq!(map[Seat(1)], "b");
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_seat_map_zero_players() {
        let _: SeatMap<i32> = SeatMap::with_value(0, 0);
    }
}
