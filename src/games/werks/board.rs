//! Per-game board state: order dice on each locomotive, and each player's
//! money and factories.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::catalog::LocoSpec;
use crate::core::GameRng;

/// Dice slots per order track.
pub const DICE_SLOTS: usize = 5;

/// Existing-order dice rolled onto the first locomotive at start.
pub const OPENING_ORDERS: usize = 3;

/// Most capacity a single factory can have.
pub const MAX_CAPACITY: u32 = 5;

/// A slot where a die can sit, and the die in it.
///
/// `render == false` means the slot doesn't exist for this locomotive.
/// `pips == 0` means the slot is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub pips: u8,
    pub render: bool,
}

impl Die {
    /// An empty slot.
    #[must_use]
    pub const fn slot(render: bool) -> Self {
        Self { pips: 0, render }
    }

    /// A freshly rolled, visible die.
    pub fn roll(rng: &mut GameRng) -> Self {
        Self {
            pips: rng.roll_die(),
            render: true,
        }
    }

    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.pips != 0
    }
}

/// Board state of one locomotive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocoBoard {
    pub key: String,
    pub existing_orders: [Die; DICE_SLOTS],
    pub initial_orders: Die,
    pub customer_base: [Die; DICE_SLOTS],
    pub developed: bool,
    pub obsolete: bool,
}

impl LocoBoard {
    /// Empty tracks shaped by the card.
    #[must_use]
    pub fn new(spec: &LocoSpec) -> Self {
        Self {
            key: spec.key.clone(),
            existing_orders: std::array::from_fn(|i| Die::slot(i < spec.max_existing_orders)),
            initial_orders: Die::slot(true),
            customer_base: std::array::from_fn(|i| Die::slot(i < spec.max_customer_base)),
            developed: false,
            obsolete: false,
        }
    }

    /// Any die showing on the initial or existing order tracks.
    #[must_use]
    pub fn has_orders(&self) -> bool {
        self.initial_orders.is_showing() || self.existing_orders.iter().any(Die::is_showing)
    }

    /// Put `die` in the first open existing-orders slot. Returns false when
    /// the track is full.
    pub fn place_existing(&mut self, die: Die) -> bool {
        match self
            .existing_orders
            .iter_mut()
            .find(|slot| slot.render && !slot.is_showing())
        {
            Some(slot) => {
                *slot = die;
                true
            }
            None => false,
        }
    }
}

/// A production line for one locomotive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
    pub key: String,
    pub capacity: u32,
    pub units_sold: u32,
}

impl Factory {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            capacity: 1,
            units_sold: 0,
        }
    }
}

/// One player's company.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    pub money: i64,
    pub factories: SmallVec<[Factory; 4]>,
    /// Position in the turn order (0 = goes first).
    pub turn_order: usize,
}

impl Firm {
    #[must_use]
    pub fn new(money: i64) -> Self {
        Self {
            money,
            factories: SmallVec::new(),
            turn_order: 0,
        }
    }

    #[must_use]
    pub fn owns(&self, key: &str) -> bool {
        self.factories.iter().any(|f| f.key == key)
    }

    pub fn factory_mut(&mut self, key: &str) -> Option<&mut Factory> {
        self.factories.iter_mut().find(|f| f.key == key)
    }
}
