//! Locomotive rules data.
//!
//! The catalog is loaded from JSON once and never changes during a game.
//! Each entry is keyed by its kind prefix and generation (`p1`, `g3`, ...),
//! and knows which locomotive it upgrades to and what the upgrade costs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::board::{DICE_SLOTS, OPENING_ORDERS};
use crate::error::{GameError, Result};

const STANDARD_LOCOS: &str = include_str!("../../../data/locos.json");

/// Locomotive family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocoKind {
    Passenger,
    Fast,
    Freight,
    Special,
}

impl LocoKind {
    /// Key prefix.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            LocoKind::Passenger => 'p',
            LocoKind::Fast => 'a',
            LocoKind::Freight => 'g',
            LocoKind::Special => 's',
        }
    }

    /// Key for the given generation of this kind.
    #[must_use]
    pub fn key(self, generation: u8) -> String {
        format!("{}{}", self.prefix(), generation)
    }
}

/// One locomotive card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocoSpec {
    pub kind: LocoKind,
    pub generation: u8,
    pub name: String,
    pub years: String,
    pub development_cost: i64,
    pub production_cost: i64,
    pub income: i64,
    pub max_existing_orders: usize,
    pub max_customer_base: usize,
    pub count: u32,

    // Derived when the catalog is built.
    #[serde(skip_deserializing)]
    pub key: String,
    #[serde(skip_deserializing)]
    pub upgrade_to: Option<String>,
    #[serde(skip_deserializing)]
    pub upgrade_cost: i64,
}

/// Every locomotive available in a game, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocoCatalog {
    locos: Vec<LocoSpec>,
    index: FxHashMap<String, usize>,
}

impl LocoCatalog {
    /// The built-in catalog.
    pub fn standard() -> Result<Self> {
        Self::from_json(STANDARD_LOCOS)
    }

    /// Parse a JSON array of locomotives.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<LocoSpec> = serde_json::from_str(json)
            .map_err(|e| GameError::config(format!("unreadable loco catalog: {e}")))?;
        Self::from_specs(specs)
    }

    /// Build from parsed entries, deriving keys and upgrades.
    ///
    /// The first entry opens the game already developed, so it must have
    /// room for the opening orders.
    pub fn from_specs(mut locos: Vec<LocoSpec>) -> Result<Self> {
        if let Some(first) = locos.first() {
            if first.max_existing_orders < OPENING_ORDERS {
                return Err(GameError::config(format!(
                    "{}: first loco needs {OPENING_ORDERS} existing-order slots",
                    first.name
                )));
            }
        }
        let mut index = FxHashMap::default();
        for (i, loco) in locos.iter_mut().enumerate() {
            if loco.generation == 0 {
                return Err(GameError::config(format!("{}: generation must be at least 1", loco.name)));
            }
            if loco.max_existing_orders > DICE_SLOTS || loco.max_customer_base > DICE_SLOTS {
                return Err(GameError::config(format!(
                    "{}: at most {DICE_SLOTS} dice slots",
                    loco.name
                )));
            }
            if loco.development_cost < 0 || loco.production_cost < 0 {
                return Err(GameError::config(format!("{}: negative cost", loco.name)));
            }
            loco.key = loco.kind.key(loco.generation);
            if index.insert(loco.key.clone(), i).is_some() {
                return Err(GameError::config(format!("duplicate loco {}", loco.key)));
            }
        }

        let mut catalog = Self { locos, index };
        for i in 0..catalog.locos.len() {
            let loco = &catalog.locos[i];
            let Some(next_generation) = loco.generation.checked_add(1) else {
                continue;
            };
            let next_key = loco.kind.key(next_generation);
            let upgrade = catalog
                .get(&next_key)
                .map(|next| (next.key.clone(), next.production_cost - loco.production_cost));
            if let Some((key, cost)) = upgrade {
                catalog.locos[i].upgrade_to = Some(key);
                catalog.locos[i].upgrade_cost = cost;
            }
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locos.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LocoSpec> {
        self.index.get(key).map(|&i| &self.locos[i])
    }

    /// Catalog position of the locomotive with `key`.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocoSpec> {
        self.locos.iter()
    }

    #[must_use]
    pub fn specs(&self) -> &[LocoSpec] {
        &self.locos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_standard_catalog_loads() {
        let catalog = LocoCatalog::standard().unwrap();
        assert!(!catalog.is_empty());
        let first = &catalog.specs()[0];
        assert_eq!(first.key, "p1");
        assert_eq!(catalog.position("p2"), Some(1));
    }

    #[test]
    fn test_keys_and_upgrades_are_derived() {
        let catalog = LocoCatalog::from_json(
            r#"[
                {"kind":"passenger","generation":1,"name":"A","years":"","developmentCost":4,"productionCost":4,"income":6,"maxExistingOrders":3,"maxCustomerBase":3,"count":7},
                {"kind":"passenger","generation":2,"name":"B","years":"","developmentCost":8,"productionCost":7,"income":9,"maxExistingOrders":3,"maxCustomerBase":4,"count":6},
                {"kind":"fast","generation":1,"name":"C","years":"","developmentCost":14,"productionCost":10,"income":15,"maxExistingOrders":2,"maxCustomerBase":3,"count":4}
            ]"#,
        )
        .unwrap();

        let p1 = catalog.get("p1").unwrap();
        assert_eq!(p1.upgrade_to.as_deref(), Some("p2"));
        assert_eq!(p1.upgrade_cost, 3);
        assert!(catalog.get("p2").unwrap().upgrade_to.is_none());
        assert_eq!(catalog.get("a1").unwrap().name, "C");
    }

    #[test]
    fn test_duplicate_key_is_config_error() {
        let json = r#"[
            {"kind":"special","generation":1,"name":"A","years":"","developmentCost":1,"productionCost":1,"income":1,"maxExistingOrders":3,"maxCustomerBase":1,"count":1},
            {"kind":"special","generation":1,"name":"B","years":"","developmentCost":1,"productionCost":1,"income":1,"maxExistingOrders":1,"maxCustomerBase":1,"count":1}
        ]"#;
        let err = LocoCatalog::from_json(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_too_many_dice_slots_is_config_error() {
        let json = r#"[{"kind":"freight","generation":1,"name":"A","years":"","developmentCost":1,"productionCost":1,"income":1,"maxExistingOrders":6,"maxCustomerBase":1,"count":1}]"#;
        assert!(LocoCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_first_loco_needs_opening_slots() {
        let json = r#"[
            {"kind":"passenger","generation":1,"name":"A","years":"","developmentCost":4,"productionCost":4,"income":6,"maxExistingOrders":2,"maxCustomerBase":3,"count":7},
            {"kind":"passenger","generation":2,"name":"B","years":"","developmentCost":8,"productionCost":7,"income":9,"maxExistingOrders":1,"maxCustomerBase":4,"count":6}
        ]"#;
        let err = LocoCatalog::from_json(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("existing-order slots"));
    }

    #[test]
    fn test_empty_catalog_parses() {
        let catalog = LocoCatalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
    }
}
