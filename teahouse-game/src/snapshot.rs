//! Flat, serializable save state for a shop.
use serde::{Deserialize, Serialize};

use crate::data::Catalog;
use crate::notebook::Notebook;
use crate::state::{CatalogState, Ledger, ShopState};

/// Everything needed to resume a shop against the same catalog.
///
/// The active customer, random stream position and clock are not captured; a
/// restored shop starts with an empty counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    pub ledger: Ledger,
    #[serde(default)]
    pub unlocked_teas: Vec<String>,
    #[serde(default)]
    pub unlocked_vessels: Vec<String>,
    #[serde(default)]
    pub equipped_vessel: String,
    #[serde(default)]
    pub notebook: Notebook,
}

impl ShopSnapshot {
    #[must_use]
    pub fn capture(state: &ShopState, notebook: &Notebook) -> Self {
        Self {
            ledger: state.ledger.clone(),
            unlocked_teas: state.catalog.unlocked_tea_ids().map(str::to_string).collect(),
            unlocked_vessels: state
                .catalog
                .unlocked_vessel_ids()
                .map(str::to_string)
                .collect(),
            equipped_vessel: state.catalog.equipped_vessel_id().to_string(),
            notebook: notebook.clone(),
        }
    }

    /// Rebuild shop state, dropping ids the catalog does not know.
    #[must_use]
    pub fn rehydrate(&self, catalog: &Catalog) -> ShopState {
        ShopState {
            ledger: self.ledger.clone(),
            catalog: CatalogState::from_saved(
                catalog,
                self.unlocked_teas.iter().map(String::as_str),
                self.unlocked_vessels.iter().map(String::as_str),
                &self.equipped_vessel,
            ),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_and_rehydrate_preserve_flags() {
        let catalog = Catalog::load_default().unwrap();
        let mut state = ShopState::new(&catalog);
        state.ledger.money = 321;
        state.ledger.reputation = -4;
        state.catalog.unlock_tea("gyokuro");
        state.catalog.unlock_vessel("gaiwan");
        state.catalog.set_equipped("gaiwan");

        let snapshot = ShopSnapshot::capture(&state, &Notebook::new());
        let json = snapshot.to_json().unwrap();
        let parsed = ShopSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.rehydrate(&catalog), state);
    }

    #[test]
    fn rehydrate_keeps_base_vessel_and_drops_unknown_ids() {
        let catalog = Catalog::load_default().unwrap();
        let json = r#"{
            "ledger": {"money": 40, "reputation": 2, "day": 3},
            "unlocked_teas": ["sencha", "matcha"],
            "unlocked_vessels": ["teabag"],
            "equipped_vessel": "teabag"
        }"#;
        let snapshot = ShopSnapshot::from_json(json).unwrap();
        let state = snapshot.rehydrate(&catalog);
        assert_eq!(state.ledger.day, 3);
        assert_eq!(state.ledger.customers_served, 0);
        assert!(!state.catalog.is_tea_unlocked("matcha"));
        assert!(state.catalog.is_vessel_unlocked("basic_cup"));
        assert_eq!(state.catalog.equipped_vessel_id(), "basic_cup");
    }
}
