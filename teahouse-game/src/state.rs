//! Mutable shop state: the player ledger and catalog unlock flags.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{STARTING_DAY, STARTING_MONEY, STARTING_REPUTATION};
use crate::data::{Catalog, Tea, Vessel};

/// Player money, reputation and service counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub money: i64,
    /// No floor; poor service can push this below zero.
    pub reputation: i64,
    pub day: u32,
    #[serde(default)]
    pub customers_served: u32,
    #[serde(default)]
    pub perfect_brews: u32,
    #[serde(default)]
    pub served_today: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            reputation: STARTING_REPUTATION,
            day: STARTING_DAY,
            customers_served: 0,
            perfect_brews: 0,
            served_today: 0,
        }
    }
}

impl Ledger {
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost as i64
    }

    pub const fn spend(&mut self, cost: u32) {
        self.money -= cost as i64;
    }

    pub const fn credit(&mut self, amount: i64) {
        self.money = self.money.saturating_add(amount);
    }

    pub const fn adjust_reputation(&mut self, delta: i64) {
        self.reputation = self.reputation.saturating_add(delta);
    }

    /// Advance to the next day and reset the daily counter.
    pub const fn close_day(&mut self) {
        self.day = self.day.saturating_add(1);
        self.served_today = 0;
    }
}

/// Unlock flags for teas and vessels plus the equipped vessel.
///
/// Flags only ever move from locked to unlocked; there is no way to re-lock
/// an entry once it has been opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogState {
    unlocked_teas: BTreeSet<String>,
    unlocked_vessels: BTreeSet<String>,
    equipped_vessel: String,
}

impl CatalogState {
    /// Initial flags as shipped in the catalog.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let unlocked_teas = catalog
            .teas()
            .iter()
            .filter(|t| t.unlocked)
            .map(|t| t.id.clone())
            .collect();
        let mut unlocked_vessels: BTreeSet<String> = catalog
            .vessels()
            .iter()
            .filter(|v| v.unlocked)
            .map(|v| v.id.clone())
            .collect();
        let base = catalog.base_vessel().id.clone();
        unlocked_vessels.insert(base.clone());
        Self {
            unlocked_teas,
            unlocked_vessels,
            equipped_vessel: base,
        }
    }

    /// Rebuild flags from persisted id lists, ignoring ids the catalog does
    /// not know and falling back to the base vessel when the equipped id is
    /// unknown or locked.
    #[must_use]
    pub fn from_saved<'a>(
        catalog: &Catalog,
        teas: impl IntoIterator<Item = &'a str>,
        vessels: impl IntoIterator<Item = &'a str>,
        equipped: &str,
    ) -> Self {
        let mut state = Self::from_catalog(catalog);
        for id in teas {
            if catalog.tea(id).is_some() {
                state.unlock_tea(id);
            }
        }
        for id in vessels {
            if catalog.vessel(id).is_some() {
                state.unlock_vessel(id);
            }
        }
        if state.is_vessel_unlocked(equipped) {
            state.equipped_vessel = equipped.to_string();
        }
        state
    }

    #[must_use]
    pub fn is_tea_unlocked(&self, id: &str) -> bool {
        self.unlocked_teas.contains(id)
    }

    /// Unlock a tea, returning `true` when it was previously locked.
    pub fn unlock_tea(&mut self, id: &str) -> bool {
        self.unlocked_teas.insert(id.to_string())
    }

    pub fn unlocked_tea_ids(&self) -> impl Iterator<Item = &str> {
        self.unlocked_teas.iter().map(String::as_str)
    }

    /// Unlocked teas in catalog order.
    #[must_use]
    pub fn unlocked_teas<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Tea> {
        catalog
            .teas()
            .iter()
            .filter(|t| self.is_tea_unlocked(&t.id))
            .collect()
    }

    #[must_use]
    pub fn is_vessel_unlocked(&self, id: &str) -> bool {
        self.unlocked_vessels.contains(id)
    }

    pub(crate) fn unlock_vessel(&mut self, id: &str) -> bool {
        self.unlocked_vessels.insert(id.to_string())
    }

    pub fn unlocked_vessel_ids(&self) -> impl Iterator<Item = &str> {
        self.unlocked_vessels.iter().map(String::as_str)
    }

    #[must_use]
    pub fn equipped_vessel_id(&self) -> &str {
        &self.equipped_vessel
    }

    /// Equipped vessel resolved against the catalog, defaulting to the base
    /// vessel.
    #[must_use]
    pub fn equipped_vessel<'c>(&self, catalog: &'c Catalog) -> &'c Vessel {
        catalog
            .vessel(&self.equipped_vessel)
            .unwrap_or_else(|| catalog.base_vessel())
    }

    pub(crate) fn set_equipped(&mut self, id: &str) {
        self.equipped_vessel = id.to_string();
    }
}

/// Everything a shop mutates besides the notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    pub ledger: Ledger,
    pub catalog: CatalogState,
}

impl ShopState {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            ledger: Ledger::default(),
            catalog: CatalogState::from_catalog(catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load_default().unwrap()
    }

    #[test]
    fn ledger_starts_with_reference_values() {
        let ledger = Ledger::default();
        assert_eq!(ledger.money, 100);
        assert_eq!(ledger.reputation, 0);
        assert_eq!(ledger.day, 1);
        assert_eq!(ledger.customers_served, 0);
    }

    #[test]
    fn reputation_can_go_negative() {
        let mut ledger = Ledger::default();
        ledger.adjust_reputation(-5);
        assert_eq!(ledger.reputation, -5);
    }

    #[test]
    fn close_day_advances_and_resets_daily_count() {
        let mut ledger = Ledger {
            served_today: 4,
            ..Ledger::default()
        };
        ledger.close_day();
        assert_eq!(ledger.day, 2);
        assert_eq!(ledger.served_today, 0);
    }

    #[test]
    fn initial_flags_follow_catalog() {
        let catalog = catalog();
        let state = CatalogState::from_catalog(&catalog);
        assert!(state.is_tea_unlocked("sencha"));
        assert!(!state.is_tea_unlocked("gyokuro"));
        assert!(state.is_vessel_unlocked("basic_cup"));
        assert!(!state.is_vessel_unlocked("gaiwan"));
        assert_eq!(state.equipped_vessel_id(), "basic_cup");
        let names: Vec<&str> = state
            .unlocked_teas(&catalog)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(names, vec!["sencha", "english_breakfast", "earl_grey"]);
    }

    #[test]
    fn unlock_tea_reports_fresh_unlocks_once() {
        let mut state = CatalogState::from_catalog(&catalog());
        assert!(state.unlock_tea("gyokuro"));
        assert!(!state.unlock_tea("gyokuro"));
        assert!(state.is_tea_unlocked("gyokuro"));
    }

    #[test]
    fn from_saved_ignores_unknown_ids_and_bad_equip() {
        let catalog = catalog();
        let state = CatalogState::from_saved(
            &catalog,
            ["gyokuro", "matcha"],
            ["ceramic_pot", "teabag"],
            "gaiwan",
        );
        assert!(state.is_tea_unlocked("gyokuro"));
        assert!(!state.is_tea_unlocked("matcha"));
        assert!(state.is_vessel_unlocked("ceramic_pot"));
        assert!(!state.is_vessel_unlocked("teabag"));
        assert!(state.is_vessel_unlocked("basic_cup"));
        assert_eq!(state.equipped_vessel_id(), "basic_cup");

        let equipped = CatalogState::from_saved(&catalog, [], ["ceramic_pot"], "ceramic_pot");
        assert_eq!(equipped.equipped_vessel(&catalog).id, "ceramic_pot");
    }
}
