//! Vessel ownership, equipping and the active tolerance bonus.
use log::{debug, warn};
use thiserror::Error;

use crate::brew::VesselBonus;
use crate::data::{Catalog, Vessel};
use crate::state::ShopState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VesselError {
    #[error("unknown vessel `{0}`")]
    UnknownVessel(String),
    #[error("vessel `{0}` is already owned")]
    AlreadyOwned(String),
    #[error("vessel `{0}` has not been purchased")]
    NotOwned(String),
    #[error("vessel `{id}` costs {cost} but only {available} is available")]
    InsufficientFunds { id: String, cost: u32, available: i64 },
}

/// Whether `id` exists, is still locked and is affordable.
#[must_use]
pub fn can_purchase(catalog: &Catalog, state: &ShopState, id: &str) -> bool {
    catalog.vessel(id).is_some_and(|vessel| {
        !state.catalog.is_vessel_unlocked(id) && state.ledger.can_afford(vessel.cost)
    })
}

/// Vessels whose ownership matches `owned`, in catalog order.
#[must_use]
pub fn vessels_by_ownership<'c>(
    catalog: &'c Catalog,
    state: &ShopState,
    owned: bool,
) -> Vec<&'c Vessel> {
    catalog
        .vessels()
        .iter()
        .filter(|v| state.catalog.is_vessel_unlocked(&v.id) == owned)
        .collect()
}

/// Mutating view over the vessel flags of a shop.
pub struct VesselRegistry<'c, 's> {
    catalog: &'c Catalog,
    state: &'s mut ShopState,
}

impl<'c, 's> VesselRegistry<'c, 's> {
    pub const fn new(catalog: &'c Catalog, state: &'s mut ShopState) -> Self {
        Self { catalog, state }
    }

    #[must_use]
    pub fn can_purchase(&self, id: &str) -> bool {
        can_purchase(self.catalog, self.state, id)
    }

    /// Buy, unlock and equip a vessel.
    ///
    /// # Errors
    ///
    /// Returns an error when the vessel is unknown, already owned or
    /// unaffordable. Nothing is mutated on failure.
    pub fn purchase(&mut self, id: &str) -> Result<&'c Vessel, VesselError> {
        let catalog = self.catalog;
        let Some(vessel) = catalog.vessel(id) else {
            warn!("purchase refused: unknown vessel {id}");
            return Err(VesselError::UnknownVessel(id.to_string()));
        };
        if self.state.catalog.is_vessel_unlocked(id) {
            warn!("purchase refused: {id} already owned");
            return Err(VesselError::AlreadyOwned(id.to_string()));
        }
        if !self.state.ledger.can_afford(vessel.cost) {
            warn!(
                "purchase refused: {id} costs {} with {} on hand",
                vessel.cost, self.state.ledger.money
            );
            return Err(VesselError::InsufficientFunds {
                id: id.to_string(),
                cost: vessel.cost,
                available: self.state.ledger.money,
            });
        }

        self.state.ledger.spend(vessel.cost);
        self.state.catalog.unlock_vessel(id);
        self.state.catalog.set_equipped(id);
        debug!("purchased and equipped {id} for {}", vessel.cost);
        Ok(vessel)
    }

    /// Equip an owned vessel.
    ///
    /// # Errors
    ///
    /// Returns an error when the vessel is unknown or not owned.
    pub fn equip(&mut self, id: &str) -> Result<&'c Vessel, VesselError> {
        let catalog = self.catalog;
        let Some(vessel) = catalog.vessel(id) else {
            return Err(VesselError::UnknownVessel(id.to_string()));
        };
        if !self.state.catalog.is_vessel_unlocked(id) {
            warn!("equip refused: {id} not owned");
            return Err(VesselError::NotOwned(id.to_string()));
        }
        self.state.catalog.set_equipped(id);
        Ok(vessel)
    }

    #[must_use]
    pub fn current_vessel(&self) -> &'c Vessel {
        self.state.catalog.equipped_vessel(self.catalog)
    }

    #[must_use]
    pub fn active_bonus(&self) -> VesselBonus {
        VesselBonus::from(self.current_vessel())
    }

    /// Owned vessels in catalog order.
    #[must_use]
    pub fn unlocked_vessels(&self) -> Vec<&'c Vessel> {
        vessels_by_ownership(self.catalog, self.state, true)
    }

    /// Vessels still for sale, in catalog order.
    #[must_use]
    pub fn locked_vessels(&self) -> Vec<&'c Vessel> {
        vessels_by_ownership(self.catalog, self.state, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Catalog, ShopState) {
        let catalog = Catalog::load_default().unwrap();
        let state = ShopState::new(&catalog);
        (catalog, state)
    }

    #[test]
    fn base_vessel_is_equipped_with_no_bonus() {
        let (catalog, mut state) = setup();
        let registry = VesselRegistry::new(&catalog, &mut state);
        assert_eq!(registry.current_vessel().id, "basic_cup");
        assert_eq!(registry.active_bonus(), VesselBonus::default());
        assert_eq!(registry.unlocked_vessels().len(), 1);
        assert_eq!(registry.locked_vessels().len(), 6);
    }

    #[test]
    fn purchase_unlocks_equips_and_charges() {
        let (catalog, mut state) = setup();
        state.ledger.money = 200;
        let mut registry = VesselRegistry::new(&catalog, &mut state);
        assert!(registry.can_purchase("ceramic_pot"));
        let vessel = registry.purchase("ceramic_pot").unwrap();
        assert_eq!(vessel.id, "ceramic_pot");
        assert_eq!(
            registry.active_bonus(),
            VesselBonus {
                quality: 5,
                time: 5
            }
        );
        assert!(!registry.can_purchase("ceramic_pot"));
        assert_eq!(state.ledger.money, 50);
        assert!(state.catalog.is_vessel_unlocked("ceramic_pot"));
        assert_eq!(state.catalog.equipped_vessel_id(), "ceramic_pot");
    }

    #[test]
    fn purchase_failures_leave_state_untouched() {
        let (catalog, mut state) = setup();
        let before = state.clone();
        let mut registry = VesselRegistry::new(&catalog, &mut state);
        assert_eq!(
            registry.purchase("teabag"),
            Err(VesselError::UnknownVessel("teabag".to_string()))
        );
        assert_eq!(
            registry.purchase("basic_cup"),
            Err(VesselError::AlreadyOwned("basic_cup".to_string()))
        );
        assert!(matches!(
            registry.purchase("silver_pot"),
            Err(VesselError::InsufficientFunds { cost: 1000, .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn equip_only_moves_the_pointer() {
        let (catalog, mut state) = setup();
        state.ledger.money = 1_000;
        let mut registry = VesselRegistry::new(&catalog, &mut state);
        registry.purchase("ceramic_pot").unwrap();
        registry.purchase("glass_teapot").unwrap();
        let tea_flags: Vec<String> = state.catalog.unlocked_tea_ids().map(str::to_string).collect();
        let money = state.ledger.money;

        let mut registry = VesselRegistry::new(&catalog, &mut state);
        assert_eq!(registry.equip("basic_cup").unwrap().id, "basic_cup");
        assert_eq!(
            registry.equip("gaiwan"),
            Err(VesselError::NotOwned("gaiwan".to_string()))
        );
        assert_eq!(
            registry.equip("nope"),
            Err(VesselError::UnknownVessel("nope".to_string()))
        );
        assert_eq!(registry.current_vessel().id, "basic_cup");
        assert!(state.catalog.is_vessel_unlocked("ceramic_pot"));
        assert!(state.catalog.is_vessel_unlocked("glass_teapot"));
        assert_eq!(state.ledger.money, money);
        let after: Vec<String> = state.catalog.unlocked_tea_ids().map(str::to_string).collect();
        assert_eq!(tea_flags, after);
    }
}
