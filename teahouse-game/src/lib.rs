//! Teahouse Game Engine
//!
//! Platform-agnostic core for the Teahouse tea-shop game: customers, brew
//! scoring, foraging, vessels and the brewing notebook.
//! This crate provides all game rules without UI or platform-specific dependencies.

pub mod brew;
pub mod clock;
pub mod constants;
pub mod customer;
pub mod data;
pub mod foraging;
pub mod notebook;
pub mod numbers;
pub mod rng;
pub mod seed;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod vessels;

// Re-export commonly used types
pub use brew::{BrewSubmission, Feedback, QualityTier, VesselBonus, evaluate, grade};
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use constants::{BASE_VESSEL_ID, DEFAULT_TEA_ID};
pub use customer::{ActiveCustomer, CustomerGenerator, Mood, mood_for};
pub use data::{
    Catalog, CatalogError, CustomerArchetype, Dialogue, ForagingLocation, PatienceTier,
    PossibleFind, Preferences, Rarity, Tea, TeaCategory, UnlockRequirement, Vessel,
};
pub use foraging::{
    Finding, Findings, ForagingError, ForagingOutcome, ForagingResolver, LocationStatus,
};
pub use notebook::{
    BrewRecord, BrewSuggestion, CustomerNote, GeneralNote, Notebook, NotebookStats, TeaNotes,
    TeaSummary,
};
pub use rng::{CountingRng, RandomSource, ScriptedRolls, SeededRandom};
pub use seed::{
    ShiftCode, ShiftCodeError, decode_shift_code, encode_shift_code, shift_code_from_entropy,
};
pub use shop::TeaShop;
pub use snapshot::ShopSnapshot;
pub use state::{CatalogState, Ledger, ShopState};
pub use vessels::{VesselError, VesselRegistry};

/// Source of reference data for new shops.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Catalog compiled into the crate from `assets/data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogLoader for EmbeddedCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::load_default()
    }
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait ShopStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a shop snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save_shop(&self, slot: &str, snapshot: &ShopSnapshot) -> Result<(), Self::Error>;

    /// Load a shop snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    fn load_shop(&self, slot: &str) -> Result<Option<ShopSnapshot>, Self::Error>;

    /// Delete a saved shop
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_shop(&self, slot: &str) -> Result<(), Self::Error>;
}

/// Main engine for opening, saving and resuming shops
pub struct ShopEngine<L, S>
where
    L: CatalogLoader,
    S: ShopStorage,
{
    loader: L,
    storage: S,
}

impl<L, S> ShopEngine<L, S>
where
    L: CatalogLoader,
    S: ShopStorage,
{
    /// Create a new engine with the provided catalog loader and storage
    pub const fn new(loader: L, storage: S) -> Self {
        Self { loader, storage }
    }

    /// Open a fresh shop driven by `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn open_shop<C: Clock>(
        &self,
        seed: u64,
        clock: C,
    ) -> Result<TeaShop<SeededRandom, C>, L::Error> {
        let catalog = self.loader.load_catalog()?;
        Ok(TeaShop::seeded(catalog, seed, clock))
    }

    /// Save a shop
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    pub fn save_shop<R, C>(&self, slot: &str, shop: &TeaShop<R, C>) -> Result<(), S::Error>
    where
        R: RandomSource,
        C: Clock,
    {
        self.storage.save_shop(slot, &shop.snapshot())
    }

    /// Load a shop, resuming it on a fresh stream for `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded or the catalog
    /// cannot be rebuilt.
    pub fn load_shop<C: Clock>(
        &self,
        slot: &str,
        seed: u64,
        clock: C,
    ) -> Result<Option<TeaShop<SeededRandom, C>>, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        if let Some(snapshot) = self.storage.load_shop(slot).map_err(Into::into)? {
            // Rehydrate against fresh reference data
            let catalog = self.loader.load_catalog().map_err(Into::into)?;
            let rng = SeededRandom::from_user_seed(seed);
            Ok(Some(TeaShop::restore(catalog, &snapshot, rng, clock)))
        } else {
            Ok(None)
        }
    }

    /// Delete a saved shop
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_shop(&self, slot: &str) -> Result<(), S::Error> {
        self.storage.delete_shop(slot)
    }
}
