//! The shop session: one counter, one ledger, one notebook.
use log::{debug, warn};

use crate::brew::{self, BrewSubmission, Feedback, QualityTier, VesselBonus};
use crate::clock::{Clock, Millis, elapsed_secs};
use crate::customer::{ActiveCustomer, CustomerGenerator, Mood, mood_for};
use crate::data::{Catalog, ForagingLocation, Tea, Vessel};
use crate::foraging::{self, ForagingError, ForagingOutcome, ForagingResolver, LocationStatus};
use crate::notebook::Notebook;
use crate::rng::{RandomSource, SeededRandom};
use crate::snapshot::ShopSnapshot;
use crate::state::{Ledger, ShopState};
use crate::vessels::{self, VesselError, VesselRegistry};

/// Synchronous command/query facade over the whole shop.
///
/// Every command takes `&mut self`; hosts that share a shop across threads
/// must wrap it in a lock.
#[derive(Debug)]
pub struct TeaShop<R, C> {
    catalog: Catalog,
    state: ShopState,
    notebook: Notebook,
    active: Option<ActiveCustomer>,
    rng: R,
    clock: C,
}

impl<C: Clock> TeaShop<SeededRandom, C> {
    /// Fresh shop driven by the seeded stream for `seed`.
    #[must_use]
    pub fn seeded(catalog: Catalog, seed: u64, clock: C) -> Self {
        Self::new(catalog, SeededRandom::from_user_seed(seed), clock)
    }
}

impl<R: RandomSource, C: Clock> TeaShop<R, C> {
    #[must_use]
    pub fn new(catalog: Catalog, rng: R, clock: C) -> Self {
        let state = ShopState::new(&catalog);
        Self {
            catalog,
            state,
            notebook: Notebook::new(),
            active: None,
            rng,
            clock,
        }
    }

    /// Resume a shop from a snapshot. Unknown ids are dropped and the counter
    /// starts empty.
    #[must_use]
    pub fn restore(catalog: Catalog, snapshot: &ShopSnapshot, rng: R, clock: C) -> Self {
        let state = snapshot.rehydrate(&catalog);
        Self {
            catalog,
            state,
            notebook: snapshot.notebook.clone(),
            active: None,
            rng,
            clock,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ShopSnapshot {
        ShopSnapshot::capture(&self.state, &self.notebook)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    #[must_use]
    pub const fn state(&self) -> &ShopState {
        &self.state
    }

    #[must_use]
    pub const fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    // Customers ---------------------------------------------------------------

    #[must_use]
    pub const fn active_customer(&self) -> Option<&ActiveCustomer> {
        self.active.as_ref()
    }

    /// Welcome the next customer, replacing whoever is at the counter.
    pub fn generate_customer(&mut self) -> &ActiveCustomer {
        let now = self.now();
        let customer =
            CustomerGenerator::new(&self.catalog, &self.state.catalog).generate(&mut self.rng, now);
        self.active.insert(customer)
    }

    /// Seconds the current customer has been waiting.
    #[must_use]
    pub fn elapsed_wait_secs(&self) -> Option<f64> {
        self.active
            .as_ref()
            .map(|customer| elapsed_secs(customer.arrived_at, self.now()))
    }

    /// Mood of the current customer; `Waiting` when the counter is empty.
    #[must_use]
    pub fn mood(&self) -> Mood {
        self.active.as_ref().map_or(Mood::Waiting, |customer| {
            mood_for(
                elapsed_secs(customer.arrived_at, self.now()),
                customer.patience_secs,
            )
        })
    }

    /// Serve a brew using the equipped vessel.
    ///
    /// Returns `None` when nobody is waiting or the customer has already been
    /// served.
    pub fn evaluate_service(
        &mut self,
        tea_id: &str,
        temperature: i32,
        steep_seconds: u32,
    ) -> Option<Feedback> {
        let bonus = VesselBonus::from(self.current_vessel());
        self.serve(BrewSubmission::new(tea_id, temperature, steep_seconds), bonus)
    }

    /// Serve a brew with an explicit vessel, or no bonus when `vessel` is
    /// `None`.
    pub fn evaluate_service_with(
        &mut self,
        tea_id: &str,
        temperature: i32,
        steep_seconds: u32,
        vessel: Option<&Vessel>,
    ) -> Option<Feedback> {
        let bonus = vessel.map(VesselBonus::from).unwrap_or_default();
        self.serve(BrewSubmission::new(tea_id, temperature, steep_seconds), bonus)
    }

    fn serve(&mut self, submission: BrewSubmission, bonus: VesselBonus) -> Option<Feedback> {
        let now = self.now();
        let Some(customer) = self.active.as_mut().filter(|c| !c.served) else {
            warn!("brew of {} served with nobody waiting", submission.tea_id);
            return None;
        };
        let waited = elapsed_secs(customer.arrived_at, now);
        let feedback = brew::evaluate(customer, &submission, waited, bonus, &mut self.rng);
        customer.served = true;

        let ledger = &mut self.state.ledger;
        ledger.credit(i64::from(feedback.payment));
        ledger.adjust_reputation(feedback.reputation_delta);
        ledger.customers_served = ledger.customers_served.saturating_add(1);
        if feedback.tier == QualityTier::Perfect {
            ledger.perfect_brews = ledger.perfect_brews.saturating_add(1);
        }

        let tea_name = self
            .catalog
            .tea(&submission.tea_id)
            .map_or(submission.tea_id.as_str(), |tea| tea.name.as_str());
        self.notebook.record_brew(
            &submission.tea_id,
            tea_name,
            submission.temperature,
            submission.steep_seconds,
            feedback.tier,
            &customer.name,
            now,
        );
        self.notebook.add_customer_note(
            &customer.name,
            &customer.archetype,
            tea_name,
            feedback.tier,
            "",
            now,
        );
        if feedback.tier != QualityTier::WrongTea {
            self.notebook.update_tea_stats(
                &submission.tea_id,
                tea_name,
                submission.temperature,
                submission.steep_seconds,
                feedback.tier,
            );
        }
        Some(feedback)
    }

    /// Clear the counter. Counts toward the day's total only when someone was
    /// waiting.
    pub fn dismiss_customer(&mut self) {
        if let Some(customer) = self.active.take() {
            let ledger = &mut self.state.ledger;
            ledger.served_today = ledger.served_today.saturating_add(1);
            debug!("{} left the counter", customer.name);
        }
    }

    // Foraging ----------------------------------------------------------------

    #[must_use]
    pub fn can_access_location(&self, id: &str) -> bool {
        foraging::can_access(&self.catalog, &self.state, id)
    }

    #[must_use]
    pub fn location_status(&self, id: &str) -> LocationStatus {
        foraging::location_status(&self.catalog, &self.state, id)
    }

    #[must_use]
    pub fn accessible_locations(&self) -> Vec<&ForagingLocation> {
        foraging::accessible_locations(&self.catalog, &self.state)
    }

    /// Pay for and resolve a foraging trip.
    ///
    /// # Errors
    ///
    /// Returns an error when the location is unknown, locked or unaffordable.
    pub fn start_foraging(&mut self, id: &str) -> Result<ForagingOutcome, ForagingError> {
        ForagingResolver::new(&self.catalog, &mut self.state).attempt(id, &mut self.rng)
    }

    // Vessels -----------------------------------------------------------------

    /// Buy, unlock and equip a vessel.
    ///
    /// # Errors
    ///
    /// Returns an error when the vessel is unknown, owned or unaffordable.
    pub fn purchase_vessel(&mut self, id: &str) -> Result<&Vessel, VesselError> {
        VesselRegistry::new(&self.catalog, &mut self.state).purchase(id)
    }

    /// Equip an owned vessel.
    ///
    /// # Errors
    ///
    /// Returns an error when the vessel is unknown or not owned.
    pub fn equip_vessel(&mut self, id: &str) -> Result<&Vessel, VesselError> {
        VesselRegistry::new(&self.catalog, &mut self.state).equip(id)
    }

    #[must_use]
    pub fn current_vessel(&self) -> &Vessel {
        self.state.catalog.equipped_vessel(&self.catalog)
    }

    #[must_use]
    pub fn can_purchase_vessel(&self, id: &str) -> bool {
        vessels::can_purchase(&self.catalog, &self.state, id)
    }

    #[must_use]
    pub fn unlocked_vessels(&self) -> Vec<&Vessel> {
        vessels::vessels_by_ownership(&self.catalog, &self.state, true)
    }

    /// Vessels still for sale, in catalog order.
    #[must_use]
    pub fn locked_vessels(&self) -> Vec<&Vessel> {
        vessels::vessels_by_ownership(&self.catalog, &self.state, false)
    }

    // Teas and notes ----------------------------------------------------------

    #[must_use]
    pub fn unlocked_teas(&self) -> Vec<&Tea> {
        self.state.catalog.unlocked_teas(&self.catalog)
    }

    pub fn add_general_note(&mut self, text: &str, category: &str) {
        let now = self.now();
        self.notebook.add_general_note(text, category, now);
    }

    pub fn delete_general_note(&mut self, index: usize) {
        self.notebook.delete_general_note(index);
    }

    pub fn add_tea_note(&mut self, tea_id: &str, text: &str) {
        let now = self.now();
        let name = self
            .catalog
            .tea(tea_id)
            .map_or(tea_id, |tea| tea.name.as_str());
        self.notebook.add_tea_note(tea_id, name, text, now);
    }

    pub fn clear_notebook(&mut self) {
        self.notebook.clear();
    }

    /// End the day: advance the counter and send any waiting customer away.
    pub fn close_day(&mut self) {
        self.active = None;
        self.state.ledger.close_day();
        debug!("closing day, now day {}", self.state.ledger.day);
    }
}
