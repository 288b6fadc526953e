//! Customer generation and patience mood.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::constants::{MOOD_IMPATIENT_FRACTION, MOOD_PATIENT_FRACTION, MOOD_WAITING_FRACTION};
use crate::data::{Catalog, Dialogue, Tea};
use crate::rng::{RandomSource, pick};
use crate::state::CatalogState;

/// The customer currently waiting at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCustomer {
    pub name: String,
    /// Archetype id the customer was drawn from
    pub archetype: String,
    pub greeting: String,
    /// Tea parameters captured at arrival
    pub requested_tea: Tea,
    pub dialogue: Dialogue,
    pub patience_secs: u32,
    pub arrived_at: Millis,
    /// Set once a brew has been evaluated for this customer
    #[serde(default)]
    pub served: bool,
}

impl ActiveCustomer {
    #[must_use]
    pub fn requested_tea_id(&self) -> &str {
        &self.requested_tea.id
    }
}

/// Draws customers from the catalog, honoring the current unlock flags.
pub struct CustomerGenerator<'a> {
    catalog: &'a Catalog,
    state: &'a CatalogState,
}

impl<'a> CustomerGenerator<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog, state: &'a CatalogState) -> Self {
        Self { catalog, state }
    }

    /// Unlocked teas an archetype would order, in catalog order.
    #[must_use]
    pub fn candidates(&self, archetype_id: &str) -> Vec<&'a Tea> {
        let Some(archetype) = self.catalog.archetype(archetype_id) else {
            return Vec::new();
        };
        self.state
            .unlocked_teas(self.catalog)
            .into_iter()
            .filter(|tea| archetype.preferences.accepts(tea))
            .collect()
    }

    /// Generate the next customer.
    ///
    /// Draw order is archetype, name, greeting and then the requested tea.
    /// The tea draw only happens when at least one candidate exists;
    /// otherwise the default tea is requested without consuming a roll.
    pub fn generate<R>(&self, rng: &mut R, now: Millis) -> ActiveCustomer
    where
        R: RandomSource + ?Sized,
    {
        let archetypes = self.catalog.archetypes();
        let archetype = &archetypes[rng.pick_index(archetypes.len())];
        let name = pick(&archetype.name_pool, rng).cloned().unwrap_or_default();
        let greeting = pick(&archetype.dialogue.greeting, rng)
            .cloned()
            .unwrap_or_default();

        let candidates = self.candidates(&archetype.id);
        let requested = pick(&candidates, rng)
            .copied()
            .unwrap_or_else(|| self.catalog.default_tea());

        let patience_secs = archetype.preferences.patience.budget_secs();
        debug!(
            "customer {name} ({}) orders {} with {patience_secs}s patience",
            archetype.id, requested.id
        );

        ActiveCustomer {
            name,
            archetype: archetype.id.clone(),
            greeting,
            requested_tea: requested.clone(),
            dialogue: archetype.dialogue.clone(),
            patience_secs,
            arrived_at: now,
            served: false,
        }
    }
}

/// How a waiting customer feels about the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Patient,
    Waiting,
    Impatient,
    VeryImpatient,
}

impl Mood {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Waiting => "waiting",
            Self::Impatient => "impatient",
            Self::VeryImpatient => "very_impatient",
        }
    }
}

/// Mood after `elapsed_secs` of waiting against a `patience_secs` budget.
#[must_use]
pub fn mood_for(elapsed_secs: f64, patience_secs: u32) -> Mood {
    let patience = f64::from(patience_secs);
    if elapsed_secs < patience * MOOD_PATIENT_FRACTION {
        Mood::Patient
    } else if elapsed_secs < patience * MOOD_WAITING_FRACTION {
        Mood::Waiting
    } else if elapsed_secs < patience * MOOD_IMPATIENT_FRACTION {
        Mood::Impatient
    } else {
        Mood::VeryImpatient
    }
}
