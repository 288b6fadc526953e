//! Foraging trips: access checks and independent find rolls.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::constants::{CONSOLATION_COINS_MIN, CONSOLATION_COINS_SPAN};
use crate::data::{Catalog, ForagingLocation, PossibleFind};
use crate::rng::RandomSource;
use crate::state::{Ledger, ShopState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForagingError {
    #[error("unknown foraging location `{0}`")]
    UnknownLocation(String),
    #[error("location `{id}` is locked")]
    Locked { id: String, required: Option<i64> },
    #[error("location `{id}` costs {cost} but only {available} is available")]
    InsufficientFunds { id: String, cost: u32, available: i64 },
}

/// Access summary for a location, as shown on a foraging map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Available,
    TooExpensive,
    Locked,
    Unknown,
}

/// One thing that turned up on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Tea {
        tea_id: String,
        tea_name: String,
        /// False when the tea was already unlocked
        is_new: bool,
    },
    Coins {
        amount: i64,
        /// Granted because no listed find fired
        #[serde(default)]
        consolation: bool,
    },
    Reputation {
        amount: i64,
    },
}

impl Finding {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Tea {
                tea_name,
                is_new: true,
                ..
            } => format!("Discovered new tea: {tea_name}!"),
            Self::Tea { tea_name, .. } => format!("Found {tea_name}"),
            Self::Coins {
                amount,
                consolation: true,
            } => format!("Found {amount} coins."),
            Self::Coins { amount, .. } => format!("Found {amount} coins!"),
            Self::Reputation { amount } => {
                format!("Met a tea master! Gained {amount} reputation!")
            }
        }
    }
}

pub type Findings = SmallVec<[Finding; 4]>;

/// Result of a completed trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForagingOutcome {
    pub location: ForagingLocation,
    pub findings: Findings,
}

impl ForagingOutcome {
    /// Ids of teas unlocked for the first time on this trip.
    pub fn new_teas(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().filter_map(|finding| match finding {
            Finding::Tea {
                tea_id,
                is_new: true,
                ..
            } => Some(tea_id.as_str()),
            _ => None,
        })
    }
}

/// Lock check only. A location the catalog ships unlocked always passes; a
/// locked one passes only when it names a reputation threshold that the
/// player has reached.
fn passes_lock(location: &ForagingLocation, ledger: &Ledger) -> bool {
    location.unlocked
        || location
            .unlock_requirement
            .is_some_and(|req| ledger.reputation >= req.reputation)
}

#[must_use]
pub fn can_access(catalog: &Catalog, state: &ShopState, id: &str) -> bool {
    location_status(catalog, state, id) == LocationStatus::Available
}

#[must_use]
pub fn location_status(catalog: &Catalog, state: &ShopState, id: &str) -> LocationStatus {
    match catalog.location(id) {
        None => LocationStatus::Unknown,
        Some(location) if !passes_lock(location, &state.ledger) => LocationStatus::Locked,
        Some(location) if !state.ledger.can_afford(location.cost) => LocationStatus::TooExpensive,
        Some(_) => LocationStatus::Available,
    }
}

/// Locations whose lock check passes, regardless of cost.
#[must_use]
pub fn accessible_locations<'c>(
    catalog: &'c Catalog,
    state: &ShopState,
) -> Vec<&'c ForagingLocation> {
    catalog
        .locations()
        .iter()
        .filter(|location| passes_lock(location, &state.ledger))
        .collect()
}

/// Resolves foraging trips against a shop's ledger and unlock flags.
pub struct ForagingResolver<'c, 's> {
    catalog: &'c Catalog,
    state: &'s mut ShopState,
}

impl<'c, 's> ForagingResolver<'c, 's> {
    pub const fn new(catalog: &'c Catalog, state: &'s mut ShopState) -> Self {
        Self { catalog, state }
    }

    #[must_use]
    pub fn can_access(&self, id: &str) -> bool {
        can_access(self.catalog, self.state, id)
    }

    #[must_use]
    pub fn location_status(&self, id: &str) -> LocationStatus {
        location_status(self.catalog, self.state, id)
    }

    #[must_use]
    pub fn accessible_locations(&self) -> Vec<&'c ForagingLocation> {
        accessible_locations(self.catalog, self.state)
    }

    /// Pay for a trip and roll every listed find independently.
    ///
    /// # Errors
    ///
    /// Returns an error when the location is unknown, locked or unaffordable.
    /// Refused trips leave the shop untouched.
    pub fn attempt<R>(&mut self, id: &str, rng: &mut R) -> Result<ForagingOutcome, ForagingError>
    where
        R: RandomSource + ?Sized,
    {
        let catalog = self.catalog;
        let Some(location) = catalog.location(id) else {
            warn!("foraging refused: unknown location {id}");
            return Err(ForagingError::UnknownLocation(id.to_string()));
        };
        if !passes_lock(location, &self.state.ledger) {
            warn!("foraging refused: {id} is locked");
            return Err(ForagingError::Locked {
                id: id.to_string(),
                required: location.unlock_requirement.map(|req| req.reputation),
            });
        }
        let ledger = &mut self.state.ledger;
        if !ledger.can_afford(location.cost) {
            warn!(
                "foraging refused: {id} costs {} with {} on hand",
                location.cost, ledger.money
            );
            return Err(ForagingError::InsufficientFunds {
                id: id.to_string(),
                cost: location.cost,
                available: ledger.money,
            });
        }

        ledger.spend(location.cost);
        let mut findings = Findings::new();
        for find in &location.possible_finds {
            let roll = rng.next_unit();
            if roll >= find.chance() {
                continue;
            }
            match find {
                PossibleFind::Tea { tea, .. } => {
                    let Some(entry) = catalog.tea(tea) else {
                        continue;
                    };
                    let is_new = self.state.catalog.unlock_tea(tea);
                    findings.push(Finding::Tea {
                        tea_id: entry.id.clone(),
                        tea_name: entry.name.clone(),
                        is_new,
                    });
                }
                PossibleFind::Coins { amount, .. } => {
                    self.state.ledger.credit(*amount);
                    findings.push(Finding::Coins {
                        amount: *amount,
                        consolation: false,
                    });
                }
                PossibleFind::Reputation { amount, .. } => {
                    self.state.ledger.adjust_reputation(*amount);
                    findings.push(Finding::Reputation { amount: *amount });
                }
            }
        }

        if findings.is_empty() {
            let offset = i64::try_from(rng.pick_index(CONSOLATION_COINS_SPAN)).unwrap_or(0);
            let amount = CONSOLATION_COINS_MIN + offset;
            self.state.ledger.credit(amount);
            findings.push(Finding::Coins {
                amount,
                consolation: true,
            });
        }

        debug!(
            "foraged {id} for {}: {} finding(s)",
            location.cost,
            findings.len()
        );
        Ok(ForagingOutcome {
            location: location.clone(),
            findings,
        })
    }
}
