//! Static reference data: teas, customer archetypes, vessels and foraging
//! locations.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::constants::{
    BASE_VESSEL_ID, DEFAULT_TEA_ID, PATIENCE_FALLBACK_SECS, PATIENCE_HIGH_SECS, PATIENCE_LOW_SECS,
    PATIENCE_MEDIUM_SECS,
};

const TEAS_JSON: &str = include_str!("../assets/data/teas.json");
const CUSTOMERS_JSON: &str = include_str!("../assets/data/customers.json");
const VESSELS_JSON: &str = include_str!("../assets/data/vessels.json");
const LOCATIONS_JSON: &str = include_str!("../assets/data/locations.json");

/// Tea category tag used by customer taste filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeaCategory {
    Green,
    White,
    Oolong,
    Black,
    #[serde(rename = "Pu-erh")]
    PuErh,
    #[serde(rename = "Scented Green")]
    ScentedGreen,
}

impl TeaCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::White => "White",
            Self::Oolong => "Oolong",
            Self::Black => "Black",
            Self::PuErh => "Pu-erh",
            Self::ScentedGreen => "Scented Green",
        }
    }
}

impl fmt::Display for TeaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// A tea the shop can brew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tea {
    pub id: String,
    pub name: String,
    pub category: TeaCategory,
    #[serde(default)]
    pub description: String,
    /// Ideal brew temperature in °C
    pub ideal_temp: i32,
    pub temp_range: (i32, i32),
    /// Ideal steep time in seconds
    pub ideal_steep: u32,
    pub steep_range: (u32, u32),
    pub rarity: Rarity,
    pub price: u32,
    /// Whether the tea is available before any foraging
    #[serde(default)]
    pub unlocked: bool,
    /// `starter` or the id of the location where it grows
    #[serde(default)]
    pub discovery: String,
}

/// How long an archetype is willing to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatienceTier {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unrecognized,
}

impl PatienceTier {
    /// Patience budget in seconds.
    #[must_use]
    pub const fn budget_secs(self) -> u32 {
        match self {
            Self::Low => PATIENCE_LOW_SECS,
            Self::Medium => PATIENCE_MEDIUM_SECS,
            Self::High => PATIENCE_HIGH_SECS,
            Self::Unrecognized => PATIENCE_FALLBACK_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub types: Vec<TeaCategory>,
    /// Inclusive price window
    pub price_range: (u32, u32),
    pub patience: PatienceTier,
}

impl Preferences {
    /// True when `tea` passes the category and price filter.
    #[must_use]
    pub fn accepts(&self, tea: &Tea) -> bool {
        let (min, max) = self.price_range;
        self.types.contains(&tea.category) && (min..=max).contains(&tea.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub greeting: Vec<String>,
    pub satisfied: Vec<String>,
    pub dissatisfied: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerArchetype {
    pub id: String,
    pub name_pool: Vec<String>,
    pub preferences: Preferences,
    pub dialogue: Dialogue,
}

/// A brewing vessel and the tolerance bonuses it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    /// Added to every temperature tolerance
    #[serde(default)]
    pub quality_bonus: u32,
    /// Added to every steep-time tolerance
    #[serde(default)]
    pub time_bonus: u32,
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    pub reputation: i64,
}

/// One independent roll on a foraging trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PossibleFind {
    Tea { tea: String, chance: f64 },
    Coins { amount: i64, chance: f64 },
    Reputation { amount: i64, chance: f64 },
}

impl PossibleFind {
    #[must_use]
    pub fn chance(&self) -> f64 {
        match self {
            Self::Tea { chance, .. } | Self::Coins { chance, .. } | Self::Reputation { chance, .. } => {
                *chance
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForagingLocation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    pub time_required: u32,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub unlock_requirement: Option<UnlockRequirement>,
    pub possible_finds: Vec<PossibleFind>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {section} data: {source}")]
    Parse {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate {section} id `{id}`")]
    DuplicateId { section: &'static str, id: String },
    #[error("{section} `{id}` has an empty {pool} pool")]
    EmptyPool {
        section: &'static str,
        id: String,
        pool: &'static str,
    },
    #[error("catalog has no {0}")]
    Empty(&'static str),
    #[error("required {section} `{id}` is missing")]
    MissingAnchor { section: &'static str, id: &'static str },
    #[error("base vessel `{0}` must start unlocked with no bonus")]
    InvalidBaseVessel(String),
    #[error("location `{location}` references unknown tea `{tea}`")]
    UnknownFindTea { location: String, tea: String },
    #[error("location `{location}` has a find chance {chance} outside [0, 1]")]
    InvalidChance { location: String, chance: f64 },
}

/// Validated reference data for one shop.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    teas: Vec<Tea>,
    archetypes: Vec<CustomerArchetype>,
    vessels: Vec<Vessel>,
    locations: Vec<ForagingLocation>,
    default_tea: usize,
    base_vessel: usize,
}

impl Catalog {
    /// Build a catalog from already-parsed records.
    ///
    /// # Errors
    ///
    /// Returns an error when ids repeat, pools are empty, the default tea or
    /// base vessel is missing, or a foraging find points at an unknown tea.
    pub fn new(
        teas: Vec<Tea>,
        archetypes: Vec<CustomerArchetype>,
        vessels: Vec<Vessel>,
        locations: Vec<ForagingLocation>,
    ) -> Result<Self, CatalogError> {
        ensure_unique("tea", teas.iter().map(|t| t.id.as_str()))?;
        ensure_unique("archetype", archetypes.iter().map(|a| a.id.as_str()))?;
        ensure_unique("vessel", vessels.iter().map(|v| v.id.as_str()))?;
        ensure_unique("location", locations.iter().map(|l| l.id.as_str()))?;

        if archetypes.is_empty() {
            return Err(CatalogError::Empty("customer archetypes"));
        }
        for archetype in &archetypes {
            let pools = [
                ("name", archetype.name_pool.len()),
                ("greeting", archetype.dialogue.greeting.len()),
                ("satisfied", archetype.dialogue.satisfied.len()),
                ("dissatisfied", archetype.dialogue.dissatisfied.len()),
            ];
            for (pool, len) in pools {
                if len == 0 {
                    return Err(CatalogError::EmptyPool {
                        section: "archetype",
                        id: archetype.id.clone(),
                        pool,
                    });
                }
            }
        }

        let default_tea = teas
            .iter()
            .position(|t| t.id == DEFAULT_TEA_ID)
            .ok_or(CatalogError::MissingAnchor {
                section: "tea",
                id: DEFAULT_TEA_ID,
            })?;
        let base_vessel = vessels
            .iter()
            .position(|v| v.id == BASE_VESSEL_ID)
            .ok_or(CatalogError::MissingAnchor {
                section: "vessel",
                id: BASE_VESSEL_ID,
            })?;
        let base = &vessels[base_vessel];
        if !base.unlocked || base.quality_bonus != 0 || base.time_bonus != 0 {
            return Err(CatalogError::InvalidBaseVessel(base.id.clone()));
        }

        for location in &locations {
            for find in &location.possible_finds {
                let chance = find.chance();
                if !(0.0..=1.0).contains(&chance) {
                    return Err(CatalogError::InvalidChance {
                        location: location.id.clone(),
                        chance,
                    });
                }
                if let PossibleFind::Tea { tea, .. } = find
                    && !teas.iter().any(|t| &t.id == tea)
                {
                    return Err(CatalogError::UnknownFindTea {
                        location: location.id.clone(),
                        tea: tea.clone(),
                    });
                }
            }
        }

        Ok(Self {
            teas,
            archetypes,
            vessels,
            locations,
            default_tea,
            base_vessel,
        })
    }

    /// Parse and validate a catalog from its four JSON documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any document fails to parse or validate.
    pub fn from_json(
        teas: &str,
        customers: &str,
        vessels: &str,
        locations: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(
            parse_section("tea", teas)?,
            parse_section("customer", customers)?,
            parse_section("vessel", vessels)?,
            parse_section("location", locations)?,
        )
    }

    /// Load the catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded assets are malformed.
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::from_json(TEAS_JSON, CUSTOMERS_JSON, VESSELS_JSON, LOCATIONS_JSON)
    }

    #[must_use]
    pub fn teas(&self) -> &[Tea] {
        &self.teas
    }

    #[must_use]
    pub fn archetypes(&self) -> &[CustomerArchetype] {
        &self.archetypes
    }

    #[must_use]
    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    #[must_use]
    pub fn locations(&self) -> &[ForagingLocation] {
        &self.locations
    }

    #[must_use]
    pub fn tea(&self, id: &str) -> Option<&Tea> {
        self.teas.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn archetype(&self, id: &str) -> Option<&CustomerArchetype> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn vessel(&self, id: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn location(&self, id: &str) -> Option<&ForagingLocation> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Tea requested when nothing else fits.
    #[must_use]
    pub fn default_tea(&self) -> &Tea {
        &self.teas[self.default_tea]
    }

    /// Vessel every shop starts with.
    #[must_use]
    pub fn base_vessel(&self) -> &Vessel {
        &self.vessels[self.base_vessel]
    }
}

fn parse_section<T>(section: &'static str, json: &str) -> Result<Vec<T>, CatalogError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json).map_err(|source| CatalogError::Parse { section, source })
}

fn ensure_unique<'a>(
    section: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
