//! Brewing notebook: bounded logs plus per-tea statistics.
//!
//! Every log stores the most recent entry first and evicts from the back once
//! its cap is reached.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::brew::QualityTier;
use crate::clock::Millis;
use crate::constants::{
    BREW_HISTORY_CAP, CUSTOMER_NOTES_CAP, DEFAULT_HISTORY_LIMIT, GENERAL_NOTES_CAP, TOP_TEAS_LIMIT,
};
use crate::numbers::percent_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewRecord {
    pub tea_id: String,
    pub tea_name: String,
    pub temperature: i32,
    pub steep_seconds: u32,
    pub tier: QualityTier,
    pub customer_name: String,
    pub timestamp: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerNote {
    pub customer_name: String,
    pub archetype: String,
    pub tea_served: String,
    pub tier: QualityTier,
    #[serde(default)]
    pub note: String,
    pub timestamp: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralNote {
    pub text: String,
    pub category: String,
    pub timestamp: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaNoteEntry {
    pub text: String,
    pub timestamp: Millis,
}

/// Running record for one tea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaNotes {
    pub tea_name: String,
    #[serde(default)]
    pub notes: Vec<TeaNoteEntry>,
    /// Parameters of the most recent perfect or good brew
    pub best_temp: Option<i32>,
    pub best_steep: Option<u32>,
    pub successful_brews: u32,
    pub total_brews: u32,
}

impl TeaNotes {
    fn new(tea_name: &str) -> Self {
        Self {
            tea_name: tea_name.to_string(),
            notes: Vec::new(),
            best_temp: None,
            best_steep: None,
            successful_brews: 0,
            total_brews: 0,
        }
    }

    #[must_use]
    pub fn success_rate(&self) -> f64 {
        percent_of(self.successful_brews, self.total_brews)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeaSummary {
    pub name: String,
    pub total_brews: u32,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookStats {
    pub total_brews: u32,
    pub perfect_brews: u32,
    pub good_brews: u32,
    pub success_rate: f64,
    pub top_teas: Vec<TeaSummary>,
}

/// Parameters that worked last time for a tea.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrewSuggestion {
    pub temperature: i32,
    pub steep_seconds: u32,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    tea_notes: BTreeMap<String, TeaNotes>,
    #[serde(default)]
    customer_notes: VecDeque<CustomerNote>,
    #[serde(default)]
    general_notes: VecDeque<GeneralNote>,
    #[serde(default)]
    brewing_history: VecDeque<BrewRecord>,
}

fn push_capped<T>(log: &mut VecDeque<T>, entry: T, cap: usize) {
    log.push_front(entry);
    log.truncate(cap);
}

impl Notebook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tea_entry(&mut self, tea_id: &str, tea_name: &str) -> &mut TeaNotes {
        self.tea_notes
            .entry(tea_id.to_string())
            .or_insert_with(|| TeaNotes::new(tea_name))
    }

    pub fn add_tea_note(&mut self, tea_id: &str, tea_name: &str, text: &str, timestamp: Millis) {
        self.tea_entry(tea_id, tea_name).notes.push(TeaNoteEntry {
            text: text.to_string(),
            timestamp,
        });
    }

    /// Count a brew against a tea, remembering the parameters of successful
    /// ones.
    pub fn update_tea_stats(
        &mut self,
        tea_id: &str,
        tea_name: &str,
        temperature: i32,
        steep_seconds: u32,
        tier: QualityTier,
    ) {
        let notes = self.tea_entry(tea_id, tea_name);
        notes.total_brews = notes.total_brews.saturating_add(1);
        if tier.is_satisfying() {
            notes.successful_brews = notes.successful_brews.saturating_add(1);
            notes.best_temp = Some(temperature);
            notes.best_steep = Some(steep_seconds);
        }
    }

    #[must_use]
    pub fn tea_notes(&self, tea_id: &str) -> Option<&TeaNotes> {
        self.tea_notes.get(tea_id)
    }

    pub fn all_tea_notes(&self) -> impl Iterator<Item = (&str, &TeaNotes)> {
        self.tea_notes.iter().map(|(id, notes)| (id.as_str(), notes))
    }

    pub fn add_customer_note(
        &mut self,
        customer_name: &str,
        archetype: &str,
        tea_served: &str,
        tier: QualityTier,
        note: &str,
        timestamp: Millis,
    ) {
        push_capped(
            &mut self.customer_notes,
            CustomerNote {
                customer_name: customer_name.to_string(),
                archetype: archetype.to_string(),
                tea_served: tea_served.to_string(),
                tier,
                note: note.to_string(),
                timestamp,
            },
            CUSTOMER_NOTES_CAP,
        );
    }

    #[must_use]
    pub const fn customer_notes(&self) -> &VecDeque<CustomerNote> {
        &self.customer_notes
    }

    pub fn add_general_note(&mut self, text: &str, category: &str, timestamp: Millis) {
        push_capped(
            &mut self.general_notes,
            GeneralNote {
                text: text.to_string(),
                category: category.to_string(),
                timestamp,
            },
            GENERAL_NOTES_CAP,
        );
    }

    #[must_use]
    pub const fn general_notes(&self) -> &VecDeque<GeneralNote> {
        &self.general_notes
    }

    /// Remove a general note by position; out-of-range indices are ignored.
    pub fn delete_general_note(&mut self, index: usize) -> Option<GeneralNote> {
        self.general_notes.remove(index)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record_brew(
        &mut self,
        tea_id: &str,
        tea_name: &str,
        temperature: i32,
        steep_seconds: u32,
        tier: QualityTier,
        customer_name: &str,
        timestamp: Millis,
    ) {
        push_capped(
            &mut self.brewing_history,
            BrewRecord {
                tea_id: tea_id.to_string(),
                tea_name: tea_name.to_string(),
                temperature,
                steep_seconds,
                tier,
                customer_name: customer_name.to_string(),
                timestamp,
            },
            BREW_HISTORY_CAP,
        );
    }

    /// Up to `limit` brews, most recent first. `None` uses the default page
    /// size.
    #[must_use]
    pub fn brewing_history(&self, limit: Option<usize>) -> Vec<&BrewRecord> {
        self.brewing_history
            .iter()
            .take(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .collect()
    }

    #[must_use]
    pub fn statistics(&self) -> NotebookStats {
        let count = |tier: QualityTier| {
            let hits = self.brewing_history.iter().filter(|b| b.tier == tier).count();
            u32::try_from(hits).unwrap_or(u32::MAX)
        };
        let total_brews = u32::try_from(self.brewing_history.len()).unwrap_or(u32::MAX);
        let perfect_brews = count(QualityTier::Perfect);
        let good_brews = count(QualityTier::Good);

        let mut top_teas: Vec<TeaSummary> = self
            .tea_notes
            .values()
            .map(|notes| TeaSummary {
                name: notes.tea_name.clone(),
                total_brews: notes.total_brews,
                success_rate: notes.success_rate(),
            })
            .collect();
        top_teas.sort_by(|a, b| b.total_brews.cmp(&a.total_brews));
        top_teas.truncate(TOP_TEAS_LIMIT);

        NotebookStats {
            total_brews,
            perfect_brews,
            good_brews,
            success_rate: percent_of(perfect_brews + good_brews, total_brews),
            top_teas,
        }
    }

    /// Last successful parameters for `tea_id`, if any brew has succeeded.
    #[must_use]
    pub fn suggestion(&self, tea_id: &str) -> Option<BrewSuggestion> {
        let notes = self.tea_notes.get(tea_id)?;
        Some(BrewSuggestion {
            temperature: notes.best_temp?,
            steep_seconds: notes.best_steep?,
            success_rate: notes.success_rate(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
