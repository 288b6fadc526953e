use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use teahouse_game::{ActiveCustomer, BrewSubmission, RandomSource, SeededRandom, Tea};

const SLOPPY_TEMP_OFFSET: i32 = 4;
const SLOPPY_STEEP_OFFSET: u32 = 25;
const ERRATIC_TEMP_SPREAD: usize = 31;
const ERRATIC_STEEP_SPREAD: usize = 121;
const ERRATIC_WRONG_TEA_CHANCE: f64 = 0.1;

/// Decision returned by a [`BrewPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewDecision {
    pub submission: BrewSubmission,
    /// Seconds the customer waits before the cup is handed over
    pub wait_secs: u64,
}

/// Policy interface for automated service.
pub trait BrewPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose what to brew for the waiting customer.
    fn brew(&mut self, customer: &ActiveCustomer, unlocked: &[&Tea]) -> BrewDecision;
}

/// Built-in play styles for automated shifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayPolicy {
    /// Ideal temperature and steep time, served quickly
    Precise,
    /// Always a little hot and a little long
    Sloppy,
    /// Random offsets and the occasional wrong tea
    Erratic,
}

impl PlayPolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Precise => "Precise",
            Self::Sloppy => "Sloppy",
            Self::Erratic => "Erratic",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn BrewPolicy> {
        match self {
            Self::Precise => Box::new(PrecisePolicy),
            Self::Sloppy => Box::new(SloppyPolicy),
            Self::Erratic => Box::new(ErraticPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct PrecisePolicy;
struct SloppyPolicy;

struct ErraticPolicy {
    rng: SeededRandom,
}

impl ErraticPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: SeededRandom::for_stream(seed, b"tester-erratic-policy"),
        }
    }

    fn offset(&mut self, spread: usize) -> i64 {
        let half = i64::try_from(spread / 2).unwrap_or(0);
        i64::try_from(self.rng.pick_index(spread)).unwrap_or(half) - half
    }
}

impl BrewPolicy for PrecisePolicy {
    fn name(&self) -> &'static str {
        "precise"
    }

    fn brew(&mut self, customer: &ActiveCustomer, _unlocked: &[&Tea]) -> BrewDecision {
        let tea = &customer.requested_tea;
        BrewDecision {
            submission: BrewSubmission::new(tea.id.clone(), tea.ideal_temp, tea.ideal_steep),
            wait_secs: 30,
        }
    }
}

impl BrewPolicy for SloppyPolicy {
    fn name(&self) -> &'static str {
        "sloppy"
    }

    fn brew(&mut self, customer: &ActiveCustomer, _unlocked: &[&Tea]) -> BrewDecision {
        let tea = &customer.requested_tea;
        BrewDecision {
            submission: BrewSubmission::new(
                tea.id.clone(),
                tea.ideal_temp + SLOPPY_TEMP_OFFSET,
                tea.ideal_steep + SLOPPY_STEEP_OFFSET,
            ),
            wait_secs: 75,
        }
    }
}

impl BrewPolicy for ErraticPolicy {
    fn name(&self) -> &'static str {
        "erratic"
    }

    fn brew(&mut self, customer: &ActiveCustomer, unlocked: &[&Tea]) -> BrewDecision {
        let requested = &customer.requested_tea;
        let tea = if !unlocked.is_empty() && self.rng.next_unit() < ERRATIC_WRONG_TEA_CHANCE {
            unlocked[self.rng.pick_index(unlocked.len())]
        } else {
            requested
        };

        let temp_offset = self.offset(ERRATIC_TEMP_SPREAD);
        let steep_offset = self.offset(ERRATIC_STEEP_SPREAD);
        let temperature = i32::try_from(i64::from(tea.ideal_temp) + temp_offset)
            .unwrap_or(tea.ideal_temp);
        let steep = u32::try_from((i64::from(tea.ideal_steep) + steep_offset).max(0))
            .unwrap_or(tea.ideal_steep);
        let wait_secs = 10 + u64::try_from(self.rng.pick_index(240)).unwrap_or(0);

        BrewDecision {
            submission: BrewSubmission::new(tea.id.clone(), temperature, steep),
            wait_secs,
        }
    }
}
