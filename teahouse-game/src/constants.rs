//! Centralized balance and tuning constants for Teahouse game logic.
//!
//! These values define the deterministic math for brew scoring, patience,
//! foraging and the notebook. Reference data (teas, customers, vessels,
//! locations) lives in the JSON assets; everything here only changes through
//! reviewed code.

// Ledger ---------------------------------------------------------------------
pub(crate) const STARTING_MONEY: i64 = 100;
pub(crate) const STARTING_REPUTATION: i64 = 0;
pub(crate) const STARTING_DAY: u32 = 1;

// Catalog anchors ------------------------------------------------------------
/// Tea requested when no unlocked tea matches an archetype's taste.
pub const DEFAULT_TEA_ID: &str = "sencha";
/// Zero-bonus vessel that is owned from the first day and never re-locked.
pub const BASE_VESSEL_ID: &str = "basic_cup";

// Brew quality tiers ---------------------------------------------------------
pub(crate) const PERFECT_TEMP_TOLERANCE: u32 = 2;
pub(crate) const PERFECT_STEEP_TOLERANCE: u32 = 15;
pub(crate) const PERFECT_PAYMENT_PCT: u32 = 150;
pub(crate) const PERFECT_REPUTATION: i64 = 3;

pub(crate) const GOOD_TEMP_TOLERANCE: u32 = 5;
pub(crate) const GOOD_STEEP_TOLERANCE: u32 = 30;
pub(crate) const GOOD_PAYMENT_PCT: u32 = 120;
pub(crate) const GOOD_REPUTATION: i64 = 2;

pub(crate) const ACCEPTABLE_TEMP_TOLERANCE: u32 = 10;
pub(crate) const ACCEPTABLE_STEEP_TOLERANCE: u32 = 45;
pub(crate) const ACCEPTABLE_PAYMENT_PCT: u32 = 100;
pub(crate) const ACCEPTABLE_REPUTATION: i64 = 1;

pub(crate) const POOR_PAYMENT_PCT: u32 = 70;
pub(crate) const POOR_REPUTATION: i64 = -1;

pub(crate) const WRONG_TEA_REPUTATION: i64 = -2;

// Feedback text --------------------------------------------------------------
pub(crate) const MSG_PERFECT: &str = "Perfect brew! Temperature and steeping were spot on!";
pub(crate) const MSG_GOOD: &str = "Good job! The tea was brewed well.";
pub(crate) const MSG_ACCEPTABLE: &str = "Acceptable. The brew could be better.";
pub(crate) const MSG_POOR: &str = "Poor quality. The temperature or steeping was way off.";
pub(crate) const MSG_WRONG_TEA: &str = "Wrong tea served!";
pub(crate) const RESPONSE_WRONG_TEA: &str = "This isn't what I ordered...";

// Patience -------------------------------------------------------------------
pub(crate) const PATIENCE_LOW_SECS: u32 = 120;
pub(crate) const PATIENCE_MEDIUM_SECS: u32 = 180;
pub(crate) const PATIENCE_HIGH_SECS: u32 = 300;
pub(crate) const PATIENCE_FALLBACK_SECS: u32 = 180;

pub(crate) const MOOD_PATIENT_FRACTION: f64 = 0.3;
pub(crate) const MOOD_WAITING_FRACTION: f64 = 0.6;
pub(crate) const MOOD_IMPATIENT_FRACTION: f64 = 0.9;

// Foraging -------------------------------------------------------------------
pub(crate) const CONSOLATION_COINS_MIN: i64 = 5;
pub(crate) const CONSOLATION_COINS_SPAN: usize = 10;

// Notebook -------------------------------------------------------------------
pub(crate) const CUSTOMER_NOTES_CAP: usize = 50;
pub(crate) const GENERAL_NOTES_CAP: usize = 100;
pub(crate) const BREW_HISTORY_CAP: usize = 100;
pub(crate) const TOP_TEAS_LIMIT: usize = 5;
pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 20;

// Random streams -------------------------------------------------------------
pub(crate) const SHOP_STREAM_TAG: &[u8] = b"teahouse.shop";
