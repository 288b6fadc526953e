//! Brew scoring: quality tiers, payment and customer reaction.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCEPTABLE_PAYMENT_PCT, ACCEPTABLE_REPUTATION, ACCEPTABLE_STEEP_TOLERANCE,
    ACCEPTABLE_TEMP_TOLERANCE, GOOD_PAYMENT_PCT, GOOD_REPUTATION, GOOD_STEEP_TOLERANCE,
    GOOD_TEMP_TOLERANCE, MSG_ACCEPTABLE, MSG_GOOD, MSG_PERFECT, MSG_POOR, MSG_WRONG_TEA,
    PERFECT_PAYMENT_PCT, PERFECT_REPUTATION, PERFECT_STEEP_TOLERANCE, PERFECT_TEMP_TOLERANCE,
    POOR_PAYMENT_PCT, POOR_REPUTATION, RESPONSE_WRONG_TEA, WRONG_TEA_REPUTATION,
};
use crate::customer::ActiveCustomer;
use crate::data::Vessel;
use crate::numbers::scale_floor_pct;
use crate::rng::{RandomSource, pick};

/// Verdict for one served brew, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    WrongTea,
    Poor,
    Acceptable,
    Good,
    Perfect,
}

impl QualityTier {
    /// Tiers that can be earned by brewing the right tea, best first.
    pub const GRADED: [Self; 3] = [Self::Perfect, Self::Good, Self::Acceptable];

    /// Payment as a percentage of the tea price.
    #[must_use]
    pub const fn payment_pct(self) -> u32 {
        match self {
            Self::Perfect => PERFECT_PAYMENT_PCT,
            Self::Good => GOOD_PAYMENT_PCT,
            Self::Acceptable => ACCEPTABLE_PAYMENT_PCT,
            Self::Poor => POOR_PAYMENT_PCT,
            Self::WrongTea => 0,
        }
    }

    #[must_use]
    pub const fn reputation_delta(self) -> i64 {
        match self {
            Self::Perfect => PERFECT_REPUTATION,
            Self::Good => GOOD_REPUTATION,
            Self::Acceptable => ACCEPTABLE_REPUTATION,
            Self::Poor => POOR_REPUTATION,
            Self::WrongTea => WRONG_TEA_REPUTATION,
        }
    }

    /// Base `(temperature, steep)` tolerances, or `None` for tiers without a
    /// window.
    #[must_use]
    pub const fn tolerances(self) -> Option<(u32, u32)> {
        match self {
            Self::Perfect => Some((PERFECT_TEMP_TOLERANCE, PERFECT_STEEP_TOLERANCE)),
            Self::Good => Some((GOOD_TEMP_TOLERANCE, GOOD_STEEP_TOLERANCE)),
            Self::Acceptable => Some((ACCEPTABLE_TEMP_TOLERANCE, ACCEPTABLE_STEEP_TOLERANCE)),
            Self::Poor | Self::WrongTea => None,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Perfect => MSG_PERFECT,
            Self::Good => MSG_GOOD,
            Self::Acceptable => MSG_ACCEPTABLE,
            Self::Poor => MSG_POOR,
            Self::WrongTea => MSG_WRONG_TEA,
        }
    }

    /// Perfect and good brews draw from the satisfied dialogue pool.
    #[must_use]
    pub const fn is_satisfying(self) -> bool {
        matches!(self, Self::Perfect | Self::Good)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor",
            Self::WrongTea => "wrong_tea",
        }
    }
}

/// Tolerance widening granted by the equipped vessel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselBonus {
    /// Added to temperature tolerance
    pub quality: u32,
    /// Added to steep tolerance
    pub time: u32,
}

impl From<&Vessel> for VesselBonus {
    fn from(vessel: &Vessel) -> Self {
        Self {
            quality: vessel.quality_bonus,
            time: vessel.time_bonus,
        }
    }
}

/// What the player put in front of the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewSubmission {
    pub tea_id: String,
    pub temperature: i32,
    pub steep_seconds: u32,
}

impl BrewSubmission {
    #[must_use]
    pub fn new(tea_id: impl Into<String>, temperature: i32, steep_seconds: u32) -> Self {
        Self {
            tea_id: tea_id.into(),
            temperature,
            steep_seconds,
        }
    }
}

/// Evaluation result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub tier: QualityTier,
    pub payment: u32,
    pub reputation_delta: i64,
    pub message: String,
    pub customer_response: String,
    /// Zero for wrong-tea verdicts
    pub temp_diff: u32,
    pub steep_diff: u32,
    pub customer_name: String,
}

/// Grade the right tea from its parameter deviations.
#[must_use]
pub fn grade(temp_diff: u32, steep_diff: u32, bonus: VesselBonus) -> QualityTier {
    QualityTier::GRADED
        .into_iter()
        .find(|tier| {
            tier.tolerances().is_some_and(|(temp_tol, steep_tol)| {
                temp_diff <= temp_tol.saturating_add(bonus.quality)
                    && steep_diff <= steep_tol.saturating_add(bonus.time)
            })
        })
        .unwrap_or(QualityTier::Poor)
}

/// Score a brew served to `customer` after `elapsed_secs` of waiting.
///
/// Only the customer response consumes a draw from `rng`; everything else is a
/// pure function of the inputs.
pub fn evaluate<R>(
    customer: &ActiveCustomer,
    submission: &BrewSubmission,
    elapsed_secs: f64,
    bonus: VesselBonus,
    rng: &mut R,
) -> Feedback
where
    R: RandomSource + ?Sized,
{
    let requested = &customer.requested_tea;
    if submission.tea_id != requested.id {
        debug!(
            "{} wanted {} but was served {}",
            customer.name, requested.id, submission.tea_id
        );
        let tier = QualityTier::WrongTea;
        return Feedback {
            tier,
            payment: 0,
            reputation_delta: tier.reputation_delta(),
            message: tier.message().to_string(),
            customer_response: RESPONSE_WRONG_TEA.to_string(),
            temp_diff: 0,
            steep_diff: 0,
            customer_name: customer.name.clone(),
        };
    }

    let temp_diff = submission.temperature.abs_diff(requested.ideal_temp);
    let steep_diff = submission.steep_seconds.abs_diff(requested.ideal_steep);
    let mut tier = grade(temp_diff, steep_diff, bonus);
    if elapsed_secs > f64::from(customer.patience_secs) {
        tier = QualityTier::Poor;
    }

    let pool = if tier.is_satisfying() {
        &customer.dialogue.satisfied
    } else {
        &customer.dialogue.dissatisfied
    };
    let customer_response = pick(pool, rng).cloned().unwrap_or_default();
    let payment = scale_floor_pct(requested.price, tier.payment_pct());

    debug!(
        "{} brewed {} (temp_diff={temp_diff}, steep_diff={steep_diff}, waited={elapsed_secs:.1}s): {} for {payment}",
        customer.name,
        requested.id,
        tier.label()
    );

    Feedback {
        tier,
        payment,
        reputation_delta: tier.reputation_delta(),
        message: tier.message().to_string(),
        customer_response,
        temp_diff,
        steep_diff,
        customer_name: customer.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Catalog, Dialogue};
    use crate::rng::ScriptedRolls;

    fn sencha_customer() -> ActiveCustomer {
        let catalog = Catalog::load_default().unwrap();
        ActiveCustomer {
            name: "Mika".to_string(),
            archetype: "student".to_string(),
            greeting: "Hi!".to_string(),
            requested_tea: catalog.tea("sencha").unwrap().clone(),
            dialogue: Dialogue {
                greeting: vec!["Hi!".to_string()],
                satisfied: vec!["Lovely.".to_string(), "Great!".to_string()],
                dissatisfied: vec!["Hmm.".to_string()],
            },
            patience_secs: 120,
            arrived_at: 0,
            served: false,
        }
    }

    #[test]
    fn perfect_sencha_pays_half_again() {
        let customer = sencha_customer();
        let mut rolls = ScriptedRolls::new([0.7]);
        let feedback = evaluate(
            &customer,
            &BrewSubmission::new("sencha", 75, 90),
            10.0,
            VesselBonus::default(),
            &mut rolls,
        );
        assert_eq!(feedback.tier, QualityTier::Perfect);
        assert_eq!(feedback.payment, 22);
        assert_eq!(feedback.reputation_delta, 3);
        assert_eq!(feedback.customer_response, "Great!");
        assert_eq!(feedback.customer_name, "Mika");
    }

    #[test]
    fn far_off_temperature_is_poor() {
        let customer = sencha_customer();
        let feedback = evaluate(
            &customer,
            &BrewSubmission::new("sencha", 90, 90),
            5.0,
            VesselBonus::default(),
            &mut ScriptedRolls::default(),
        );
        assert_eq!(feedback.tier, QualityTier::Poor);
        assert_eq!(feedback.payment, 10);
        assert_eq!(feedback.reputation_delta, -1);
        assert_eq!(feedback.temp_diff, 15);
        assert_eq!(feedback.customer_response, "Hmm.");
    }

    #[test]
    fn wrong_tea_is_terminal_and_draws_nothing() {
        let customer = sencha_customer();
        let mut rolls = ScriptedRolls::new([0.1]);
        let feedback = evaluate(
            &customer,
            &BrewSubmission::new("earl_grey", 75, 90),
            500.0,
            VesselBonus::default(),
            &mut rolls,
        );
        assert_eq!(feedback.tier, QualityTier::WrongTea);
        assert_eq!(feedback.payment, 0);
        assert_eq!(feedback.reputation_delta, -2);
        assert_eq!(feedback.message, "Wrong tea served!");
        assert_eq!(feedback.customer_response, "This isn't what I ordered...");
        assert_eq!((feedback.temp_diff, feedback.steep_diff), (0, 0));
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn impatience_forces_poor() {
        let customer = sencha_customer();
        let feedback = evaluate(
            &customer,
            &BrewSubmission::new("sencha", 75, 90),
            120.5,
            VesselBonus::default(),
            &mut ScriptedRolls::default(),
        );
        assert_eq!(feedback.tier, QualityTier::Poor);
        assert_eq!(feedback.payment, 10);

        let on_time = evaluate(
            &customer,
            &BrewSubmission::new("sencha", 75, 90),
            120.0,
            VesselBonus::default(),
            &mut ScriptedRolls::default(),
        );
        assert_eq!(on_time.tier, QualityTier::Perfect);
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        let none = VesselBonus::default();
        assert_eq!(grade(2, 15, none), QualityTier::Perfect);
        assert_eq!(grade(3, 15, none), QualityTier::Good);
        assert_eq!(grade(5, 30, none), QualityTier::Good);
        assert_eq!(grade(5, 31, none), QualityTier::Acceptable);
        assert_eq!(grade(10, 45, none), QualityTier::Acceptable);
        assert_eq!(grade(11, 0, none), QualityTier::Poor);
    }

    #[test]
    fn vessel_bonus_widens_windows() {
        let pot = VesselBonus {
            quality: 5,
            time: 5,
        };
        assert_eq!(grade(7, 20, pot), QualityTier::Perfect);
        assert_eq!(grade(7, 21, pot), QualityTier::Good);
        assert_eq!(grade(15, 50, pot), QualityTier::Acceptable);
    }

    #[test]
    fn tier_ordering_and_table() {
        assert!(QualityTier::Perfect > QualityTier::Good);
        assert!(QualityTier::Poor > QualityTier::WrongTea);
        assert_eq!(QualityTier::Good.payment_pct(), 120);
        assert!(QualityTier::Poor.tolerances().is_none());
        assert!(!QualityTier::Acceptable.is_satisfying());
    }
}
