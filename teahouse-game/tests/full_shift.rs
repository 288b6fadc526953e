use std::hash::Hasher;
use std::rc::Rc;

use teahouse_game::{Catalog, ManualClock, QualityTier, SeededRandom, TeaShop, decode_shift_code};
use twox_hash::XxHash64;

const CUSTOMERS_PER_DAY: usize = 12;
const DAYS: usize = 5;

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

struct ShiftReport {
    fingerprint: u64,
    tiers: Vec<QualityTier>,
    money: i64,
    reputation: i64,
}

/// Serve every customer at the ideal parameters, forage once a day and buy
/// the cheapest vessel still for sale whenever it is affordable.
fn play(seed: u64) -> ShiftReport {
    let clock = Rc::new(ManualClock::starting_at(0));
    let mut shop: TeaShop<SeededRandom, _> =
        TeaShop::seeded(Catalog::load_default().unwrap(), seed, Rc::clone(&clock));
    let mut tiers = Vec::new();
    let mut expected_money = shop.ledger().money;

    for _ in 0..DAYS {
        for _ in 0..CUSTOMERS_PER_DAY {
            let customer = shop.generate_customer();
            let tea = customer.requested_tea.clone();
            clock.advance_secs(45);
            let feedback = shop
                .evaluate_service(&tea.id, tea.ideal_temp, tea.ideal_steep)
                .unwrap();
            expected_money += i64::from(feedback.payment);
            tiers.push(feedback.tier);
            shop.dismiss_customer();
            clock.advance_secs(15);
        }
        assert_eq!(shop.ledger().money, expected_money);

        let location = shop
            .accessible_locations()
            .iter()
            .rev()
            .find(|location| shop.can_access_location(&location.id))
            .map(|location| location.id.clone());
        if let Some(location) = location {
            shop.start_foraging(&location).unwrap();
        }

        let next_vessel = shop
            .locked_vessels()
            .first()
            .map(|vessel| vessel.id.clone());
        if let Some(id) = next_vessel
            && shop.can_purchase_vessel(&id)
        {
            shop.purchase_vessel(&id).unwrap();
        }
        expected_money = shop.ledger().money;

        assert_eq!(
            shop.ledger().served_today,
            u32::try_from(CUSTOMERS_PER_DAY).unwrap()
        );
        shop.close_day();
    }

    let snapshot = shop.snapshot();
    let json = snapshot.to_json().unwrap();
    ShiftReport {
        fingerprint: snapshot_hash(json.as_bytes()),
        tiers,
        money: shop.ledger().money,
        reputation: shop.ledger().reputation,
    }
}

#[test]
fn precise_service_is_always_perfect() {
    let report = play(0xC0FFEE);
    assert_eq!(report.tiers.len(), DAYS * CUSTOMERS_PER_DAY);
    assert!(report.tiers.iter().all(|tier| *tier == QualityTier::Perfect));
    // brewing earns 3 a cup; hidden grove finds add 5 at a time
    let brewed = i64::try_from(DAYS * CUSTOMERS_PER_DAY).unwrap() * 3;
    assert!(report.reputation >= brewed);
    assert_eq!((report.reputation - brewed) % 5, 0);
    assert!(report.money > 100);
}

#[test]
fn same_seed_replays_identically() {
    let first = play(2024);
    let second = play(2024);
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(first.tiers, second.tiers);
    assert_eq!(first.money, second.money);
}

#[test]
fn shift_codes_feed_the_same_stream() {
    let by_code = play(decode_shift_code("TS-SENCHA42").unwrap());
    let by_loose_code = play(decode_shift_code("ts-sencha42").unwrap());
    assert_eq!(by_code.fingerprint, by_loose_code.fingerprint);

    let other = play(decode_shift_code("TS-OOLONG07").unwrap());
    assert_ne!(by_code.fingerprint, other.fingerprint);
}

#[test]
fn restored_shop_continues_from_the_snapshot() {
    let clock = Rc::new(ManualClock::starting_at(0));
    let catalog = Catalog::load_default().unwrap();
    let mut shop = TeaShop::seeded(catalog.clone(), 99, Rc::clone(&clock));
    for _ in 0..5 {
        let tea = shop.generate_customer().requested_tea.clone();
        shop.evaluate_service(&tea.id, tea.ideal_temp, tea.ideal_steep);
        shop.dismiss_customer();
    }
    let json = shop.snapshot().to_json().unwrap();
    let parsed = teahouse_game::ShopSnapshot::from_json(&json).unwrap();
    let mut resumed = TeaShop::restore(catalog, &parsed, SeededRandom::from_user_seed(100), clock);
    assert_eq!(resumed.ledger().customers_served, 5);
    assert_eq!(resumed.notebook().brewing_history(None).len(), 5);
    assert_eq!(resumed.notebook().statistics().perfect_brews, 5);

    let tea = resumed.generate_customer().requested_tea.clone();
    let suggestion = resumed.notebook().suggestion(&tea.id);
    if let Some(suggestion) = suggestion {
        assert_eq!(suggestion.temperature, tea.ideal_temp);
        assert_eq!(suggestion.steep_seconds, tea.ideal_steep);
    }
}
