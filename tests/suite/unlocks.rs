//! Unlock ladder tests

use bitflip_types::unlock::ids;
use bitflip_types::{UnlockSet, compute_unlocks};

fn ids_at(counter: u64) -> Vec<String> {
    compute_unlocks(counter, &UnlockSet::new()).to_ids()
}

#[test]
fn ladder_examples() {
    assert!(ids_at(0).is_empty());
    assert!(ids_at(3).is_empty());
    assert_eq!(ids_at(4), vec![ids::FILL_GRADIENT]);
    assert_eq!(
        ids_at(16),
        vec![ids::FILL_COLOURS_PACK1, ids::FILL_GRADIENT, ids::FILL_STRIPES]
    );
    assert_eq!(
        ids_at(32),
        vec![
            "cycles.0",
            ids::FILL_COLOURS_PACK1,
            ids::FILL_GRADIENT,
            ids::FILL_PATTERNS_PACK1,
            ids::FILL_STRIPES,
        ]
    );
    let at_65 = compute_unlocks(65, &UnlockSet::new());
    assert!(at_65.contains("cycles.1"));
    assert!(at_65.contains("cycles.0"));
    assert!(!at_65.contains("cycles.2"));
}

#[test]
fn monotonic_over_counters() {
    let existing: UnlockSet = ["legacy.badge"].into_iter().collect();
    let mut previous = compute_unlocks(0, &existing);
    for counter in 1..=200 {
        let next = compute_unlocks(counter, &existing);
        assert!(previous.is_subset(&next), "counter {counter}");
        previous = next;
    }
    assert!(previous.contains("legacy.badge"));
}

#[test]
fn idempotent_over_counters() {
    for counter in [0, 4, 8, 15, 16, 31, 32, 63, 64, 1_000, u64::MAX] {
        let once = compute_unlocks(counter, &UnlockSet::new());
        assert_eq!(compute_unlocks(counter, &once), once, "counter {counter}");
    }
}

#[test]
fn existing_unlocks_survive_a_lower_counter() {
    let earned = compute_unlocks(40, &UnlockSet::new());
    let after_reset = compute_unlocks(0, &earned);
    assert_eq!(after_reset, earned);
}

#[test]
fn wire_format_is_sorted_strings() {
    let set = compute_unlocks(8, &UnlockSet::new());
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json, serde_json::json!(["fill.gradient", "fill.stripes"]));
}
