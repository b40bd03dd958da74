//! Unlock ladder and the monotonic unlock set.
//!
//! Unlocks are permanent capability identifiers earned by flipping. The ladder
//! is a fixed table of `(threshold, id)` pairs; once the ladder is exhausted,
//! every further `REPEAT_PERIOD` flips completes another *cycle*.
//!
//! Cycle identifiers (`cycles.<N>`) are kept exactly as earned and are never
//! dropped. Membership is cumulative: holding `cycles.5` answers yes for
//! `cycles.0` through `cycles.5`, so a counter that jumps straight to
//! `u64::MAX` adds one identifier rather than every cycle below it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Well-known unlock identifiers.
pub mod ids {
    pub const FILL_GRADIENT: &str = "fill.gradient";
    pub const FILL_STRIPES: &str = "fill.stripes";
    pub const FILL_COLOURS_PACK1: &str = "fill.colours.pack1";
    pub const FILL_PATTERNS_PACK1: &str = "fill.patterns.pack1";

    /// Prefix shared by all cycle identifiers.
    pub const CYCLE_PREFIX: &str = "cycles.";
}

/// Ordered unlock ladder. Thresholds are inclusive.
pub const UNLOCK_LADDER: &[(u64, &str)] = &[
    (4, ids::FILL_GRADIENT),
    (8, ids::FILL_STRIPES),
    (16, ids::FILL_COLOURS_PACK1),
    (32, ids::FILL_PATTERNS_PACK1),
];

/// Counter at which `cycles.0` is earned.
pub const FIRST_REPEATING_THRESHOLD: u64 = 32;

/// Flips needed to complete one more cycle after the first.
pub const REPEAT_PERIOD: u64 = 32;

/// Derive the unlock set for `counter`, starting from `existing`.
///
/// Pure and monotonic: the result always contains `existing`. Re-applying with
/// the same counter returns an equal set.
#[must_use]
pub fn compute_unlocks(counter: u64, existing: &UnlockSet) -> UnlockSet {
    let mut next = existing.clone();
    for &(threshold, id) in UNLOCK_LADDER {
        if counter >= threshold {
            next.insert(id);
        }
    }
    if let Some(cycle) = completed_cycle(counter) {
        next.insert_cycle(cycle);
    }
    next
}

/// Highest cycle completed at `counter`, if any.
#[must_use]
pub fn completed_cycle(counter: u64) -> Option<u64> {
    counter
        .checked_sub(FIRST_REPEATING_THRESHOLD)
        .map(|past| past / REPEAT_PERIOD)
}

fn parse_cycle(id: &str) -> Option<u64> {
    id.strip_prefix(ids::CYCLE_PREFIX)?.parse().ok()
}

fn cycle_id(cycle: u64) -> String {
    format!("{}{cycle}", ids::CYCLE_PREFIX)
}

/// What a gated value needs before a caller may select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Always available.
    Free,
    /// Available once the named unlock is held.
    Unlock(&'static str),
    /// Never selectable (e.g. a colour outside every palette).
    Unavailable,
}

/// A value whose selection may require an unlock.
pub trait Gated {
    fn requirement(&self) -> Requirement;
}

/// Monotonic set of unlock identifiers.
///
/// Serialized as a sorted list of strings. Unknown identifiers are kept
/// verbatim so a newer store schema survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct UnlockSet {
    named: BTreeSet<String>,
    cycles: BTreeSet<u64>,
}

impl UnlockSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier. Returns `true` if the set grew.
    pub fn insert(&mut self, id: &str) -> bool {
        if let Some(cycle) = parse_cycle(id) {
            return self.insert_cycle(cycle);
        }
        if self.named.contains(id) {
            return false;
        }
        self.named.insert(id.to_string())
    }

    fn insert_cycle(&mut self, cycle: u64) -> bool {
        self.cycles.insert(cycle)
    }

    fn holds_cycle(&self, cycle: u64) -> bool {
        self.highest_cycle().is_some_and(|held| held >= cycle)
    }

    /// Membership, with cycles answered cumulatively.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        match parse_cycle(id) {
            Some(cycle) => self.holds_cycle(cycle),
            None => self.named.contains(id),
        }
    }

    /// Highest completed cycle, if any.
    #[must_use]
    pub fn highest_cycle(&self) -> Option<u64> {
        self.cycles.last().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.cycles.is_empty()
    }

    /// Whether everything `self` grants is granted by `other`.
    #[must_use]
    pub fn is_subset(&self, other: &UnlockSet) -> bool {
        self.named.is_subset(&other.named)
            && self.highest_cycle().is_none_or(|cycle| other.holds_cycle(cycle))
    }

    #[must_use]
    pub fn union(&self, other: &UnlockSet) -> UnlockSet {
        let mut merged = self.clone();
        merged.named.extend(other.named.iter().cloned());
        merged.cycles.extend(other.cycles.iter().copied());
        merged
    }

    /// Identifiers that grant something `before` did not.
    ///
    /// A cycle jump is reported as its highest identifier only.
    #[must_use]
    pub fn gained_since(&self, before: &UnlockSet) -> Vec<String> {
        let mut gained: Vec<String> = self.named.difference(&before.named).cloned().collect();
        if let Some(cycle) = self.highest_cycle()
            && !before.holds_cycle(cycle)
        {
            gained.push(cycle_id(cycle));
        }
        gained
    }

    /// Capability check consulted before every gated mutation.
    #[must_use]
    pub fn permits(&self, value: &impl Gated) -> bool {
        match value.requirement() {
            Requirement::Free => true,
            Requirement::Unlock(id) => self.contains(id),
            Requirement::Unavailable => false,
        }
    }

    /// Every held identifier, sorted.
    #[must_use]
    pub fn to_ids(&self) -> Vec<String> {
        let mut out: Vec<String> = self.named.iter().cloned().collect();
        out.extend(self.cycles.iter().map(|&cycle| cycle_id(cycle)));
        out.sort();
        out
    }
}

impl From<Vec<String>> for UnlockSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = UnlockSet::new();
        for id in &ids {
            set.insert(id);
        }
        set
    }
}

impl From<UnlockSet> for Vec<String> {
    fn from(set: UnlockSet) -> Self {
        set.to_ids()
    }
}

impl<'a> FromIterator<&'a str> for UnlockSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = UnlockSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
