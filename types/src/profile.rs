//! Profile aggregate and flip state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::appearance::{Appearance, RawAppearance};
use crate::unlock::UnlockSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user id must not be empty")]
pub struct EmptyUserIdError;

/// Opaque identifier of an authenticated user, issued outside this core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyUserIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyUserIdError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = EmptyUserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The bit and how many times it has been flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlipState {
    pub status: bool,
    pub counter: u64,
}

impl FlipState {
    #[must_use]
    pub const fn new(status: bool, counter: u64) -> Self {
        Self { status, counter }
    }

    /// State after one more flip.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self {
            status: !self.status,
            counter: self.counter.saturating_add(1),
        }
    }
}

/// Profile aggregate as held by the authoritative store.
///
/// `appearance` is kept raw: whatever the store returns is repaired by
/// normalization before it reaches the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub appearance: RawAppearance,
    #[serde(default)]
    pub unlocks: UnlockSet,
}

impl Profile {
    /// A freshly created account: bit off, never flipped, default look.
    #[must_use]
    pub fn new_account() -> Self {
        Self {
            status: false,
            counter: 0,
            appearance: RawAppearance::from(&Appearance::default()),
            unlocks: UnlockSet::new(),
        }
    }

    #[must_use]
    pub const fn flip_state(&self) -> FlipState {
        FlipState::new(self.status, self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("u-1").unwrap().as_str(), "u-1");
        assert!(serde_json::from_value::<UserId>(serde_json::json!("")).is_err());
    }

    #[test]
    fn flipped_toggles_and_counts() {
        let state = FlipState::new(false, 41).flipped();
        assert_eq!(state, FlipState::new(true, 42));
        assert_eq!(state.flipped(), FlipState::new(false, 43));
    }

    #[test]
    fn flipped_saturates() {
        assert_eq!(FlipState::new(true, u64::MAX).flipped().counter, u64::MAX);
    }

    #[test]
    fn profile_deserializes_with_missing_fields() {
        let profile: Profile = serde_json::from_value(serde_json::json!({ "counter": 7 })).unwrap();
        assert_eq!(profile.flip_state(), FlipState::new(false, 7));
        assert!(profile.unlocks.is_empty());
        assert_eq!(profile.appearance, RawAppearance::default());
    }

    #[test]
    fn new_account_round_trips() {
        let profile = Profile::new_account();
        let json = serde_json::to_value(&profile).unwrap();
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
