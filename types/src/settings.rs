//! Resolved synchronization settings shared across crates.
//!
//! Raw TOML structs (with `Option` fields) stay private in `bitflip-config`.
//! The loader resolves them into [`SyncSettings`] at the parse boundary, so
//! a value of this type is always complete.

use std::time::Duration;

/// Timing knobs for the profile synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    flip_cooldown: Duration,
    appearance_debounce: Duration,
    remote_timeout: Option<Duration>,
}

impl SyncSettings {
    pub const DEFAULT_FLIP_COOLDOWN: Duration = Duration::from_millis(300);
    pub const DEFAULT_APPEARANCE_DEBOUNCE: Duration = Duration::from_millis(500);

    #[must_use]
    pub const fn new(
        flip_cooldown: Duration,
        appearance_debounce: Duration,
        remote_timeout: Option<Duration>,
    ) -> Self {
        Self {
            flip_cooldown,
            appearance_debounce,
            remote_timeout,
        }
    }

    /// Minimum interval between accepted flips.
    #[must_use]
    pub const fn flip_cooldown(&self) -> Duration {
        self.flip_cooldown
    }

    /// Quiet period after the last edit before appearance is persisted.
    #[must_use]
    pub const fn appearance_debounce(&self) -> Duration {
        self.appearance_debounce
    }

    /// Upper bound for a single store call. `None` waits forever.
    #[must_use]
    pub const fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_FLIP_COOLDOWN,
            Self::DEFAULT_APPEARANCE_DEBOUNCE,
            None,
        )
    }
}
