//! Configuration loading for Bitflip.
//!
//! Reads `~/.bitflip/config.toml`:
//!
//! ```toml
//! [sync]
//! flip_cooldown_ms = 300
//! appearance_debounce_ms = 500
//! remote_timeout_ms = 10000
//!
//! [session]
//! user_id = "local-user"
//! ```
//!
//! Every field is optional. Raw structs stay private to this crate; callers
//! get resolved values such as [`SyncSettings`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use bitflip_types::{SyncSettings, UserId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSyncConfig {
    flip_cooldown_ms: Option<u64>,
    appearance_debounce_ms: Option<u64>,
    /// Absent or zero means no timeout.
    remote_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSessionConfig {
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BitflipConfig {
    sync: Option<RawSyncConfig>,
    session: Option<RawSessionConfig>,
}

impl BitflipConfig {
    /// Load from the default location.
    ///
    /// Returns `None` when there is no file. Read and parse failures are
    /// logged and also yield `None`, so callers fall back to defaults.
    #[must_use]
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve sync timings, filling gaps with defaults.
    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        let raw = self.sync.as_ref();
        let flip_cooldown = raw
            .and_then(|s| s.flip_cooldown_ms)
            .map_or(SyncSettings::DEFAULT_FLIP_COOLDOWN, Duration::from_millis);
        let appearance_debounce = raw
            .and_then(|s| s.appearance_debounce_ms)
            .map_or(SyncSettings::DEFAULT_APPEARANCE_DEBOUNCE, Duration::from_millis);
        let remote_timeout = raw
            .and_then(|s| s.remote_timeout_ms)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        SyncSettings::new(flip_cooldown, appearance_debounce, remote_timeout)
    }

    /// Configured user, if any. A blank id is logged and ignored.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        let raw = self.session.as_ref()?.user_id.as_deref()?;
        match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!("Ignoring [session] user_id: {err}");
                None
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bitflip").join("config.toml"))
}
