//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use bitflip_engine::{MemoryProfileStore, ProfileSync, SyncSettings, UserId};

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

/// Timings used by the scenarios: short and easy to reason about.
pub fn fast_settings() -> SyncSettings {
    SyncSettings::new(ms(100), ms(200), None)
}

/// Let spawned store calls finish and feed them back through `tick`.
pub async fn settle(sync: &mut ProfileSync, now: Instant) {
    for _ in 0..25 {
        tokio::task::yield_now().await;
        sync.tick(now);
    }
}

/// A controller signed in as `name` against `store`, with the load applied.
pub async fn signed_in(store: &MemoryProfileStore, name: &str, now: Instant) -> ProfileSync {
    let mut sync = ProfileSync::new(Arc::new(store.clone()), fast_settings());
    sync.sign_in(user(name));
    settle(&mut sync, now).await;
    sync
}

/// Walks a clock forward in fixed steps.
pub struct Clock {
    now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: Instant::now() }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }
}
