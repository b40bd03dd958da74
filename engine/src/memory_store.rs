//! In-process [`ProfileStore`] used by the demo shell and tests.
//!
//! All state sits behind one mutex, which makes `record_flip` trivially
//! atomic. Faults and latency can be injected to exercise rollback and resync
//! paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bitflip_types::{Appearance, FlipState, Profile, RawAppearance, UnlockSet, UserId};

use crate::store::{ProfileStore, StoreError, StoreFut};

/// One accepted `write_appearance_and_unlocks` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub user: UserId,
    pub appearance: Appearance,
    pub unlocks: UnlockSet,
}

#[derive(Debug, Default)]
struct Faults {
    reads: u32,
    flips: u32,
    writes: u32,
}

impl Faults {
    fn take(counter: &mut u32) -> bool {
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }
}

#[derive(Debug, Default)]
struct Inner {
    profiles: HashMap<UserId, Profile>,
    faults: Faults,
    latency: Option<Duration>,
    flip_calls: u64,
    writes: Vec<WriteRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    inner: Arc<Mutex<Inner>>,
}

fn injected() -> StoreError {
    StoreError::Unavailable {
        message: "injected fault".to_string(),
    }
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a fresh account for `user` if none exists.
    pub fn create_account(&self, user: &UserId) {
        self.lock()
            .profiles
            .entry(user.clone())
            .or_insert_with(Profile::new_account);
    }

    pub fn insert_profile(&self, user: &UserId, profile: Profile) {
        self.lock().profiles.insert(user.clone(), profile);
    }

    #[must_use]
    pub fn profile(&self, user: &UserId) -> Option<Profile> {
        self.lock().profiles.get(user).cloned()
    }

    /// Fail the next `count` `get_profile` calls.
    pub fn fail_next_reads(&self, count: u32) {
        self.lock().faults.reads = count;
    }

    /// Fail the next `count` `record_flip` calls.
    pub fn fail_next_flips(&self, count: u32) {
        self.lock().faults.flips = count;
    }

    /// Fail the next `count` appearance writes.
    pub fn fail_next_writes(&self, count: u32) {
        self.lock().faults.writes = count;
    }

    /// Delay every call by `latency` before it touches state.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Number of `record_flip` calls received, failed ones included.
    #[must_use]
    pub fn flip_calls(&self) -> u64 {
        self.lock().flip_calls
    }

    /// Successful appearance writes, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    async fn simulate_latency(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get_profile<'a>(&'a self, user: &'a UserId) -> StoreFut<'a, Profile> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut inner = self.lock();
            if Faults::take(&mut inner.faults.reads) {
                return Err(injected());
            }
            inner
                .profiles
                .get(user)
                .cloned()
                .ok_or_else(|| StoreError::NotFound { user: user.clone() })
        })
    }

    fn record_flip<'a>(&'a self, user: &'a UserId) -> StoreFut<'a, FlipState> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut inner = self.lock();
            inner.flip_calls += 1;
            if Faults::take(&mut inner.faults.flips) {
                return Err(injected());
            }
            let profile = inner
                .profiles
                .get_mut(user)
                .ok_or_else(|| StoreError::NotFound { user: user.clone() })?;
            let next = profile.flip_state().flipped();
            profile.status = next.status;
            profile.counter = next.counter;
            Ok(next)
        })
    }

    fn write_appearance_and_unlocks<'a>(
        &'a self,
        user: &'a UserId,
        appearance: &'a Appearance,
        unlocks: &'a UnlockSet,
    ) -> StoreFut<'a, ()> {
        Box::pin(async move {
            self.simulate_latency().await;
            let mut inner = self.lock();
            if Faults::take(&mut inner.faults.writes) {
                return Err(injected());
            }
            let profile = inner
                .profiles
                .get_mut(user)
                .ok_or_else(|| StoreError::NotFound { user: user.clone() })?;
            profile.appearance = RawAppearance::from(appearance);
            profile.unlocks = unlocks.clone();
            inner.writes.push(WriteRecord {
                user: user.clone(),
                appearance: *appearance,
                unlocks: unlocks.clone(),
            });
            Ok(())
        })
    }
}
