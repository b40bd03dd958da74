//! Boundary to the authoritative profile store.
//!
//! The engine never talks to a database or network directly; it drives a
//! [`ProfileStore`] implementation supplied by the host. Implementations must
//! make `record_flip` atomic per user: two overlapping calls for the same user
//! both increment the counter.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use bitflip_types::{Appearance, FlipState, Profile, UnlockSet, UserId};

/// Store call future type alias.
pub type StoreFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no profile for user {user}")]
    NotFound { user: UserId },
    #[error("profile store unavailable: {message}")]
    Unavailable { message: String },
    #[error("profile store rejected the request: {message}")]
    Rejected { message: String },
    #[error("profile store did not answer within {elapsed:?}")]
    Timeout { elapsed: Duration },
}

/// Authoritative persistence for the profile aggregate.
pub trait ProfileStore: Send + Sync {
    fn get_profile<'a>(&'a self, user: &'a UserId) -> StoreFut<'a, Profile>;

    /// Atomically toggle the bit and increment the counter.
    ///
    /// Returns the state after this flip was applied.
    fn record_flip<'a>(&'a self, user: &'a UserId) -> StoreFut<'a, FlipState>;

    /// Replace the stored appearance and unlock set wholesale.
    fn write_appearance_and_unlocks<'a>(
        &'a self,
        user: &'a UserId,
        appearance: &'a Appearance,
        unlocks: &'a UnlockSet,
    ) -> StoreFut<'a, ()>;
}

/// Await a store call, optionally bounded by `limit`.
pub(crate) async fn bounded<T>(
    limit: Option<Duration>,
    call: StoreFut<'_, T>,
) -> Result<T, StoreError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(StoreError::Timeout { elapsed: limit })),
        None => call.await,
    }
}
