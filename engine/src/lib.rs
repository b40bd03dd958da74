//! Sync engine for Bitflip.
//!
//! This crate owns the profile controller and its collaborators. It has no UI
//! and no real backend: the host supplies a [`ProfileStore`] and drives
//! [`ProfileSync::tick`] from its event loop.

mod memory_store;
mod notifications;
mod state;
mod store;
mod sync;
mod timer;

pub use memory_store::{MemoryProfileStore, WriteRecord};
pub use notifications::{NotificationQueue, SyncNotification};
pub use state::{FlipPhase, Session};
pub use store::{ProfileStore, StoreError, StoreFut};
pub use sync::ProfileSync;
pub use timer::Deadline;

pub use bitflip_types::{
    Appearance, AppearanceChange, ColourSlot, FlipState, Profile, SyncSettings, UnlockSet, UserId,
};
