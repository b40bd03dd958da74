//! Controller state machine types.

use bitflip_types::{FlipState, Profile, UnlockSet, UserId};

use crate::store::StoreError;

/// Who the controller is acting for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No authenticated profile. Every operation is a no-op.
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// Flip input gate.
///
/// `Pending` lasts for the cooldown after an accepted flip, regardless of
/// whether the remote commit has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    Idle,
    Pending,
}

impl FlipPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
        }
    }
}

/// Sequence number of an accepted flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct FlipTicket(u64);

impl FlipTicket {
    pub(crate) const FIRST: Self = Self(0);

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Local view captured before an optimistic flip.
#[derive(Debug, Clone)]
pub(crate) struct FlipSnapshot {
    pub(crate) ticket: FlipTicket,
    pub(crate) state: FlipState,
    pub(crate) unlocks: UnlockSet,
}

#[derive(Debug)]
pub(crate) enum CompletionKind {
    Flip {
        ticket: FlipTicket,
        result: Result<FlipState, StoreError>,
    },
    Write {
        result: Result<(), StoreError>,
    },
    Load {
        result: Result<Profile, StoreError>,
    },
}

/// A finished remote call, tagged with the session epoch it was issued in.
#[derive(Debug)]
pub(crate) struct Completion {
    pub(crate) epoch: u64,
    pub(crate) kind: CompletionKind,
}
