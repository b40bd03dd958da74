//! Notifications surfaced to the consumer after remote outcomes.
//!
//! The controller never returns errors from its operations. Anything the user
//! should hear about (a rolled-back flip, a healed divergence, new unlocks)
//! lands in a [`NotificationQueue`] that the UI drains when convenient.

use bitflip_types::FlipState;

/// An event the UI may want to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotification {
    /// A flip commit failed and the local view was restored.
    FlipRolledBack {
        /// The state the view was restored to.
        restored: FlipState,
        reason: String,
    },
    /// An appearance write failed; the authoritative profile is being reloaded.
    AppearanceResync { reason: String },
    /// Reloading the authoritative profile failed. Local state is kept.
    ResyncFailed { reason: String },
    /// The store has no profile for the signed-in user.
    ProfileMissing,
    /// A flip earned new unlocks.
    UnlocksEarned { ids: Vec<String> },
}

impl SyncNotification {
    /// Short, human-readable text for status lines.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::FlipRolledBack { restored, reason } => format!(
                "Flip failed ({reason}); restored to {} after {} flips",
                if restored.status { "on" } else { "off" },
                restored.counter
            ),
            Self::AppearanceResync { reason } => {
                format!("Could not save appearance ({reason}); reloading profile")
            }
            Self::ResyncFailed { reason } => format!("Could not reload profile: {reason}"),
            Self::ProfileMissing => "No profile found for this account".to_string(),
            Self::UnlocksEarned { ids } => format!("Unlocked: {}", ids.join(", ")),
        }
    }

    /// Whether this reports one specific occurrence rather than a condition.
    fn is_event(&self) -> bool {
        matches!(self, Self::FlipRolledBack { .. } | Self::UnlocksEarned { .. })
    }
}

/// Queue of pending notifications.
///
/// Every event is kept. A repeated condition (a failed reload, a missing
/// profile) that is still waiting to be taken is kept once.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<SyncNotification>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: SyncNotification) {
        if notification.is_event() || !self.pending.contains(&notification) {
            self.pending.push(notification);
        }
    }

    /// Take all pending notifications in insertion order.
    pub fn take(&mut self) -> Vec<SyncNotification> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let rolled_back = SyncNotification::FlipRolledBack {
            restored: FlipState::new(false, 3),
            reason: "offline".to_string(),
        };
        assert_eq!(
            rolled_back.message(),
            "Flip failed (offline); restored to off after 3 flips"
        );
        assert_eq!(
            SyncNotification::UnlocksEarned {
                ids: vec!["fill.gradient".to_string(), "fill.stripes".to_string()],
            }
            .message(),
            "Unlocked: fill.gradient, fill.stripes"
        );
    }

    #[test]
    fn queue_push_and_take() {
        let mut queue = NotificationQueue::new();
        assert!(queue.is_empty());

        queue.push(SyncNotification::ProfileMissing);
        queue.push(SyncNotification::ResyncFailed {
            reason: "down".to_string(),
        });
        assert_eq!(queue.len(), 2);

        let taken = queue.take();
        assert_eq!(taken[0], SyncNotification::ProfileMissing);
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_deduplicates() {
        let mut queue = NotificationQueue::new();
        queue.push(SyncNotification::ProfileMissing);
        queue.push(SyncNotification::ProfileMissing);
        queue.push(SyncNotification::AppearanceResync {
            reason: "x".to_string(),
        });
        queue.push(SyncNotification::ProfileMissing);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn queue_keeps_each_rollback() {
        let mut queue = NotificationQueue::new();
        let rolled_back = SyncNotification::FlipRolledBack {
            restored: FlipState::default(),
            reason: "offline".to_string(),
        };
        queue.push(rolled_back.clone());
        queue.push(rolled_back);
        assert_eq!(queue.len(), 2);
    }
}
