//! The profile controller: optimistic flips, debounced appearance writes and
//! self-healing resync.
//!
//! [`ProfileSync`] owns the local view (flip state, unlocks, appearance) and
//! is the only thing the UI talks to. Operations apply their local effect
//! immediately and hand remote work to spawned tokio tasks. Those tasks report
//! back over a channel that [`ProfileSync::tick`] drains, so every state change
//! happens on the caller's thread, in the caller's order.
//!
//! Methods that start remote work must be called from inside a tokio runtime.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use bitflip_types::{
    Appearance, AppearanceChange, FlipState, Profile, RawAppearance, SyncSettings, UnlockSet,
    UserId, compute_unlocks, normalize,
};

use crate::notifications::{NotificationQueue, SyncNotification};
use crate::state::{Completion, CompletionKind, FlipPhase, FlipSnapshot, FlipTicket, Session};
use crate::store::{ProfileStore, StoreError, bounded};
use crate::timer::Deadline;

/// Maximum completions handled per tick.
const COMPLETION_BUDGET: usize = 64;

pub struct ProfileSync {
    store: Arc<dyn ProfileStore>,
    settings: SyncSettings,
    session: Session,
    /// Bumped on every session change; completions from older epochs are dropped.
    epoch: u64,

    flip: FlipState,
    unlocks: UnlockSet,
    appearance: Appearance,

    cooldown: Deadline,
    persist: Deadline,
    /// Snapshots of flips whose commit has not come back, oldest first.
    in_flight: Vec<FlipSnapshot>,
    next_ticket: FlipTicket,
    /// Newest flip whose commit succeeded.
    confirmed: Option<FlipTicket>,
    writes_in_flight: usize,
    outstanding: usize,

    notifications: NotificationQueue,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl std::fmt::Debug for ProfileSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSync")
            .field("session", &self.session)
            .field("flip", &self.flip)
            .field("unlocks", &self.unlocks)
            .field("phase", &self.phase())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl ProfileSync {
    /// A signed-out controller showing the default view.
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>, settings: SyncSettings) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            store,
            settings,
            session: Session::Anonymous,
            epoch: 0,
            flip: FlipState::default(),
            unlocks: UnlockSet::new(),
            appearance: Appearance::default(),
            cooldown: Deadline::new(),
            persist: Deadline::new(),
            in_flight: Vec::new(),
            next_ticket: FlipTicket::FIRST,
            confirmed: None,
            writes_in_flight: 0,
            outstanding: 0,
            notifications: NotificationQueue::new(),
            completion_tx,
            completion_rx,
        }
    }

    #[must_use]
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    #[must_use]
    pub fn flip_state(&self) -> FlipState {
        self.flip
    }

    #[must_use]
    pub fn unlocks(&self) -> &UnlockSet {
        &self.unlocks
    }

    #[must_use]
    pub fn phase(&self) -> FlipPhase {
        if self.cooldown.is_armed() {
            FlipPhase::Pending
        } else {
            FlipPhase::Idle
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<SyncNotification> {
        self.notifications.take()
    }

    /// Earliest instant at which `tick` has timer work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.cooldown.due(), self.persist.due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether an appearance write is waiting on the debounce timer.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.persist.is_armed()
    }

    /// Whether any remote call has not reported back yet.
    #[must_use]
    pub fn has_outstanding(&self) -> bool {
        self.outstanding > 0
    }

    /// Act for `user` from now on and load their profile.
    ///
    /// The view resets to defaults until the load completes. A pending write
    /// for the previous user is flushed first.
    pub fn sign_in(&mut self, user: UserId) {
        self.flush_pending_write();
        tracing::info!(user = %user, "Signed in");
        self.reset(Session::Authenticated(user));
        self.resync();
    }

    /// Drop the session. The view returns to defaults and results of calls
    /// issued before this point are ignored.
    pub fn sign_out(&mut self) {
        if matches!(self.session, Session::Anonymous) {
            return;
        }
        self.flush_pending_write();
        tracing::info!("Signed out");
        self.reset(Session::Anonymous);
    }

    fn reset(&mut self, session: Session) {
        self.epoch = self.epoch.wrapping_add(1);
        self.session = session;
        self.flip = FlipState::default();
        self.unlocks = UnlockSet::new();
        self.appearance = Appearance::default();
        self.cooldown.cancel();
        self.persist.cancel();
        self.in_flight.clear();
        self.confirmed = None;
        self.writes_in_flight = 0;
    }

    /// Toggle the bit optimistically and commit it to the store.
    ///
    /// Dropped while the cooldown from a previous flip is running.
    pub fn request_flip(&mut self, now: Instant) {
        let Some(user) = self.session.user().cloned() else {
            tracing::debug!("Flip ignored: not signed in");
            return;
        };
        self.cooldown.fire(now);
        if self.cooldown.is_armed() {
            tracing::debug!("Flip dropped: cooldown running");
            return;
        }

        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        self.in_flight.push(FlipSnapshot {
            ticket,
            state: self.flip,
            unlocks: self.unlocks.clone(),
        });

        let next = self.flip.flipped();
        self.unlocks = compute_unlocks(next.counter, &self.unlocks);
        self.flip = next;
        self.cooldown.schedule(now, self.settings.flip_cooldown());
        tracing::info!(
            user = %user,
            status = next.status,
            counter = next.counter,
            "Flip applied locally"
        );

        let store = Arc::clone(&self.store);
        let limit = self.settings.remote_timeout();
        self.spawn(async move {
            let result = bounded(limit, store.record_flip(&user)).await;
            CompletionKind::Flip { ticket, result }
        });
    }

    /// Apply an edit locally and (re)start the debounce for persisting it.
    ///
    /// Edits the current unlocks do not allow change nothing and leave the
    /// timer alone.
    pub fn request_appearance_change(&mut self, change: &AppearanceChange, now: Instant) {
        if matches!(self.session, Session::Anonymous) {
            tracing::debug!("Appearance change ignored: not signed in");
            return;
        }
        let next = change.apply(&self.appearance, &self.unlocks);
        if next == self.appearance {
            tracing::debug!(?change, "Appearance change refused or unchanged");
            return;
        }
        self.appearance = next;
        self.schedule_persist(now);
    }

    /// Reload the authoritative profile.
    pub fn resync(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            tracing::debug!("Resync ignored: not signed in");
            return;
        };
        tracing::info!(user = %user, "Loading profile");
        let store = Arc::clone(&self.store);
        let limit = self.settings.remote_timeout();
        self.spawn(async move {
            let result = bounded(limit, store.get_profile(&user)).await;
            CompletionKind::Load { result }
        });
    }

    /// Process finished remote calls and elapsed timers.
    ///
    /// Non-blocking. Returns the number of completions handled.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut processed = 0;
        while processed < COMPLETION_BUDGET {
            match self.completion_rx.try_recv() {
                Ok(completion) => {
                    self.handle_completion(completion, now);
                    processed += 1;
                }
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
            }
        }

        if self.cooldown.fire(now) {
            tracing::debug!("Flip cooldown elapsed");
        }
        if self.persist.fire(now) {
            self.issue_write();
        }
        processed
    }

    /// Tear down: stop the cooldown and send any debounced write now.
    pub fn shutdown(&mut self) {
        self.cooldown.cancel();
        self.flush_pending_write();
    }

    fn flush_pending_write(&mut self) {
        if self.persist.is_armed() {
            self.persist.cancel();
            self.issue_write();
        }
    }

    fn schedule_persist(&mut self, now: Instant) {
        self.persist.schedule(now, self.settings.appearance_debounce());
    }

    /// Unlocks backed by a committed counter. Gains of flips still in flight
    /// stay local until their commit succeeds.
    fn committed_unlocks(&self) -> &UnlockSet {
        self.in_flight
            .first()
            .map_or(&self.unlocks, |oldest| &oldest.unlocks)
    }

    fn issue_write(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            return;
        };
        let unlocks = self.committed_unlocks().clone();
        let appearance = normalize(&RawAppearance::from(&self.appearance), &unlocks);
        tracing::debug!(user = %user, unlocks = ?unlocks.to_ids(), "Writing appearance");

        self.writes_in_flight += 1;
        let store = Arc::clone(&self.store);
        let limit = self.settings.remote_timeout();
        self.spawn(async move {
            let result = bounded(
                limit,
                store.write_appearance_and_unlocks(&user, &appearance, &unlocks),
            )
            .await;
            CompletionKind::Write { result }
        });
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: Future<Output = CompletionKind> + Send + 'static,
    {
        let epoch = self.epoch;
        let tx = self.completion_tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            let kind = call.await;
            // Receiver gone means the controller was dropped; nothing to report to.
            let _ = tx.send(Completion { epoch, kind });
        });
    }

    fn handle_completion(&mut self, completion: Completion, now: Instant) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if completion.epoch != self.epoch {
            tracing::debug!(
                epoch = completion.epoch,
                current = self.epoch,
                "Ignoring completion from a previous session"
            );
            return;
        }
        match completion.kind {
            CompletionKind::Flip { ticket, result } => self.finish_flip(ticket, result, now),
            CompletionKind::Write { result } => self.finish_write(result),
            CompletionKind::Load { result } => self.finish_load(result, now),
        }
    }

    fn take_snapshot(&mut self, ticket: FlipTicket) -> Option<FlipSnapshot> {
        let index = self.in_flight.iter().position(|s| s.ticket == ticket)?;
        Some(self.in_flight.remove(index))
    }

    /// Whether a flip issued after `ticket` is still pending or already won.
    fn superseded(&self, ticket: FlipTicket) -> bool {
        self.in_flight.iter().any(|s| s.ticket > ticket)
            || self.confirmed.is_some_and(|confirmed| confirmed > ticket)
    }

    fn finish_flip(
        &mut self,
        ticket: FlipTicket,
        result: Result<FlipState, StoreError>,
        now: Instant,
    ) {
        let Some(snapshot) = self.take_snapshot(ticket) else {
            tracing::debug!(?ticket, "Flip completion without snapshot");
            return;
        };
        match result {
            Ok(remote) => self.confirm_flip(&snapshot, remote),
            Err(err) => self.roll_back_flip(snapshot, &err, now),
        }
    }

    fn confirm_flip(&mut self, snapshot: &FlipSnapshot, remote: FlipState) {
        let earned = compute_unlocks(remote.counter, &snapshot.unlocks);
        let gained = earned.gained_since(&snapshot.unlocks);
        for pending in &mut self.in_flight {
            pending.unlocks = pending.unlocks.union(&earned);
        }

        if self.superseded(snapshot.ticket) {
            self.unlocks = self.unlocks.union(&earned);
        } else {
            if remote != self.flip {
                tracing::info!(
                    local = ?self.flip,
                    remote = ?remote,
                    "Adopting remote flip state"
                );
            }
            self.flip = remote;
            self.unlocks = compute_unlocks(remote.counter, &self.unlocks.union(&earned));
            self.confirmed = Some(snapshot.ticket);
        }
        tracing::debug!(counter = remote.counter, "Flip committed");

        if gained.is_empty() {
            return;
        }
        tracing::info!(ids = ?gained, "Unlocks earned");
        self.notifications
            .push(SyncNotification::UnlocksEarned { ids: gained });
        // A debounced write picks up the new unlocks when it fires.
        if !self.persist.is_armed() {
            self.issue_write();
        }
    }

    fn roll_back_flip(&mut self, snapshot: FlipSnapshot, err: &StoreError, now: Instant) {
        tracing::warn!(
            error = %err,
            restored = ?snapshot.state,
            "Flip commit failed; rolling back"
        );
        // A newer flip already committed; the view holds its remote state.
        if self.confirmed.is_some_and(|confirmed| confirmed > snapshot.ticket) {
            self.notifications.push(SyncNotification::FlipRolledBack {
                restored: self.flip,
                reason: err.to_string(),
            });
            return;
        }

        // Newer flips were applied on top of this one; their rollback target
        // becomes the state before it.
        for newer in self.in_flight.iter_mut().filter(|s| s.ticket > snapshot.ticket) {
            newer.state = snapshot.state;
            newer.unlocks = snapshot.unlocks.clone();
        }

        self.flip = snapshot.state;
        self.unlocks = snapshot.unlocks;
        self.notifications.push(SyncNotification::FlipRolledBack {
            restored: snapshot.state,
            reason: err.to_string(),
        });

        let repaired = normalize(&RawAppearance::from(&self.appearance), &self.unlocks);
        if repaired != self.appearance {
            tracing::info!("Appearance re-normalized against restored unlocks");
            self.appearance = repaired;
            self.schedule_persist(now);
        }
    }

    fn finish_write(&mut self, result: Result<(), StoreError>) {
        self.writes_in_flight = self.writes_in_flight.saturating_sub(1);
        match result {
            Ok(()) => tracing::debug!("Appearance saved"),
            Err(err) => {
                tracing::warn!(error = %err, "Appearance write failed; resyncing");
                self.notifications.push(SyncNotification::AppearanceResync {
                    reason: err.to_string(),
                });
                self.resync();
            }
        }
    }

    fn finish_load(&mut self, result: Result<Profile, StoreError>, now: Instant) {
        let profile = match result {
            Ok(profile) => profile,
            Err(StoreError::NotFound { user }) => {
                tracing::warn!(user = %user, "Profile missing");
                self.notifications.push(SyncNotification::ProfileMissing);
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Profile load failed");
                self.notifications.push(SyncNotification::ResyncFailed {
                    reason: err.to_string(),
                });
                return;
            }
        };
        self.apply_profile(&profile, now);
    }

    /// Merge an authoritative profile into the local view.
    ///
    /// Unlocks only grow. Flip state is adopted unless a flip is still in
    /// flight. Appearance is adopted unless local edits have not reached the
    /// store yet.
    fn apply_profile(&mut self, profile: &Profile, now: Instant) {
        let remote_flip = profile.flip_state();
        let stored = compute_unlocks(remote_flip.counter, &profile.unlocks);
        for pending in &mut self.in_flight {
            pending.unlocks = pending.unlocks.union(&stored);
        }
        let unlocks = stored.union(&self.unlocks);
        if self.in_flight.is_empty() {
            self.flip = remote_flip;
        }

        let local_edits_pending = self.persist.is_armed() || self.writes_in_flight > 0;
        let appearance = if local_edits_pending {
            normalize(&RawAppearance::from(&self.appearance), &unlocks)
        } else {
            normalize(&profile.appearance, &unlocks)
        };

        self.unlocks = unlocks;
        self.appearance = appearance;
        let stored_differs = RawAppearance::from(&self.appearance) != profile.appearance
            || *self.committed_unlocks() != profile.unlocks;
        tracing::info!(
            status = self.flip.status,
            counter = self.flip.counter,
            unlocks = ?self.unlocks.to_ids(),
            "Profile loaded"
        );

        if stored_differs && !self.persist.is_armed() {
            tracing::debug!("Stored profile needs repair; scheduling write");
            self.schedule_persist(now);
        }
    }
}
