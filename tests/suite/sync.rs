//! End-to-end controller scenarios against the in-memory store

use std::sync::Arc;

use bitflip_engine::{
    AppearanceChange, FlipPhase, FlipState, MemoryProfileStore, ProfileSync, SyncNotification,
};
use bitflip_types::unlock::ids;
use bitflip_types::{BorderStyle, FillStyle};

use crate::common::{Clock, fast_settings, ms, settle, signed_in, user};

#[tokio::test]
async fn thirty_two_flips_unlock_patterns_and_persist() {
    let mut clock = Clock::new();
    let store = MemoryProfileStore::new();
    store.create_account(&user("ada"));
    let mut sync = signed_in(&store, "ada", clock.now()).await;

    let mut earned = Vec::new();
    for _ in 0..32 {
        sync.request_flip(clock.now());
        settle(&mut sync, clock.now()).await;
        for notification in sync.take_notifications() {
            if let SyncNotification::UnlocksEarned { ids } = notification {
                earned.extend(ids);
            }
        }
        clock.advance(ms(100));
    }

    assert_eq!(sync.flip_state(), FlipState::new(false, 32));
    assert_eq!(
        earned,
        vec![
            ids::FILL_GRADIENT,
            ids::FILL_STRIPES,
            ids::FILL_COLOURS_PACK1,
            ids::FILL_PATTERNS_PACK1,
            "cycles.0",
        ]
    );
    let stored = store.profile(&user("ada")).unwrap();
    assert_eq!(stored.flip_state(), FlipState::new(false, 32));
    assert_eq!(stored.unlocks, *sync.unlocks());
}

#[tokio::test]
async fn edits_survive_a_fresh_session() {
    let mut clock = Clock::new();
    let store = MemoryProfileStore::new();
    let mut profile = bitflip_engine::Profile::new_account();
    profile.counter = 32;
    store.insert_profile(&user("ada"), profile);

    let mut first = signed_in(&store, "ada", clock.now()).await;
    first.request_appearance_change(
        &AppearanceChange::FillStyle(FillStyle::Pattern),
        clock.now(),
    );
    first.request_appearance_change(
        &AppearanceChange::BorderStyle(BorderStyle::Pattern),
        clock.advance(ms(50)),
    );
    settle(&mut first, clock.advance(ms(200))).await;
    assert!(!first.has_pending_write());

    let second = signed_in(&store, "ada", clock.now()).await;
    assert_eq!(second.appearance(), first.appearance());
    assert_eq!(second.appearance().fill().style(), FillStyle::Pattern);
    assert_eq!(second.unlocks(), first.unlocks());
}

#[tokio::test]
async fn rapid_taps_commit_once_per_cooldown() {
    let mut clock = Clock::new();
    let store = MemoryProfileStore::new();
    store.create_account(&user("ada"));
    let mut sync = signed_in(&store, "ada", clock.now()).await;

    // Ten taps 20ms apart span two cooldown windows.
    for _ in 0..10 {
        sync.request_flip(clock.now());
        sync.tick(clock.now());
        clock.advance(ms(20));
    }
    settle(&mut sync, clock.now()).await;

    assert_eq!(store.flip_calls(), 2);
    assert_eq!(sync.flip_state(), FlipState::new(false, 2));
    assert_eq!(store.profile(&user("ada")).unwrap().counter, 2);
}

#[tokio::test]
async fn outage_rolls_back_then_recovers() {
    let mut clock = Clock::new();
    let store = MemoryProfileStore::new();
    store.create_account(&user("ada"));
    let mut sync = signed_in(&store, "ada", clock.now()).await;

    store.fail_next_flips(2);
    for _ in 0..2 {
        sync.request_flip(clock.now());
        settle(&mut sync, clock.now()).await;
        assert_eq!(sync.flip_state(), FlipState::default());
        clock.advance(ms(100));
    }
    let notifications = sync.take_notifications();
    assert_eq!(notifications.len(), 2);
    assert!(
        notifications
            .iter()
            .all(|n| matches!(n, SyncNotification::FlipRolledBack { .. }))
    );

    sync.request_flip(clock.now());
    settle(&mut sync, clock.now()).await;
    assert_eq!(sync.flip_state(), FlipState::new(true, 1));
    assert_eq!(sync.phase(), FlipPhase::Pending);
}

#[tokio::test]
async fn switching_users_keeps_profiles_apart() {
    let clock = Clock::new();
    let store = MemoryProfileStore::new();
    store.create_account(&user("ada"));
    store.create_account(&user("bob"));

    let mut sync = ProfileSync::new(Arc::new(store.clone()), fast_settings());
    sync.sign_in(user("ada"));
    settle(&mut sync, clock.now()).await;
    sync.request_flip(clock.now());
    settle(&mut sync, clock.now()).await;

    sync.sign_in(user("bob"));
    settle(&mut sync, clock.now()).await;
    assert_eq!(sync.flip_state(), FlipState::default());
    assert_eq!(sync.phase(), FlipPhase::Idle);

    assert_eq!(store.profile(&user("ada")).unwrap().counter, 1);
    assert_eq!(store.profile(&user("bob")).unwrap().counter, 0);
}
