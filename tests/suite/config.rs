//! Configuration wiring tests

use std::sync::Arc;
use std::time::Instant;

use bitflip_config::BitflipConfig;
use bitflip_engine::{AppearanceChange, ColourSlot, MemoryProfileStore, ProfileSync};
use bitflip_types::BASE_PALETTE;

use crate::common::{ms, settle, user};

#[tokio::test]
async fn configured_debounce_drives_the_controller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[sync]\nflip_cooldown_ms = 50\nappearance_debounce_ms = 40\n\n[session]\nuser_id = \"ada\"\n",
    )
    .unwrap();

    let config = BitflipConfig::load_from(&path).unwrap();
    let ada = config.user_id().unwrap();
    assert_eq!(ada, user("ada"));

    let store = MemoryProfileStore::new();
    store.create_account(&ada);
    let mut sync = ProfileSync::new(Arc::new(store.clone()), config.sync_settings());
    let t0 = Instant::now();
    sync.sign_in(ada);
    settle(&mut sync, t0).await;

    sync.request_appearance_change(
        &AppearanceChange::FillColour(ColourSlot::Primary, BASE_PALETTE[6]),
        t0,
    );
    settle(&mut sync, t0 + ms(39)).await;
    assert!(store.writes().is_empty());
    settle(&mut sync, t0 + ms(40)).await;
    assert_eq!(store.writes().len(), 1);

    sync.request_flip(t0);
    sync.request_flip(t0 + ms(50));
    settle(&mut sync, t0 + ms(50)).await;
    assert_eq!(store.flip_calls(), 2);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let config = BitflipConfig::parse("[session]\n").unwrap();
    assert_eq!(
        config.sync_settings(),
        bitflip_engine::SyncSettings::default()
    );
    assert!(config.user_id().is_none());
}
