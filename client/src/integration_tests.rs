//! Integration tests for the client core — cross-module flows that
//! wire the configuration applier and the kiosk enforcer together the
//! way a real page load does.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::configuration::ConfigurationApplier;
use crate::kiosk::enforcer::{KioskEnforcer, KioskTimings};
use crate::page::{KioskMode, Page, PageState};
use crate::socket::events::{ClientEvent, ServerEvent};
use crate::socket::handle::SocketHandle;
use crate::state::models::{Channel, ChannelKind, Network, ServerConfiguration, ThemeInfo};
use crate::state::settings::{SettingUpdate, SettingsController};
use crate::state::store::Store;
use crate::storage::LocalStorage;
use crate::upload::UploadManager;

fn fast_timings() -> KioskTimings {
    KioskTimings {
        ready_timeout: Duration::from_secs(1),
        join_timeout: Duration::from_secs(1),
        sweep_interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_kiosk_page_load_end_to_end() {
    let store = Arc::new(Store::new());
    let storage = Arc::new(LocalStorage::in_memory());
    storage.set("curia.theme", "midnight");

    let page = Arc::new(Page::new(PageState {
        mode: KioskMode::SingleChannel,
        focus: Some("%23General".into()),
        public: true,
        ..PageState::default()
    }));
    let uploads = Arc::new(UploadManager::new());
    let (socket, mut outbound) = SocketHandle::new();
    let cancel = CancellationToken::new();

    // The transport delivers server pushes over this channel.
    let (server_tx, server_rx) = mpsc::unbounded_channel();
    let applier = ConfigurationApplier::new(
        store.clone(),
        storage.clone(),
        page.clone(),
        uploads.clone(),
    );
    let applier_task = tokio::spawn(applier.run(server_rx, cancel.clone()));

    let enforcer = KioskEnforcer::new(store.clone(), socket, page.clone(), fast_timings());
    let enforcer_task = tokio::spawn({
        let cancel = cancel.clone();
        async move { enforcer.run(cancel).await }
    });

    server_tx
        .send(ServerEvent::Configuration(ServerConfiguration {
            themes: vec![ThemeInfo {
                name: "default".into(),
                theme_color: Some("#1a1a1a".into()),
            }],
            default_theme: "default".into(),
            file_upload: true,
        }))
        .unwrap();

    // The application finishes loading with only the lobby joined.
    store.update(|state| {
        state.app_loaded = true;
        state.networks = vec![Network::new(
            "libera",
            vec![Channel::new(1, "libera", ChannelKind::Lobby)],
        )];
    });

    // The enforcer joins the focus channel through the lobby.
    let event = timeout(Duration::from_secs(1), outbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        ClientEvent::Input {
            target: 1,
            text: "JOIN #general".into(),
        }
    );

    // The server acknowledges the join.
    store.update(|state| {
        state.networks[0]
            .channels
            .push(Channel::new(7, "#general", ChannelKind::Channel));
    });

    let mut page_rx = page.subscribe();
    page_rx
        .wait_for(|s| s.target_channel == Some(7))
        .await
        .unwrap();
    page_rx
        .wait_for(|s| s.unload_confirmation.is_some())
        .await
        .unwrap();

    let snapshot = page.snapshot();
    assert_eq!(snapshot.kiosk_theme.as_deref(), Some("midnight"));
    assert!(snapshot.css_classes.contains("curia-theme-midnight"));
    assert_eq!(snapshot.theme_color.as_deref(), Some("#1a1a1a"));
    assert!(uploads.is_initialized());

    cancel.cancel();
    enforcer_task.await.unwrap().unwrap();
    applier_task.await.unwrap();
}

#[tokio::test]
async fn test_housekeeping_parts_channel_joined_after_resolution() {
    let store = Arc::new(Store::new());
    store.update(|state| {
        state.app_loaded = true;
        state.networks = vec![Network::new(
            "libera",
            vec![
                Channel::new(1, "libera", ChannelKind::Lobby),
                Channel::new(2, "#general", ChannelKind::Channel),
            ],
        )];
    });

    let page = Arc::new(Page::new(PageState {
        mode: KioskMode::SingleChannel,
        focus: Some("general".into()),
        ..PageState::default()
    }));
    let (socket, mut outbound) = SocketHandle::new();
    let enforcer = KioskEnforcer::new(store.clone(), socket, page.clone(), fast_timings());

    let cancel = CancellationToken::new();
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move { enforcer.run(cancel).await }
    });

    let mut page_rx = page.subscribe();
    page_rx
        .wait_for(|s| s.target_channel == Some(2))
        .await
        .unwrap();

    // A stray channel shows up after the target was resolved; the next
    // sweep parts it.
    store.update(|state| {
        state.networks[0]
            .channels
            .push(Channel::new(3, "#random", ChannelKind::Channel));
    });

    let event = timeout(Duration::from_secs(1), outbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        ClientEvent::Input {
            target: 1,
            text: "PART #random".into(),
        }
    );

    cancel.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_settings_survive_restart_through_storage_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let store = Arc::new(Store::new());
        let storage = Arc::new(LocalStorage::open(&path));
        let controller = SettingsController::new(store.clone(), storage);
        controller.update(SettingUpdate {
            name: "theme".into(),
            value: "morning".into(),
            sync: true,
        });
        assert_eq!(store.snapshot().settings.theme, "morning");
    }

    // Fresh store and storage, as after a page reload.
    let store = Arc::new(Store::new());
    let storage = Arc::new(LocalStorage::open(&path));
    let controller = SettingsController::new(store.clone(), storage);

    assert_eq!(store.snapshot().settings.theme, "default");
    controller.apply_all();
    assert_eq!(store.snapshot().settings.theme, "morning");
}
