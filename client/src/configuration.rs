use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::page::Page;
use crate::socket::events::ServerEvent;
use crate::state::models::ServerConfiguration;
use crate::state::settings::{SettingUpdate, SettingsController, THEME_SETTING};
use crate::state::store::Store;
use crate::storage::LocalStorage;
use crate::upload::UploadManager;

/// Local-storage key holding the kiosk-specific theme preference.
pub const KIOSK_THEME_KEY: &str = "curia.theme";

/// Confirmation shown when navigating away from a public page.
const UNLOAD_MESSAGE: &str = "Are you sure you want to navigate away from this page?";

/// The applier either hasn't seen a configuration yet or has applied
/// exactly one; repeated payloads never re-apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplierState {
    Unconfigured,
    Configured,
}

/// Applies the server-pushed configuration to client state, exactly
/// once per page lifetime.
pub struct ConfigurationApplier {
    store: Arc<Store>,
    storage: Arc<LocalStorage>,
    page: Arc<Page>,
    uploads: Arc<UploadManager>,
    settings: SettingsController,
    state: ApplierState,
}

impl ConfigurationApplier {
    pub fn new(
        store: Arc<Store>,
        storage: Arc<LocalStorage>,
        page: Arc<Page>,
        uploads: Arc<UploadManager>,
    ) -> Self {
        let settings = SettingsController::new(store.clone(), storage.clone());
        Self {
            store,
            storage,
            page,
            uploads,
            settings,
            state: ApplierState::Unconfigured,
        }
    }

    /// Apply a configuration payload. Returns false without side
    /// effects when a configuration has already been applied.
    pub fn apply(&mut self, config: ServerConfiguration) -> bool {
        if self.state == ApplierState::Configured {
            debug!("ignoring repeated server configuration");
            return false;
        }
        self.state = ApplierState::Configured;

        self.store.commit_server_configuration(config.clone());

        // The theme setting depends on the committed theme list, so
        // settings cannot be applied before this point.
        self.settings.apply_all();

        if config.file_upload {
            self.uploads.initialize();
        }

        // A persisted theme that doesn't exist on this server falls
        // back to the server's default theme.
        let selected = self.store.snapshot().settings.theme;
        match config.themes.iter().find(|theme| theme.name == selected) {
            None => {
                self.settings.update(SettingUpdate {
                    name: THEME_SETTING.into(),
                    value: config.default_theme.clone(),
                    sync: true,
                });
            }
            Some(theme) => {
                if let Some(color) = &theme.theme_color {
                    self.page.set_theme_color(color);
                }
            }
        }

        if let Some(theme) = self.storage.get(KIOSK_THEME_KEY) {
            self.page.set_kiosk_theme(&theme);
        }

        if self.page.is_public() {
            self.page.install_unload_guard(UNLOAD_MESSAGE);
        }

        info!("server configuration applied");
        true
    }

    /// Consume the inbound event stream, applying the first
    /// configuration payload. Runs until the stream closes or the
    /// token is cancelled.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<ServerEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                event = events.recv() => match event {
                    Some(ServerEvent::Configuration(config)) => {
                        self.apply(config);
                    }
                    None => return,
                },
            }
        }
    }
}
