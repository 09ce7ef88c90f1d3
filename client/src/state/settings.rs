use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::Store;
use crate::storage::LocalStorage;

/// Name of the theme setting, as used in update dispatches and as the
/// suffix of its local-storage key.
pub const THEME_SETTING: &str = "theme";

/// Local-storage key prefix for persisted settings.
const STORAGE_PREFIX: &str = "settings.";

/// Client settings held in store state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "default".into(),
        }
    }
}

/// A single settings update dispatch.
#[derive(Debug, Clone)]
pub struct SettingUpdate {
    pub name: String,
    pub value: String,
    /// Persist to local storage as part of the update.
    pub sync: bool,
}

/// Applies settings updates to the store and keeps them in sync with
/// local storage.
pub struct SettingsController {
    store: Arc<Store>,
    storage: Arc<LocalStorage>,
}

impl SettingsController {
    pub fn new(store: Arc<Store>, storage: Arc<LocalStorage>) -> Self {
        Self { store, storage }
    }

    /// Apply one settings update. Unknown setting names are ignored.
    pub fn update(&self, update: SettingUpdate) {
        match update.name.as_str() {
            THEME_SETTING => {
                self.store
                    .update(|state| state.settings.theme = update.value.clone());
            }
            other => {
                debug!(setting = other, "ignoring update for unknown setting");
                return;
            }
        }

        if update.sync {
            self.storage
                .set(&format!("{STORAGE_PREFIX}{}", update.name), &update.value);
        }
    }

    /// Load every persisted setting from local storage into store state.
    ///
    /// The theme setting depends on the server configuration's theme
    /// list for its visual assets, so this must run after the
    /// configuration has been committed.
    pub fn apply_all(&self) {
        if self.store.snapshot().server_configuration.is_none() {
            debug!("applying settings before server configuration is committed");
        }

        if let Some(theme) = self.storage.get(&format!("{STORAGE_PREFIX}{THEME_SETTING}")) {
            debug!(%theme, "applying persisted theme");
            self.store.update(|state| state.settings.theme = theme);
        }
    }
}
