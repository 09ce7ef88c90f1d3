use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::kiosk::enforcer::KioskTimings;

/// Top-level client configuration, loaded from curia.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub kiosk: KioskSection,
    pub storage: StorageSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct KioskSection {
    pub ready_timeout_secs: u64,
    pub join_timeout_secs: u64,
    pub sweep_interval_ms: u64,
}

impl Default for KioskSection {
    fn default() -> Self {
        Self {
            ready_timeout_secs: 30,
            join_timeout_secs: 30,
            sweep_interval_ms: 1500,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Path of the local key-value storage file.
    pub path: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: "curia-storage.json".into(),
        }
    }
}

impl ClientConfig {
    /// Load config from a TOML file. Falls back to defaults if the file
    /// doesn't exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CURIA_STORAGE_PATH") {
            self.storage.path = v;
        }
        if let Ok(v) = std::env::var("CURIA_READY_TIMEOUT_SECS")
            && let Ok(secs) = v.parse()
        {
            self.kiosk.ready_timeout_secs = secs;
        }
        if let Ok(v) = std::env::var("CURIA_JOIN_TIMEOUT_SECS")
            && let Ok(secs) = v.parse()
        {
            self.kiosk.join_timeout_secs = secs;
        }
        if let Ok(v) = std::env::var("CURIA_SWEEP_INTERVAL_MS")
            && let Ok(ms) = v.parse()
        {
            self.kiosk.sweep_interval_ms = ms;
        }
    }

    /// Convert the kiosk section into enforcer timings.
    pub fn kiosk_timings(&self) -> KioskTimings {
        KioskTimings {
            ready_timeout: Duration::from_secs(self.kiosk.ready_timeout_secs),
            join_timeout: Duration::from_secs(self.kiosk.join_timeout_secs),
            sweep_interval: Duration::from_millis(self.kiosk.sweep_interval_ms),
        }
    }
}
