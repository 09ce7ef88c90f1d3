use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::models::{Network, ServerConfiguration};
use super::settings::Settings;

/// Snapshot of the application state the client core reads and writes.
///
/// The transport and UI layers own the rest of the application state;
/// only the slice consumed by the kiosk enforcer and the configuration
/// applier lives here.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Set once the application has finished its initial load.
    pub app_loaded: bool,
    pub networks: Vec<Network>,
    pub settings: Settings,
    pub server_configuration: Option<ServerConfiguration>,
}

/// Why a bounded state wait ended without the condition holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    TimedOut,
    Cancelled,
    /// The store was dropped while waiting.
    Closed,
}

impl std::fmt::Display for WaitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitError::TimedOut => write!(f, "timed out waiting for state"),
            WaitError::Cancelled => write!(f, "wait cancelled"),
            WaitError::Closed => write!(f, "store closed while waiting"),
        }
    }
}

impl std::error::Error for WaitError {}

/// Shared observable application state.
///
/// Wraps a watch channel so components can take snapshots, apply
/// updates, and wait for a condition with an explicit deadline and
/// cancellation token instead of interval polling.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<AppState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AppState::default());
        Self { tx }
    }

    /// Current state, cloned out of the cell.
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Mutate the state in place and notify all watchers.
    pub fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.tx.send_modify(f);
    }

    /// Subscribe to state changes. The receiver sees the current value
    /// immediately and every update after it.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    /// Commit a server-pushed configuration payload into state.
    pub fn commit_server_configuration(&self, config: ServerConfiguration) {
        self.update(|state| state.server_configuration = Some(config));
    }

    /// Block until `pred` holds for the state, up to `limit`.
    ///
    /// Returns the first snapshot satisfying the predicate. Ends early
    /// with `WaitError::Cancelled` when the token fires, or
    /// `WaitError::TimedOut` when the deadline passes first.
    pub async fn wait_until(
        &self,
        limit: Duration,
        cancel: &CancellationToken,
        mut pred: impl FnMut(&AppState) -> bool,
    ) -> Result<AppState, WaitError> {
        let mut rx = self.tx.subscribe();
        tokio::select! {
            result = tokio::time::timeout(limit, rx.wait_for(|state| pred(state))) => {
                match result {
                    Ok(Ok(state)) => Ok(state.clone()),
                    Ok(Err(_)) => Err(WaitError::Closed),
                    Err(_) => Err(WaitError::TimedOut),
                }
            }
            _ = cancel.cancelled() => Err(WaitError::Cancelled),
        }
    }
}
