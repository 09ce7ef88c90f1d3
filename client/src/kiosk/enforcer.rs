use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::names::normalize_channel_name;
use crate::page::{KioskMode, Page};
use crate::socket::events::ClientEvent;
use crate::socket::handle::SocketHandle;
use crate::state::models::{ChannelId, ChannelKind};
use crate::state::store::{AppState, Store, WaitError};

/// Deadlines and intervals for the enforcer.
#[derive(Debug, Clone)]
pub struct KioskTimings {
    /// How long to wait for the application to load and report networks.
    pub ready_timeout: Duration,
    /// How long to wait for the target channel to appear after a join.
    pub join_timeout: Duration,
    /// Period of the housekeeping sweep.
    pub sweep_interval: Duration,
}

impl Default for KioskTimings {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(30),
            join_timeout: Duration::from_secs(30),
            sweep_interval: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KioskError {
    /// The application never became ready within the deadline.
    ReadyWait(WaitError),
    /// The target channel never appeared in state after the join.
    JoinWait(WaitError),
}

impl std::fmt::Display for KioskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KioskError::ReadyWait(e) => write!(f, "application never became ready: {e}"),
            KioskError::JoinWait(e) => write!(f, "kiosk channel never appeared: {e}"),
        }
    }
}

impl std::error::Error for KioskError {}

/// Locks a single-channel kiosk page to its configured focus channel.
///
/// Runs once per page load: waits for state to become ready, resolves
/// the focus channel (joining it through the lobby when absent), marks
/// it as the page target, then keeps parting every other channel until
/// cancelled.
pub struct KioskEnforcer {
    store: Arc<Store>,
    socket: SocketHandle,
    page: Arc<Page>,
    timings: KioskTimings,
}

impl KioskEnforcer {
    pub fn new(
        store: Arc<Store>,
        socket: SocketHandle,
        page: Arc<Page>,
        timings: KioskTimings,
    ) -> Self {
        Self {
            store,
            socket,
            page,
            timings,
        }
    }

    /// Enforce kiosk mode until the token is cancelled.
    ///
    /// No-ops immediately unless the page is in single-channel mode
    /// with a focus channel configured. Cancellation at any point is a
    /// clean stop, not an error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), KioskError> {
        if self.page.mode() != KioskMode::SingleChannel {
            debug!("kiosk mode not enabled, nothing to enforce");
            return Ok(());
        }
        let focus = match self.page.focus() {
            Some(focus) if !focus.is_empty() => focus,
            _ => {
                debug!("kiosk page has no focus channel configured");
                return Ok(());
            }
        };

        let wanted = normalize_channel_name(&focus);

        let state = match self
            .store
            .wait_until(self.timings.ready_timeout, &cancel, |s| {
                s.app_loaded && !s.networks.is_empty()
            })
            .await
        {
            Ok(state) => state,
            Err(WaitError::Cancelled) => return Ok(()),
            Err(e) => return Err(KioskError::ReadyWait(e)),
        };

        let target = match find_channel_id(&state, &wanted) {
            Some(id) => id,
            None => match self.join_and_await(&wanted, &cancel).await? {
                Some(id) => id,
                None => return Ok(()),
            },
        };

        info!(channel = %wanted, id = target, "kiosk target resolved");
        self.page.set_target_channel(target);

        // Matches the page-lifetime housekeeping interval: first sweep
        // one period after the target is marked.
        let start = tokio::time::Instant::now() + self.timings.sweep_interval;
        let mut ticker = tokio::time::interval_at(start, self.timings.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => self.sweep(),
            }
        }
    }

    /// Emit a join for the wanted channel through a lobby, then wait
    /// for it to appear in state. Returns None only on cancellation.
    async fn join_and_await(
        &self,
        wanted: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ChannelId>, KioskError> {
        let state = self.store.snapshot();
        if let Some(lobby) = find_lobby_id(&state) {
            info!(channel = %wanted, lobby, "joining kiosk target channel");
            self.socket.emit(ClientEvent::join(lobby, wanted));
        } else {
            // The channel may still appear through an external join,
            // so fall through to the wait either way.
            warn!(channel = %wanted, "no lobby channel to address the join to");
        }

        let state = match self
            .store
            .wait_until(self.timings.join_timeout, cancel, |s| {
                find_channel_id(s, wanted).is_some()
            })
            .await
        {
            Ok(state) => state,
            Err(WaitError::Cancelled) => return Ok(None),
            Err(e) => return Err(KioskError::JoinWait(e)),
        };

        Ok(find_channel_id(&state, wanted))
    }

    /// One housekeeping pass: part every joined channel that isn't the
    /// current page target. Lobbies and non-channel windows are left
    /// alone. A no-op without a marked target or a lobby.
    pub fn sweep(&self) {
        let Some(target) = self.page.target_channel() else {
            return;
        };
        let state = self.store.snapshot();
        let Some(lobby) = find_lobby_id(&state) else {
            return;
        };

        for network in &state.networks {
            for channel in &network.channels {
                if channel.id != target && channel.kind == ChannelKind::Channel {
                    debug!(channel = %channel.name, "parting non-target channel");
                    self.socket.emit(ClientEvent::part(lobby, &channel.name));
                }
            }
        }
    }
}

/// First channel across all networks whose normalized name matches.
fn find_channel_id(state: &AppState, wanted: &str) -> Option<ChannelId> {
    state
        .networks
        .iter()
        .flat_map(|network| &network.channels)
        .find(|channel| normalize_channel_name(&channel.name) == wanted)
        .map(|channel| channel.id)
}

/// First lobby-kind channel in any network.
fn find_lobby_id(state: &AppState) -> Option<ChannelId> {
    state
        .networks
        .iter()
        .flat_map(|network| &network.channels)
        .find(|channel| channel.kind == ChannelKind::Lobby)
        .map(|channel| channel.id)
}
