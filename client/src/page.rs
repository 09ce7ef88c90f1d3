use std::collections::BTreeSet;

use tokio::sync::watch;

use crate::state::models::ChannelId;

/// Whether the page restricts the client to a single designated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KioskMode {
    #[default]
    Disabled,
    SingleChannel,
}

/// Typed page-level state shared between independently-scheduled
/// client components.
///
/// This replaces the `data-curia-*` attributes the page previously
/// used as ad-hoc cross-script signaling: mode and focus are set by
/// whoever rendered the page, the target channel and theme markers are
/// written by the client core, and the UI layer observes the lot.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub mode: KioskMode,
    /// Channel name the kiosk page is locked to, as configured.
    pub focus: Option<String>,
    /// Resolved kiosk target, once known.
    pub target_channel: Option<ChannelId>,
    /// Kiosk-specific theme marker.
    pub kiosk_theme: Option<String>,
    pub css_classes: BTreeSet<String>,
    /// Content of the theme-color meta tag.
    pub theme_color: Option<String>,
    /// Set when navigation away from the page needs confirmation.
    pub unload_confirmation: Option<String>,
    /// Whether this is a public (unauthenticated) page.
    pub public: bool,
}

/// Shared observable page surface.
#[derive(Debug)]
pub struct Page {
    tx: watch::Sender<PageState>,
}

impl Page {
    pub fn new(state: PageState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx }
    }

    pub fn snapshot(&self) -> PageState {
        self.tx.borrow().clone()
    }

    /// Subscribe to page changes, for readers that need to react to
    /// the target or theme being set.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.tx.subscribe()
    }

    pub fn mode(&self) -> KioskMode {
        self.tx.borrow().mode
    }

    pub fn focus(&self) -> Option<String> {
        self.tx.borrow().focus.clone()
    }

    pub fn is_public(&self) -> bool {
        self.tx.borrow().public
    }

    pub fn target_channel(&self) -> Option<ChannelId> {
        self.tx.borrow().target_channel
    }

    /// Record the resolved kiosk target for other components to read.
    pub fn set_target_channel(&self, id: ChannelId) {
        self.tx.send_modify(|state| state.target_channel = Some(id));
    }

    /// Set the kiosk theme marker and its CSS class.
    pub fn set_kiosk_theme(&self, theme: &str) {
        self.tx.send_modify(|state| {
            state.kiosk_theme = Some(theme.to_string());
            state.css_classes.insert(format!("curia-theme-{theme}"));
        });
    }

    /// Set the theme-color meta tag content.
    pub fn set_theme_color(&self, color: &str) {
        self.tx
            .send_modify(|state| state.theme_color = Some(color.to_string()));
    }

    /// Ask the user to confirm before navigating away from the page.
    pub fn install_unload_guard(&self, message: &str) {
        self.tx
            .send_modify(|state| state.unload_confirmation = Some(message.to_string()));
    }
}
