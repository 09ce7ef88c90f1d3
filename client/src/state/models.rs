use serde::{Deserialize, Serialize};

/// Numeric identifier for a channel within the user's networks.
pub type ChannelId = u64;

/// What kind of channel an entry in a network's channel list is.
///
/// The lobby is the special per-network channel used for server-level
/// commands; anything the server reports that isn't a lobby or a
/// regular channel (queries, special windows) deserializes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Lobby,
    Channel,
    #[serde(other)]
    Other,
}

/// A single channel as reported by the server in store state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(id: ChannelId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }
}

/// A network the user is connected to, with its channel list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Network {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }
}

/// A theme descriptor in the server's theme list.
///
/// Field names are camelCase on the wire (`themeColor`), matching the
/// configuration payload the server pushes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

/// Server-pushed configuration payload.
///
/// Wire format (camelCase):
///   `{"themes": [...], "defaultTheme": "default", "fileUpload": true}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfiguration {
    #[serde(default)]
    pub themes: Vec<ThemeInfo>,
    pub default_theme: String,
    #[serde(default)]
    pub file_upload: bool,
}
