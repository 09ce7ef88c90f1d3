use serde::{Deserialize, Serialize};

use crate::state::models::{ChannelId, ServerConfiguration};

/// Event sent from the client to the server.
///
/// `Input` carries a raw command line addressed at a channel, exactly
/// as the user would have typed it:
///   `{"type": "input", "target": 5, "text": "JOIN #general"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Input { target: ChannelId, text: String },
}

impl ClientEvent {
    /// A JOIN command for `name` (already normalized, without sigil),
    /// addressed to the network's lobby.
    pub fn join(lobby: ChannelId, name: &str) -> Self {
        ClientEvent::Input {
            target: lobby,
            text: format!("JOIN #{name}"),
        }
    }

    /// A PART command for a channel, addressed to the network's lobby.
    /// The channel name is sent as-is, sigil included.
    pub fn part(lobby: ChannelId, channel_name: &str) -> Self {
        ClientEvent::Input {
            target: lobby,
            text: format!("PART {channel_name}"),
        }
    }
}

/// Event pushed from the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Configuration(ServerConfiguration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_command_text() {
        let event = ClientEvent::join(5, "general");
        assert_eq!(
            event,
            ClientEvent::Input {
                target: 5,
                text: "JOIN #general".into(),
            }
        );
    }

    #[test]
    fn test_part_command_keeps_sigil() {
        let event = ClientEvent::part(5, "#random");
        assert_eq!(
            event,
            ClientEvent::Input {
                target: 5,
                text: "PART #random".into(),
            }
        );
    }

    #[test]
    fn test_input_wire_format() {
        let event = ClientEvent::join(5, "general");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"input","target":5,"text":"JOIN #general"}"#);
    }

    #[test]
    fn test_configuration_event_roundtrip() {
        let json = r#"{
            "type": "configuration",
            "themes": [{"name": "default"}],
            "defaultTheme": "default",
            "fileUpload": false
        }"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        let ServerEvent::Configuration(cfg) = event;
        assert_eq!(cfg.default_theme, "default");
        assert_eq!(cfg.themes.len(), 1);
    }
}
