//! WebSocket message DTOs for the chat room.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    /// Identity handshake
    Identity {
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },
    Chat {
        text: String,
    },
    Typing,
    Retract {
        #[serde(rename = "messageId")]
        message_id: String,
    },
}

impl ClientFrame {
    /// Parse a text frame. `None` for anything that is not a known frame.
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::warn!("Dropping malformed frame: {}", e);
                None
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identity { .. } => "identity",
            Self::Chat { .. } => "chat",
            Self::Typing => "typing",
            Self::Retract { .. } => "retract",
        }
    }
}

/// Frames sent by the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Full transcript snapshot, sent once on connect
    History { messages: Vec<ChatMessage> },
    /// Resolved identity of the receiving session
    Identity {
        id: String,
        name: String,
        avatar: String,
    },
    Info { message: String },
    Error { message: String },
    Message(ChatMessage),
    Status { online: usize, remaining: u64 },
    Typing { name: String, id: String },
    Retract {
        #[serde(rename = "messageId")]
        message_id: String,
    },
}

impl ServerFrame {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Status frames go to every session, identified or not
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}
