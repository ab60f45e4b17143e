//! Live-channel DTOs.
//!
//! Outbound fan-out events are a tagged enum so handlers on both ends can
//! match on the `type` discriminant instead of probing for keys.

use serde::{Deserialize, Serialize};

use crate::domain::{Message, MessageStatus};
use crate::time::timestamp_to_rfc3339;

/// Event fanned out to every live session of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A message was persisted in the room's conversation.
    ///
    /// `sender` duplicates `sender_id`; clients use it to pick the
    /// sent/received rendering.
    Message {
        id: i64,
        sender: String,
        sender_id: String,
        content: String,
        timestamp: String,
        status: MessageStatus,
    },
    /// One or more messages transitioned to `read`.
    MessagesRead {
        conversation_id: i64,
        user_id: String,
        count: u64,
    },
}

impl RoomEvent {
    /// Build the fan-out event for a freshly persisted message.
    pub fn message(message: &Message) -> Self {
        RoomEvent::Message {
            id: message.id.value(),
            sender: message.sender_id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            timestamp: timestamp_to_rfc3339(message.timestamp),
            status: message.status,
        }
    }
}

/// Inbound frame on the live channel.
///
/// Both fields are required; a frame missing either is answered with an
/// inline [`ErrorEvent`] and the connection stays open.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundChatMessage {
    pub content: String,
    pub sender_id: String,
}

/// Inline protocol-error reply on the live channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error: String,
}

impl ErrorEvent {
    /// The reply for a frame missing required fields.
    pub fn missing_fields() -> Self {
        Self {
            error: "content and sender_id required".to_string(),
        }
    }
}
