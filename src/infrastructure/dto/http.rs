//! REST request/response DTOs.
//!
//! Field names (including the camelCase aliases) mirror the service's
//! existing wire contract; clients depend on them as-is.

use serde::{Deserialize, Serialize};

use crate::domain::{Message, MessageStatus};
use crate::time::timestamp_to_rfc3339;

/// One entry of the conversation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummaryDto {
    pub id: i64,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "lastMessage")]
    pub last_message: Option<String>,
    #[serde(rename = "lastMessageTime")]
    pub last_message_time: Option<String>,
}

/// Conversation detail with full message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetailDto {
    pub id: i64,
    pub messages: Vec<MessageDto>,
}

/// Wire form of a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub conversation_id: i64,
    /// Sender user id (legacy field name)
    pub sender: String,
    pub content: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub status: MessageStatus,
    #[serde(rename = "isRead")]
    pub is_read: bool,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.value(),
            conversation_id: message.conversation_id.value(),
            sender: message.sender_id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            timestamp: timestamp_to_rfc3339(message.timestamp),
            status: message.status,
            is_read: message.is_read,
        }
    }
}

/// Body of `POST /conversations`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(rename = "currentUserId")]
    pub current_user_id: String,
    #[serde(rename = "participantId")]
    pub participant_id: String,
    #[serde(rename = "initialMessage", default)]
    pub initial_message: Option<String>,
}

/// Response of `POST /conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreatedDto {
    pub id: i64,
    pub name: Option<String>,
}

/// Body of `POST /conversations/{id}/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub sender_id: String,
}

/// Query of `GET /conversations`.
///
/// The list endpoint historically took `userId`; both spellings are
/// accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ListConversationsQuery {
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
}

/// Query of `PATCH /conversations/{id}/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response of `PATCH /conversations/{id}/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub ok: bool,
    pub updated_count: u64,
    pub conversation_id: i64,
}

/// Query of `PATCH /messages/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusQuery {
    pub status: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConversationId, MessageContent, MessageId, Timestamp, UserId};

    #[test]
    fn test_message_dto_field_names() {
        let message = Message::new(
            MessageId::new(1).unwrap(),
            ConversationId::new(2).unwrap(),
            UserId::new("alice".to_string()).unwrap(),
            MessageContent::new("hola".to_string()).unwrap(),
            Timestamp::new(0),
        );

        let json = serde_json::to_value(MessageDto::from(&message)).unwrap();

        assert_eq!(json["sender"], "alice");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["status"], "sent");
        assert!(json.get("sender_id").is_none());
    }

    #[test]
    fn test_create_request_aliases() {
        let request: CreateConversationRequest = serde_json::from_str(
            r#"{"currentUserId":"a","participantId":"b","initialMessage":"hey"}"#,
        )
        .unwrap();

        assert_eq!(request.current_user_id, "a");
        assert_eq!(request.participant_id, "b");
        assert_eq!(request.initial_message.as_deref(), Some("hey"));
    }

    #[test]
    fn test_list_query_accepts_both_user_id_spellings() {
        let snake: ListConversationsQuery =
            serde_json::from_str(r#"{"user_id":"alice"}"#).unwrap();
        let camel: ListConversationsQuery =
            serde_json::from_str(r#"{"userId":"alice"}"#).unwrap();

        assert_eq!(snake.user_id.as_deref(), Some("alice"));
        assert_eq!(camel.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn test_create_request_initial_message_optional() {
        let request: CreateConversationRequest =
            serde_json::from_str(r#"{"currentUserId":"a","participantId":"b"}"#).unwrap();

        assert!(request.initial_message.is_none());
    }
}
