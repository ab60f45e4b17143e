//! Core domain models for the messaging service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    error::ValueObjectError,
    value_object::{ConversationId, MessageContent, MessageId, Timestamp, UserId},
};

/// Delivery status of a message.
///
/// The core only ever produces `Sent` and `Read`; `Delivered` is reserved
/// for transport-level acknowledgements arriving through the status-update
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "read" => Ok(MessageStatus::Read),
            other => Err(ValueObjectError::UnknownMessageStatus(other.to_string())),
        }
    }
}

/// A persistent two-party conversation.
///
/// The `name` stays `None` until the naming assigner runs at creation time;
/// rows created before naming existed may remain unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation identifier
    pub id: ConversationId,
    /// Assigned display name, set at most once
    pub name: Option<String>,
    /// Timestamp when the conversation was created
    pub created_at: Timestamp,
}

impl Conversation {
    /// Create a new unnamed conversation.
    pub fn new(id: ConversationId, created_at: Timestamp) -> Self {
        Self {
            id,
            name: None,
            created_at,
        }
    }
}

/// A chat message belonging to exactly one conversation.
///
/// Invariant: `is_read == true` iff `status == Read`. All mutation goes
/// through [`Message::mark_read`] and [`Message::set_status`], which keep
/// the two fields in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: MessageId,
    /// Owning conversation
    pub conversation_id: ConversationId,
    /// Sender, a participant of the conversation at send time
    pub sender_id: UserId,
    /// Message body
    pub content: MessageContent,
    /// Timestamp when the message was sent
    pub timestamp: Timestamp,
    /// Delivery status
    pub status: MessageStatus,
    /// Read flag, kept equal to `status == Read`
    pub is_read: bool,
}

impl Message {
    /// Create a freshly sent message.
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            content,
            timestamp,
            status: MessageStatus::Sent,
            is_read: false,
        }
    }

    /// Transition the message to `read`.
    ///
    /// Returns `true` if the message changed, `false` if it was already
    /// read. The transition is monotonic: a read message stays read.
    pub fn mark_read(&mut self) -> bool {
        if self.is_read {
            return false;
        }
        self.status = MessageStatus::Read;
        self.is_read = true;
        true
    }

    /// Unconditionally override the status.
    ///
    /// No monotonicity check: an externally driven update may move the
    /// status backwards. `is_read` is re-synced so the read invariant
    /// holds regardless.
    pub fn set_status(&mut self, status: MessageStatus) {
        self.status = status;
        self.is_read = status == MessageStatus::Read;
    }

    /// Whether this message counts as unread for `reader`.
    ///
    /// Own messages never count: a reader cannot "read" what they sent.
    pub fn unread_by(&self, reader: &UserId) -> bool {
        !self.is_read && &self.sender_id != reader
    }
}
