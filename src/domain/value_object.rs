//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// User identifier value object.
///
/// Identifies a participant account. Opaque to this service; the upstream
/// identity provider owns the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than 255 bytes.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.len();
        if len > 255 {
            return Err(ValueObjectError::UserIdTooLong {
                max: 255,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversation identifier value object.
///
/// Positive integer allocated by the store. Doubles as the room key on the
/// live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(i64);

impl ConversationId {
    /// Create a new ConversationId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not positive.
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::ConversationIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(i64);

impl MessageId {
    /// Create a new MessageId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not positive.
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::MessageIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the body of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is empty or longer than 10000 bytes.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.len();
        if len > 10000 {
            return Err(ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(content: String) -> Result<Self, Self::Error> {
        Self::new(content)
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
