//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} bytes (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// ConversationId validation error
    #[error("ConversationId must be positive (got {0})")]
    ConversationIdNotPositive(i64),

    /// MessageId validation error
    #[error("MessageId must be positive (got {0})")]
    MessageIdNotPositive(i64),

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// MessageStatus parse error
    #[error("unknown message status: {0:?} (expected sent, delivered or read)")]
    UnknownMessageStatus(String),
}

/// Errors surfaced by a ConversationStore implementation.
///
/// The in-memory store never fails, but durable backends propagate their
/// faults through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage backend failed
    #[error("storage backend failure: {0}")]
    Backend(String),
}
