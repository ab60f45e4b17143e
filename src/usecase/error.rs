//! UseCase layer error definitions.
//!
//! Every operation fails with one of four kinds. The UI layer maps them to
//! transport codes in exactly one place; usecases never see HTTP.

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

/// Failure kinds surfaced by the messaging usecases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// A referenced conversation or message does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller is not a participant of the conversation
    #[error("{0}")]
    Forbidden(String),

    /// The request is malformed (empty content, missing field, self-pairing)
    #[error("{0}")]
    Validation(String),

    /// Storage failure or unexpected fault
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Internal(err.to_string())
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(err: ValueObjectError) -> Self {
        ChatError::Validation(err.to_string())
    }
}
