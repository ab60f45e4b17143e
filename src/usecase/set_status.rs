//! UseCase: externally driven message status override.
//!
//! Used by transport layers acknowledging delivery. The override is
//! unconditional: no monotonicity check, so a `read` message can move back
//! to `delivered` through this entry point. Known looseness, kept on
//! purpose; enforcing `sent < delivered < read` here would change
//! observable behavior.

use std::sync::Arc;

use crate::domain::{ConversationStore, MessageId, MessageStatus};

use super::error::ChatError;

/// Message status override usecase.
pub struct UpdateMessageStatusUseCase {
    store: Arc<dyn ConversationStore>,
}

impl UpdateMessageStatusUseCase {
    /// Create a new UpdateMessageStatusUseCase.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Set the message's status.
    ///
    /// # Errors
    ///
    /// * `ChatError::NotFound` - the message does not exist
    /// * `ChatError::Internal` - storage failure
    pub async fn execute(
        &self,
        message: MessageId,
        status: MessageStatus,
    ) -> Result<(), ChatError> {
        if !self.store.set_message_status(message, status).await? {
            return Err(ChatError::NotFound("message not found".to_string()));
        }
        tracing::debug!(message_id = message.value(), status = %status, "status overridden");
        Ok(())
    }
}
