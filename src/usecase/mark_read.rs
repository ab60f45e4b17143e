//! UseCase: bulk read-receipt transition.
//!
//! Marks every unread message not sent by the reader as read, in one
//! atomic bulk update. Returns the number of messages that changed so the
//! caller can decide whether a read-receipt event is worth broadcasting
//! (count zero means nothing happened and nothing should be announced).

use std::sync::Arc;

use crate::domain::{ConversationId, ConversationStore, UserId};

use super::error::ChatError;

/// Conversation read-receipt usecase.
pub struct MarkConversationReadUseCase {
    store: Arc<dyn ConversationStore>,
}

impl MarkConversationReadUseCase {
    /// Create a new MarkConversationReadUseCase.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Transition the reader's unread incoming messages to `read`.
    ///
    /// # Errors
    ///
    /// * `ChatError::NotFound` - the conversation does not exist
    /// * `ChatError::Forbidden` - `reader` is not a participant
    /// * `ChatError::Internal` - storage failure
    pub async fn execute(
        &self,
        conversation: ConversationId,
        reader: UserId,
    ) -> Result<u64, ChatError> {
        if self.store.conversation(conversation).await?.is_none() {
            return Err(ChatError::NotFound("conversation not found".to_string()));
        }

        if !self.store.is_participant(conversation, &reader).await? {
            return Err(ChatError::Forbidden(
                "reader is not a participant of this conversation".to_string(),
            ));
        }

        let changed = self
            .store
            .mark_read_from_others(conversation, &reader)
            .await?;

        if changed > 0 {
            tracing::debug!(
                conversation_id = conversation.value(),
                reader = %reader,
                changed,
                "messages marked read"
            );
        }
        Ok(changed)
    }
}
