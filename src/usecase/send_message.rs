//! UseCase: persist an outbound message.
//!
//! Persistence only; fanning the message out to live sessions is the
//! caller's responsibility. Keeping the broadcast out of the lifecycle
//! leaves this usecase testable without a connection registry, and
//! guarantees the durable write happens before any best-effort delivery.

use std::sync::Arc;

use crate::domain::{ConversationId, ConversationStore, Message, MessageContent, UserId};
use crate::time::now_timestamp;

use super::error::ChatError;

/// Message send usecase.
pub struct SendMessageUseCase {
    store: Arc<dyn ConversationStore>,
}

impl SendMessageUseCase {
    /// Create a new SendMessageUseCase.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Persist a message with status `sent`.
    ///
    /// # Errors
    ///
    /// * `ChatError::Validation` - empty content
    /// * `ChatError::Forbidden` - `sender` is not a participant
    /// * `ChatError::Internal` - storage failure
    pub async fn execute(
        &self,
        conversation: ConversationId,
        sender: UserId,
        content: String,
    ) -> Result<Message, ChatError> {
        let content = MessageContent::new(content)?;

        if !self.store.is_participant(conversation, &sender).await? {
            return Err(ChatError::Forbidden(
                "sender is not a participant of this conversation".to_string(),
            ));
        }

        let message = self
            .store
            .insert_message(conversation, &sender, content, now_timestamp())
            .await?;

        tracing::debug!(
            conversation_id = conversation.value(),
            message_id = message.id.value(),
            sender = %message.sender_id,
            "message persisted"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageStatus, MockConversationStore, StoreError, Timestamp};
    use crate::infrastructure::repository::InMemoryConversationStore;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    async fn store_with_conversation() -> (Arc<InMemoryConversationStore>, ConversationId) {
        let store = Arc::new(InMemoryConversationStore::new());
        let conversation = store
            .create_conversation(&user("alice"), &user("bob"), None, Timestamp::new(0))
            .await
            .unwrap();
        (store, conversation.id)
    }

    #[tokio::test]
    async fn test_send_persists_sent_message() {
        let (store, conversation) = store_with_conversation().await;
        let usecase = SendMessageUseCase::new(store.clone());

        let message = usecase
            .execute(conversation, user("alice"), "hello".to_string())
            .await
            .unwrap();

        assert_eq!(message.sender_id, user("alice"));
        assert_eq!(message.content.as_str(), "hello");
        assert_eq!(message.status, MessageStatus::Sent);
        assert!(!message.is_read);

        let stored = store.messages(conversation).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_send_from_stranger_is_forbidden() {
        let (store, conversation) = store_with_conversation().await;
        let usecase = SendMessageUseCase::new(store.clone());

        let result = usecase
            .execute(conversation, user("stranger"), "hi".to_string())
            .await;

        assert!(matches!(result, Err(ChatError::Forbidden(_))));
        // Nothing persisted.
        assert!(store.messages(conversation).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_empty_content_is_validation_error() {
        let (store, conversation) = store_with_conversation().await;
        let usecase = SendMessageUseCase::new(store.clone());

        let result = usecase
            .execute(conversation, user("alice"), String::new())
            .await;

        assert!(matches!(result, Err(ChatError::Validation(_))));
        assert!(store.messages(conversation).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_internal() {
        let mut mock = MockConversationStore::new();
        mock.expect_is_participant().returning(|_, _| Ok(true));
        mock.expect_insert_message()
            .returning(|_, _, _, _| Err(StoreError::Backend("disk on fire".to_string())));
        let usecase = SendMessageUseCase::new(Arc::new(mock));

        let result = usecase
            .execute(
                ConversationId::new(1).unwrap(),
                user("alice"),
                "hello".to_string(),
            )
            .await;

        assert!(matches!(result, Err(ChatError::Internal(_))));
    }
}
