//! UseCase: find-or-create the single conversation between two users.
//!
//! Two users never end up with two rooms: the whole find-or-create
//! sequence is serialized per unordered pair through [`PairLockRegistry`],
//! so near-simultaneous requests for the same pair cannot race past the
//! lookup and both create.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Conversation, ConversationStore, MessageContent, UserId, assign_name,
};
use crate::time::now_timestamp;

use super::error::ChatError;

/// Lock table keyed by the sorted user pair.
///
/// Entries are created on first use and pruned on the next acquisition
/// once nobody holds or waits on them anymore, so the table is bounded by
/// the number of pairs with an acquisition in flight.
#[derive(Default)]
pub struct PairLockRegistry {
    locks: Mutex<HashMap<(UserId, UserId), Arc<Mutex<()>>>>,
}

impl PairLockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive region for the unordered pair `{a, b}`.
    async fn acquire(&self, a: &UserId, b: &UserId) -> OwnedMutexGuard<()> {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        let pair_lock = {
            let mut locks = self.locks.lock().await;
            // A strong count of 1 means the table holds the only reference:
            // no guard held, no acquirer waiting. Safe to drop.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key).or_default())
        };
        pair_lock.lock_owned().await
    }
}

/// Find-or-create usecase for two-party conversations.
pub struct FindOrCreateConversationUseCase {
    store: Arc<dyn ConversationStore>,
    pair_locks: Arc<PairLockRegistry>,
    catalog: &'static [&'static str],
}

impl FindOrCreateConversationUseCase {
    /// Create a new FindOrCreateConversationUseCase.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        pair_locks: Arc<PairLockRegistry>,
        catalog: &'static [&'static str],
    ) -> Self {
        Self {
            store,
            pair_locks,
            catalog,
        }
    }

    /// Return the existing conversation between `current_user` and `peer`,
    /// or create it.
    ///
    /// On creation the optional `initial_message` is persisted as a first
    /// message from `current_user` with status `sent`, and the naming
    /// assigner provides the display name. An existing conversation is
    /// returned unchanged; the initial message is not appended to it.
    ///
    /// # Errors
    ///
    /// * `ChatError::Validation` - `current_user == peer`
    /// * `ChatError::Internal` - storage failure
    pub async fn execute(
        &self,
        current_user: UserId,
        peer: UserId,
        initial_message: Option<MessageContent>,
    ) -> Result<Conversation, ChatError> {
        if current_user == peer {
            return Err(ChatError::Validation(
                "a conversation needs two distinct participants".to_string(),
            ));
        }

        let _pair_guard = self.pair_locks.acquire(&current_user, &peer).await;

        if let Some(existing) = self
            .store
            .find_pair_conversation(&current_user, &peer)
            .await?
        {
            tracing::debug!(
                conversation_id = existing.id.value(),
                "pair already has a conversation"
            );
            return Ok(existing);
        }

        let mut conversation = self
            .store
            .create_conversation(&current_user, &peer, initial_message, now_timestamp())
            .await?;

        if conversation.name.is_none() {
            let name = assign_name(conversation.id, self.catalog);
            self.store
                .set_conversation_name(conversation.id, name)
                .await?;
            conversation.name = Some(name.to_string());
        }

        tracing::info!(
            conversation_id = conversation.id.value(),
            name = conversation.name.as_deref(),
            "created conversation"
        );
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_NAME_CATALOG, MessageStatus};
    use crate::infrastructure::repository::InMemoryConversationStore;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn content(s: &str) -> MessageContent {
        MessageContent::new(s.to_string()).unwrap()
    }

    fn create_usecase() -> (FindOrCreateConversationUseCase, Arc<InMemoryConversationStore>) {
        let store = Arc::new(InMemoryConversationStore::new());
        let usecase = FindOrCreateConversationUseCase::new(
            store.clone(),
            Arc::new(PairLockRegistry::new()),
            DEFAULT_NAME_CATALOG,
        );
        (usecase, store)
    }

    #[tokio::test]
    async fn test_creates_named_conversation() {
        let (usecase, _store) = create_usecase();

        let conversation = usecase
            .execute(user("alice"), user("bob"), None)
            .await
            .unwrap();

        assert_eq!(conversation.id.value(), 1);
        assert_eq!(
            conversation.name.as_deref(),
            Some(assign_name(conversation.id, DEFAULT_NAME_CATALOG))
        );
    }

    #[tokio::test]
    async fn test_repeated_calls_return_same_conversation() {
        let (usecase, _store) = create_usecase();

        let first = usecase
            .execute(user("alice"), user("bob"), None)
            .await
            .unwrap();
        // Swapped argument order still finds the same pair.
        let second = usecase
            .execute(user("bob"), user("alice"), None)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_initial_message_persisted_from_creator() {
        let (usecase, store) = create_usecase();

        let conversation = usecase
            .execute(user("alice"), user("bob"), Some(content("hi")))
            .await
            .unwrap();

        let messages = store.messages(conversation.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_id, user("alice"));
        assert_eq!(messages[0].content.as_str(), "hi");
        assert_eq!(messages[0].status, MessageStatus::Sent);
    }

    #[tokio::test]
    async fn test_existing_conversation_ignores_initial_message() {
        let (usecase, store) = create_usecase();
        let conversation = usecase
            .execute(user("alice"), user("bob"), None)
            .await
            .unwrap();

        usecase
            .execute(user("alice"), user("bob"), Some(content("again")))
            .await
            .unwrap();

        let messages = store.messages(conversation.id).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_self_pairing_rejected() {
        let (usecase, _store) = create_usecase();

        let result = usecase.execute(user("alice"), user("alice"), None).await;

        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_calls_create_single_conversation() {
        let (usecase, store) = create_usecase();
        let usecase = Arc::new(usecase);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let usecase = usecase.clone();
            handles.push(tokio::spawn(async move {
                usecase.execute(user("alice"), user("bob"), None).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        // Every call resolved to the same conversation, and only one exists.
        assert!(ids.iter().all(|id| *id == ids[0]));
        let for_alice = store.conversations_for_user(&user("alice")).await.unwrap();
        assert_eq!(for_alice.len(), 1);
    }

    #[tokio::test]
    async fn test_pair_lock_registry_prunes_idle_entries() {
        let registry = PairLockRegistry::new();
        drop(registry.acquire(&user("alice"), &user("bob")).await);

        // The next acquisition drops the now-idle alice/bob entry.
        let _guard = registry.acquire(&user("carol"), &user("dave")).await;

        let locks = registry.locks.lock().await;
        assert_eq!(locks.len(), 1);
        assert!(locks.contains_key(&(user("carol"), user("dave"))));
    }

    #[tokio::test]
    async fn test_distinct_pairs_get_distinct_conversations() {
        let (usecase, _store) = create_usecase();

        let ab = usecase
            .execute(user("alice"), user("bob"), None)
            .await
            .unwrap();
        let ac = usecase
            .execute(user("alice"), user("carol"), None)
            .await
            .unwrap();

        assert_ne!(ab.id, ac.id);
    }
}
