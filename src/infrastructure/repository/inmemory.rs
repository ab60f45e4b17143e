//! In-memory ConversationStore implementation.
//!
//! The concrete implementation of the domain-owned ConversationStore trait,
//! backed by plain maps behind one async Mutex. Holding every table under a
//! single lock makes each trait method atomic, which is exactly what the
//! two transactional methods (create_conversation, mark_read_from_others)
//! require. A durable backend would use a transaction instead.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Conversation, ConversationId, ConversationStore, Message, MessageContent, MessageId,
    MessageStatus, StoreError, Timestamp, UserId,
};

#[derive(Default)]
struct StoreInner {
    next_conversation_id: i64,
    next_message_id: i64,
    conversations: BTreeMap<i64, Conversation>,
    participants: HashMap<i64, BTreeSet<UserId>>,
    messages: BTreeMap<i64, Message>,
}

impl StoreInner {
    fn alloc_conversation_id(&mut self) -> ConversationId {
        self.next_conversation_id += 1;
        ConversationId::new(self.next_conversation_id)
            .unwrap_or_else(|_| unreachable!("allocator starts at 1"))
    }

    fn alloc_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId::new(self.next_message_id)
            .unwrap_or_else(|_| unreachable!("allocator starts at 1"))
    }

    fn insert_message(
        &mut self,
        conversation: ConversationId,
        sender: &UserId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Message {
        let id = self.alloc_message_id();
        let message = Message::new(id, conversation, sender.clone(), content, timestamp);
        self.messages.insert(id.value(), message.clone());
        message
    }

    fn conversation_messages(&self, conversation: ConversationId) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.timestamp, m.id));
        messages
    }
}

/// In-memory ConversationStore.
///
/// The reference backend for tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryConversationStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.conversations.get(&id.value()).cloned())
    }

    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Conversation>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .conversations
            .values()
            .filter(|c| {
                inner
                    .participants
                    .get(&c.id.value())
                    .is_some_and(|members| members.contains(user))
            })
            .cloned()
            .collect())
    }

    async fn find_pair_conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Conversation>, StoreError> {
        let inner = self.inner.lock().await;
        let found = inner
            .participants
            .iter()
            .find(|(_, members)| {
                members.len() == 2 && members.contains(a) && members.contains(b)
            })
            .and_then(|(conversation_id, _)| inner.conversations.get(conversation_id))
            .cloned();
        Ok(found)
    }

    async fn create_conversation(
        &self,
        creator: &UserId,
        peer: &UserId,
        initial_message: Option<MessageContent>,
        created_at: Timestamp,
    ) -> Result<Conversation, StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.alloc_conversation_id();
        let conversation = Conversation::new(id, created_at);
        inner.conversations.insert(id.value(), conversation.clone());
        inner.participants.insert(
            id.value(),
            BTreeSet::from([creator.clone(), peer.clone()]),
        );
        if let Some(content) = initial_message {
            inner.insert_message(id, creator, content, created_at);
        }
        Ok(conversation)
    }

    async fn set_conversation_name(
        &self,
        id: ConversationId,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(conversation) = inner.conversations.get_mut(&id.value())
            && conversation.name.is_none()
        {
            conversation.name = Some(name.to_string());
        }
        Ok(())
    }

    async fn is_participant(
        &self,
        id: ConversationId,
        user: &UserId,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .participants
            .get(&id.value())
            .is_some_and(|members| members.contains(user)))
    }

    async fn insert_message(
        &self,
        conversation: ConversationId,
        sender: &UserId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Message, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.insert_message(conversation, sender, content, timestamp))
    }

    async fn messages(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.conversation_messages(conversation))
    }

    async fn latest_message(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<Message>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.conversation_messages(conversation).pop())
    }

    async fn mark_read_from_others(
        &self,
        conversation: ConversationId,
        reader: &UserId,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let mut changed = 0;
        for message in inner.messages.values_mut() {
            if message.conversation_id == conversation
                && message.unread_by(reader)
                && message.mark_read()
            {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn message(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.messages.get(&id.value()).cloned())
    }

    async fn set_message_status(
        &self,
        id: MessageId,
        status: MessageStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.messages.get_mut(&id.value()) {
            Some(message) => {
                message.set_status(status);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
