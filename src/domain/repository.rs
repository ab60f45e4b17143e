//! Storage collaborator interface.
//!
//! The domain layer owns this trait; concrete backends live in the
//! infrastructure layer (dependency inversion). The core components only
//! ever talk to storage through it, so the engine behind it (in-memory,
//! SQL, ...) is swappable.
//!
//! Two methods carry atomicity requirements the backend must honor:
//! [`ConversationStore::create_conversation`] (conversation + participants
//! + optional first message commit or roll back together) and
//! [`ConversationStore::mark_read_from_others`] (bulk read transition is
//! all-or-nothing from the caller's perspective).

use async_trait::async_trait;

use super::{
    entity::{Conversation, Message, MessageStatus},
    error::StoreError,
    value_object::{ConversationId, MessageContent, MessageId, Timestamp, UserId},
};

/// Durable CRUD boundary for conversations, participants and messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Fetch a conversation by id.
    async fn conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, StoreError>;

    /// All conversations the user participates in, ascending by id.
    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<Conversation>, StoreError>;

    /// Find the conversation whose participant set is exactly `{a, b}`.
    ///
    /// Exact match on cardinality 2 and membership; argument order is
    /// irrelevant.
    async fn find_pair_conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Atomically create a conversation with both participants and an
    /// optional first message sent by `creator` with status `sent`.
    async fn create_conversation(
        &self,
        creator: &UserId,
        peer: &UserId,
        initial_message: Option<MessageContent>,
        created_at: Timestamp,
    ) -> Result<Conversation, StoreError>;

    /// Persist the conversation's display name. Set at most once.
    async fn set_conversation_name(
        &self,
        id: ConversationId,
        name: &str,
    ) -> Result<(), StoreError>;

    /// Whether `user` is a current participant of the conversation.
    async fn is_participant(
        &self,
        id: ConversationId,
        user: &UserId,
    ) -> Result<bool, StoreError>;

    /// Append a message with status `sent`.
    async fn insert_message(
        &self,
        conversation: ConversationId,
        sender: &UserId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Message, StoreError>;

    /// All messages of a conversation, ascending by timestamp (id breaks
    /// ties).
    async fn messages(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<Message>, StoreError>;

    /// The most recent message of a conversation, if any.
    async fn latest_message(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<Message>, StoreError>;

    /// Atomically transition every unread message not sent by `reader`
    /// to `read`. Returns the number of rows changed.
    async fn mark_read_from_others(
        &self,
        conversation: ConversationId,
        reader: &UserId,
    ) -> Result<u64, StoreError>;

    /// Fetch a message by id.
    async fn message(&self, id: MessageId) -> Result<Option<Message>, StoreError>;

    /// Override a message's status. Returns `false` if the row is absent.
    async fn set_message_status(
        &self,
        id: MessageId,
        status: MessageStatus,
    ) -> Result<bool, StoreError>;
}
