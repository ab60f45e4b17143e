//! Domain layer for the messaging service.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod naming;
pub mod repository;
pub mod value_object;

pub use entity::{Conversation, Message, MessageStatus};
pub use error::{StoreError, ValueObjectError};
pub use naming::{DEFAULT_NAME_CATALOG, assign_name};
pub use repository::ConversationStore;
pub use value_object::{ConversationId, MessageContent, MessageId, Timestamp, UserId};

#[cfg(test)]
pub use repository::MockConversationStore;
