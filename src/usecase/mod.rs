//! UseCase layer.
//!
//! Business operations invoked by the UI layer. Each usecase holds the
//! storage boundary as `Arc<dyn ConversationStore>` and never touches the
//! transport or the connection registry.

pub mod create_conversation;
pub mod error;
pub mod mark_read;
pub mod send_message;
pub mod set_status;

pub use create_conversation::{FindOrCreateConversationUseCase, PairLockRegistry};
pub use error::ChatError;
pub use mark_read::MarkConversationReadUseCase;
pub use send_message::SendMessageUseCase;
pub use set_status::UpdateMessageStatusUseCase;
