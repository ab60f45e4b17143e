//! Repository pattern implementations.
//!
//! Concrete backends for the domain-owned ConversationStore trait. The
//! usecase layer depends on the trait, never on these types directly
//! (dependency inversion).

pub mod inmemory;

pub use inmemory::InMemoryConversationStore;
