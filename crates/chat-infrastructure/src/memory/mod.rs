//! In-process repositories for the `memory` storage backend and tests

pub mod conversation_store;
pub mod message_store;

pub use conversation_store::InMemoryConversationRepository;
pub use message_store::InMemoryMessageRepository;
