//! Repository traits (ports)

pub mod conversation_repository;
pub mod message_repository;

pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;

#[cfg(test)]
pub use conversation_repository::MockConversationRepository;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
