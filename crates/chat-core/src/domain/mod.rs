//! # Chat Core - Domain Module
//! 
//! Domain entities for private two-party conversations.

pub mod participant;
pub mod conversation_key;
pub mod conversation;
pub mod message;

// Re-export all entities
pub use participant::ParticipantId;
pub use conversation_key::{canonical_key, canonical_pair, CanonicalPair, ConversationKey};
pub use conversation::{Conversation, ConversationId};
pub use message::{Message, MessageId, NewMessage};
