//! Domain services (business logic)

pub mod directory_cache;
pub mod conversation_resolver;
pub mod direct_message_service;
pub mod message_feed;

pub use directory_cache::{DirectoryCache, DirectoryStats};
pub use conversation_resolver::ConversationResolver;
pub use direct_message_service::DirectMessageService;
pub use message_feed::MessageFeed;
