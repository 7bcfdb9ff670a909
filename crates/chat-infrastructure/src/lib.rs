//! # Chat Infrastructure
//! 
//! Database, realtime and in-memory implementations (adapters).

pub mod database;
pub mod realtime;
pub mod memory;

pub use database::{create_pool, run_migrations, PgConversationRepository, PgMessageRepository};
pub use realtime::{forward_notification, BroadcastMessageBus, MessageNotification, PgMessageListener};
pub use memory::{InMemoryConversationRepository, InMemoryMessageRepository};
