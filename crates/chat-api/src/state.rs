use std::sync::Arc;

use sqlx::PgPool;

use chat_core::realtime::MessageBus;
use chat_core::repositories::{ConversationRepository, MessageRepository};
use chat_core::services::DirectMessageService;

/// Chat service over whichever storage backend the server was started with
pub type ChatService =
    DirectMessageService<dyn ConversationRepository, dyn MessageRepository, dyn MessageBus>;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    /// Present for the postgres backend; queried by the readiness check
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>, db: Option<PgPool>) -> Self {
        Self { chat, db }
    }
}
