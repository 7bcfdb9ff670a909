//! Message repository trait (port)

use async_trait::async_trait;
use crate::domain::{ConversationId, Message, MessageId, NewMessage};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &NewMessage) -> Result<Message, DomainError>;
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError>;
    /// Most recent `limit` messages of a conversation, oldest first
    async fn list_recent(&self, conversation_id: ConversationId, limit: u32) -> Result<Vec<Message>, DomainError>;
}
