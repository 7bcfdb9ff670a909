//! Notification bus trait (port)

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{ConversationId, Message};
use crate::error::DomainError;

/// Live messages of one conversation. Ends when the bus shuts down.
pub type MessageStream = BoxStream<'static, Message>;

/// Delivers messages inserted after the subscription became active.
///
/// Ordering relative to a batch fetched before subscribing is not
/// guaranteed: a message inserted in between can be missed or seen twice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn subscribe(&self, conversation_id: ConversationId) -> Result<MessageStream, DomainError>;
}
