//! Conversation repository trait (port)

use async_trait::async_trait;
use crate::domain::{CanonicalPair, Conversation, ConversationId};
use crate::error::DomainError;

/// Persistent conversation store.
///
/// No uniqueness guarantee on the participant pair is assumed here; the
/// resolver defends "one conversation per pair" itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Exact match on both participant columns, in canonical order
    async fn find_by_pair(&self, pair: &CanonicalPair) -> Result<Option<Conversation>, DomainError>;
    async fn create(&self, pair: &CanonicalPair) -> Result<Conversation, DomainError>;
    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError>;
}
