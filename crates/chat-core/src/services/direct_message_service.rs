// ============================================================================
// Chat Core - Direct Message Service
// File: crates/chat-core/src/services/direct_message_service.rs
// ============================================================================
//! Caller-facing private chat operations: every call resolves the
//! conversation first, so a resolution failure stops the send, fetch or
//! subscribe before it touches messages.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chat_shared::constants::{DEFAULT_FETCH_LIMIT, MAX_FETCH_LIMIT};
use futures::StreamExt;
use tracing::{debug, error, info};

use crate::domain::{Conversation, Message, NewMessage, ParticipantId};
use crate::error::DomainError;
use crate::realtime::{MessageBus, MessageStream, Subscription};
use crate::repositories::{ConversationRepository, MessageRepository};
use crate::services::conversation_resolver::ConversationResolver;
use crate::services::directory_cache::DirectoryStats;

pub struct DirectMessageService<C, M, B>
where
    C: ConversationRepository + ?Sized,
    M: MessageRepository + ?Sized,
    B: MessageBus + ?Sized,
{
    resolver: ConversationResolver<C>,
    message_repo: Arc<M>,
    bus: Arc<B>,
}

impl<C, M, B> DirectMessageService<C, M, B>
where
    C: ConversationRepository + ?Sized,
    M: MessageRepository + ?Sized,
    B: MessageBus + ?Sized,
{
    pub fn new(resolver: ConversationResolver<C>, message_repo: Arc<M>, bus: Arc<B>) -> Self {
        Self {
            resolver,
            message_repo,
            bus,
        }
    }

    pub async fn resolve_conversation(
        &self,
        participant_a: &str,
        participant_b: &str,
    ) -> Result<Conversation, DomainError> {
        self.resolver.resolve(participant_a, participant_b).await
    }

    /// Append a message from `sender` to the conversation with `recipient`
    pub async fn send_message(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> Result<Message, DomainError> {
        let conversation = self.resolver.resolve(sender, recipient).await?;
        let sender_id = ParticipantId::parse(sender)?;
        let new_message = NewMessage::new(conversation.id, sender_id, content.to_string())?;

        let message = self.message_repo.insert(&new_message).await?;
        info!(
            "Message {} sent in conversation {} ({} chars)",
            message.id,
            conversation.id,
            message.content.chars().count()
        );
        Ok(message)
    }

    /// Most recent messages between two participants, oldest first.
    /// An empty conversation yields an empty list.
    pub async fn fetch_recent_messages(
        &self,
        participant_a: &str,
        participant_b: &str,
    ) -> Result<Vec<Message>, DomainError> {
        self.fetch_recent_messages_with_limit(participant_a, participant_b, DEFAULT_FETCH_LIMIT)
            .await
    }

    /// `limit` is clamped to `1..=MAX_FETCH_LIMIT`
    pub async fn fetch_recent_messages_with_limit(
        &self,
        participant_a: &str,
        participant_b: &str,
        limit: u32,
    ) -> Result<Vec<Message>, DomainError> {
        let conversation = self.resolver.resolve(participant_a, participant_b).await?;
        let limit = limit.clamp(1, MAX_FETCH_LIMIT);

        let messages = self.message_repo.list_recent(conversation.id, limit).await?;
        debug!(
            "Fetched {} messages from conversation {}",
            messages.len(),
            conversation.id
        );
        Ok(messages)
    }

    /// Live messages of the conversation between two participants
    pub async fn message_stream(
        &self,
        participant_a: &str,
        participant_b: &str,
    ) -> Result<MessageStream, DomainError> {
        let conversation = self.resolver.resolve(participant_a, participant_b).await?;
        self.bus
            .subscribe(conversation.id)
            .await
            .map_err(|e| match e {
                DomainError::SubscriptionError(_) => e,
                other => DomainError::subscription(other.to_string()),
            })
    }

    /// Invoke `callback` for every message inserted after this call returns.
    ///
    /// A panicking callback is logged and skipped; the subscription keeps
    /// running until the handle is dropped or unsubscribed.
    pub async fn subscribe_to_new_messages<F>(
        &self,
        participant_a: &str,
        participant_b: &str,
        callback: F,
    ) -> Result<Subscription, DomainError>
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        let conversation = self.resolver.resolve(participant_a, participant_b).await?;
        let mut stream = self
            .bus
            .subscribe(conversation.id)
            .await
            .map_err(|e| match e {
                DomainError::SubscriptionError(_) => e,
                other => DomainError::subscription(other.to_string()),
            })?;

        let conversation_id = conversation.id;
        let task = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                let message_id = message.id;
                if catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
                    error!(
                        "Subscriber callback panicked on message {} in conversation {}",
                        message_id, conversation_id
                    );
                }
            }
            debug!("Message stream for conversation {} ended", conversation_id);
        });

        info!("Subscribed to conversation {}", conversation_id);
        Ok(Subscription::new(conversation_id, task))
    }

    pub fn directory_stats(&self) -> DirectoryStats {
        self.resolver.directory_stats()
    }
}
