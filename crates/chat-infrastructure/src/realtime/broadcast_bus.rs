use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use chat_core::domain::{ConversationId, Message};
use chat_core::error::DomainError;
use chat_core::realtime::{MessageBus, MessageStream};

/// One broadcast topic per conversation.
///
/// Publishing to a conversation nobody listens to is a no-op (at-most-once
/// delivery). A subscriber that falls more than `capacity` messages behind
/// skips the overflow and keeps going.
pub struct BroadcastMessageBus {
    topics: DashMap<ConversationId, broadcast::Sender<Message>>,
    capacity: usize,
}

impl BroadcastMessageBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns the number of subscribers the message reached
    pub fn publish(&self, message: &Message) -> usize {
        match self.topics.get(&message.conversation_id) {
            Some(sender) => {
                let delivered = sender.send(message.clone()).unwrap_or(0);
                debug!(
                    "Published message {} to {} subscriber(s) of conversation {}",
                    message.id, delivered, message.conversation_id
                );
                delivered
            }
            None => 0,
        }
    }

    pub fn has_subscribers(&self, conversation_id: ConversationId) -> bool {
        self.topics
            .get(&conversation_id)
            .is_some_and(|sender| sender.receiver_count() > 0)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Drops topics whose subscribers are all gone; returns how many were removed
    pub fn prune_idle(&self) -> usize {
        let before = self.topics.len();
        self.topics.retain(|_, sender| sender.receiver_count() > 0);
        before.saturating_sub(self.topics.len())
    }

    /// Ends every open subscription stream
    pub fn close(&self) {
        self.topics.clear();
    }

    fn receiver(&self, conversation_id: ConversationId) -> broadcast::Receiver<Message> {
        self.topics
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }
}

#[async_trait]
impl MessageBus for BroadcastMessageBus {
    async fn subscribe(&self, conversation_id: ConversationId) -> Result<MessageStream, DomainError> {
        let mut rx = self.receiver(conversation_id);
        let stream = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(message) => yield message,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Subscriber of conversation {} lagged, skipped {} message(s)", conversation_id, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::domain::{MessageId, ParticipantId};
    use chrono::Utc;

    fn message(id: i64, conversation: i64) -> Message {
        Message {
            id: MessageId(id),
            conversation_id: ConversationId(conversation),
            sender_id: ParticipantId::parse("U1").unwrap(),
            content: format!("m{}", id),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_delivery_scoped_to_conversation() {
        let bus = BroadcastMessageBus::new(16);
        let mut first = bus.subscribe(ConversationId(1)).await.unwrap();
        let _second = bus.subscribe(ConversationId(2)).await.unwrap();

        assert_eq!(bus.publish(&message(10, 2)), 1);
        assert_eq!(bus.publish(&message(11, 1)), 1);

        let received = first.next().await.unwrap();
        assert_eq!(received.id, MessageId(11));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = BroadcastMessageBus::new(16);
        assert_eq!(bus.publish(&message(1, 1)), 0);
        assert_eq!(bus.topic_count(), 0);
        assert!(!bus.has_subscribers(ConversationId(1)));

        let stream = bus.subscribe(ConversationId(1)).await.unwrap();
        assert!(bus.has_subscribers(ConversationId(1)));
        drop(stream);
        assert!(!bus.has_subscribers(ConversationId(1)));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_continues() {
        let bus = BroadcastMessageBus::new(2);
        let mut stream = bus.subscribe(ConversationId(1)).await.unwrap();
        for id in 1..=5 {
            bus.publish(&message(id, 1));
        }

        // oldest messages were overwritten
        let received = stream.next().await.unwrap();
        assert_eq!(received.id, MessageId(4));
        assert_eq!(stream.next().await.unwrap().id, MessageId(5));
    }

    #[tokio::test]
    async fn test_close_ends_streams_and_prune() {
        let bus = BroadcastMessageBus::new(4);
        let stream = bus.subscribe(ConversationId(1)).await.unwrap();
        drop(stream);
        assert_eq!(bus.prune_idle(), 1);

        let mut stream = bus.subscribe(ConversationId(1)).await.unwrap();
        bus.close();
        assert!(stream.next().await.is_none());
    }
}
