use std::collections::HashSet;

use crate::domain::{Message, MessageId};

/// Ordered, duplicate-free view of one conversation.
///
/// Combines the batch fetched before subscribing with live deliveries. A
/// message inserted between the fetch and the subscription becoming active
/// can arrive through both paths; it is kept once.
#[derive(Debug, Default, Clone)]
pub struct MessageFeed {
    messages: Vec<Message>,
    seen: HashSet<MessageId>,
}

impl MessageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_initial(batch: Vec<Message>) -> Self {
        let mut feed = Self::new();
        for message in batch {
            feed.push(message);
        }
        feed
    }

    /// Returns false when the message was already present
    pub fn push(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }
        let order = (message.created_at, message.id);
        let position = self
            .messages
            .partition_point(|m| (m.created_at, m.id) <= order);
        self.messages.insert(position, message);
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConversationId, ParticipantId};
    use chrono::{Duration, Utc};

    fn message(id: i64, offset_secs: i64) -> Message {
        Message {
            id: MessageId(id),
            conversation_id: ConversationId(1),
            sender_id: ParticipantId::parse("U1").unwrap(),
            content: format!("m{}", id),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_duplicate_delivery_kept_once() {
        let first = message(1, 0);
        let boundary = message(2, 1);
        let mut feed = MessageFeed::from_initial(vec![first, boundary.clone()]);

        assert!(!feed.push(boundary));
        assert!(feed.push(message(3, 2)));
        assert_eq!(feed.len(), 3);
    }

    #[test]
    fn test_late_delivery_is_ordered() {
        let mut feed = MessageFeed::new();
        feed.push(message(3, 30));
        feed.push(message(1, 10));
        feed.push(message(2, 20));

        let ids: Vec<i64> = feed.messages().iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(feed.last().unwrap().id, MessageId(3));
    }
}
