use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use chat_core::domain::{ConversationId, Message, MessageId, NewMessage};
use chat_core::error::DomainError;
use chat_core::repositories::MessageRepository;

use crate::realtime::BroadcastMessageBus;

#[derive(Default)]
struct MessageTable {
    rows: Vec<Message>,
    next_id: i64,
}

/// Message store kept in process memory.
///
/// When attached to a bus every insert is published to it, standing in for
/// the Postgres insert trigger.
pub struct InMemoryMessageRepository {
    table: Mutex<MessageTable>,
    bus: Option<Arc<BroadcastMessageBus>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MessageTable::default()),
            bus: None,
        }
    }

    pub fn with_bus(bus: Arc<BroadcastMessageBus>) -> Self {
        Self {
            table: Mutex::new(MessageTable::default()),
            bus: Some(bus),
        }
    }

    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, DomainError> {
        let stored = {
            let mut table = self.table.lock();
            table.next_id += 1;
            let stored = Message {
                id: MessageId(table.next_id),
                conversation_id: message.conversation_id,
                sender_id: message.sender_id.clone(),
                content: message.content.clone(),
                created_at: Utc::now(),
            };
            table.rows.push(stored.clone());
            stored
        };

        if let Some(bus) = &self.bus {
            bus.publish(&stored);
        }
        Ok(stored)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError> {
        let table = self.table.lock();
        Ok(table.rows.iter().find(|m| m.id == id).cloned())
    }

    async fn list_recent(&self, conversation_id: ConversationId, limit: u32) -> Result<Vec<Message>, DomainError> {
        let table = self.table.lock();
        let matching: Vec<&Message> = table
            .rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect();
        let skip = matching.len().saturating_sub(limit as usize);
        Ok(matching.into_iter().skip(skip).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::domain::ParticipantId;

    fn new_message(conversation: i64, content: &str) -> NewMessage {
        NewMessage::new(
            ConversationId(conversation),
            ParticipantId::parse("U1").unwrap(),
            content.to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_recent_keeps_latest_oldest_first() {
        let repo = InMemoryMessageRepository::new();
        for i in 1..=5 {
            repo.insert(&new_message(1, &format!("m{}", i))).await.unwrap();
        }
        repo.insert(&new_message(2, "other")).await.unwrap();

        let recent = repo.list_recent(ConversationId(1), 3).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4", "m5"]);
        assert!(repo.list_recent(ConversationId(9), 10).await.unwrap().is_empty());
    }
}
