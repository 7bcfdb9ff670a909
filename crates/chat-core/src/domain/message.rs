//! Message entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{ConversationId, ParticipantId};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored message. Immutable once created.
///
/// Field names follow the `messages` table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: ParticipantId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Message about to be inserted
#[derive(Debug, Clone, Validate)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub sender_id: ParticipantId,

    #[validate(length(min = 1, max = 4000, message = "Message content must be between 1 and 4000 characters"))]
    pub content: String,
}

impl NewMessage {
    pub fn new(
        conversation_id: ConversationId,
        sender_id: ParticipantId,
        content: String,
    ) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::invalid("message content must not be blank"));
        }

        let message = Self {
            conversation_id,
            sender_id,
            content,
        };
        message
            .validate()
            .map_err(|e| DomainError::invalid(e.to_string()))?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> ParticipantId {
        ParticipantId::parse("U1").unwrap()
    }

    #[test]
    fn test_new_message() {
        let message = NewMessage::new(ConversationId(1), sender(), "hello".to_string());
        assert!(message.is_ok());
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = NewMessage::new(ConversationId(1), sender(), "  \n".to_string()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_oversized_content_rejected() {
        let content = "x".repeat(4001);
        let err = NewMessage::new(ConversationId(1), sender(), content).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_limit_counts_chars_not_bytes() {
        // about 9000 bytes of UTF-8
        let content = "漢".repeat(3000);
        assert!(NewMessage::new(ConversationId(1), sender(), content).is_ok());
    }

    #[test]
    fn test_message_from_json() {
        let payload = r#"{
            "id": 12,
            "conversation_id": 3,
            "sender_id": "U1",
            "content": "hi",
            "created_at": "2026-10-18T09:30:00.123456+00:00"
        }"#;
        let message: Message = serde_json::from_str(payload).unwrap();
        assert_eq!(message.id, MessageId(12));
        assert_eq!(message.conversation_id, ConversationId(3));
        assert_eq!(message.sender_id.as_str(), "U1");
    }
}
