//! Request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use chat_core::domain::{Conversation, Message};

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveConversationRequest {
    #[validate(length(min = 1, max = 128, message = "participant_a must be between 1 and 128 characters"))]
    pub participant_a: String,
    #[validate(length(min = 1, max = 128, message = "participant_b must be between 1 and 128 characters"))]
    pub participant_b: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 128, message = "sender_id must be between 1 and 128 characters"))]
    pub sender_id: String,
    #[validate(length(min = 1, max = 128, message = "recipient_id must be between 1 and 128 characters"))]
    pub recipient_id: String,
    pub content: String,
}

/// Query string of the message list and stream endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct ConversationQuery {
    #[validate(length(min = 1, max = 128, message = "participant_a must be between 1 and 128 characters"))]
    pub participant_a: String,
    #[validate(length(min = 1, max = 128, message = "participant_b must be between 1 and 128 characters"))]
    pub participant_b: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationDto {
    pub id: i64,
    pub key: String,
    pub participants: [String; 2],
    pub created_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        let [first, second] = conversation.participants();
        Self {
            id: conversation.id.0,
            key: conversation.key().to_string(),
            participants: [first.to_string(), second.to_string()],
            created_at: conversation.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.0,
            conversation_id: message.conversation_id.0,
            sender_id: message.sender_id.to_string(),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}
