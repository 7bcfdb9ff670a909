// ============================================================================
// Chat Infrastructure - PostgreSQL Message Repository
// File: crates/chat-infrastructure/src/database/postgres/message_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use chat_core::domain::{ConversationId, Message, MessageId, NewMessage, ParticipantId};
use chat_core::error::DomainError;
use chat_core::repositories::MessageRepository;

use super::{corrupt_row, storage_error};

pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let sender_id = ParticipantId::parse(row.sender_id)
            .map_err(|e| corrupt_row("messages", row.id, e))?;

        Ok(Message {
            id: MessageId(row.id),
            conversation_id: ConversationId(row.conversation_id),
            sender_id,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, DomainError> {
        let row: MessageRow = sqlx::query_as(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, conversation_id, sender_id, content, created_at
            "#
        )
        .bind(message.conversation_id.0)
        .bind(message.sender_id.as_str())
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("inserting message", e))?;

        debug!("Inserted message {} into conversation {}", row.id, row.conversation_id);
        Message::try_from(row)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DomainError> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE id = $1
            "#
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("finding message by id", e))?;

        row.map(Message::try_from).transpose()
    }

    async fn list_recent(&self, conversation_id: ConversationId, limit: u32) -> Result<Vec<Message>, DomainError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM (
                SELECT id, conversation_id, sender_id, content, created_at
                FROM messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC, id ASC
            "#
        )
        .bind(conversation_id.0)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("listing recent messages", e))?;

        rows.into_iter().map(Message::try_from).collect()
    }
}
