// ============================================================================
// Chat Infrastructure - PostgreSQL Conversation Repository
// File: crates/chat-infrastructure/src/database/postgres/conversation_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use chat_core::domain::{CanonicalPair, Conversation, ConversationId, ParticipantId};
use chat_core::error::DomainError;
use chat_core::repositories::ConversationRepository;

use super::{corrupt_row, storage_error};

pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ConversationRow {
    pub id: i64,
    pub participant_one: String,
    pub participant_two: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = DomainError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let pair = pair_from_columns(row.participant_one, row.participant_two)
            .map_err(|e| corrupt_row("conversations", row.id, e))?;

        Ok(Conversation::new(ConversationId(row.id), pair, row.created_at))
    }
}

fn pair_from_columns(one: String, two: String) -> Result<CanonicalPair, DomainError> {
    CanonicalPair::new(ParticipantId::parse(one)?, ParticipantId::parse(two)?)
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn find_by_pair(&self, pair: &CanonicalPair) -> Result<Option<Conversation>, DomainError> {
        // Oldest row wins should the pair ever be duplicated
        let row: Option<ConversationRow> = sqlx::query_as(
            r#"
            SELECT id, participant_one, participant_two, created_at
            FROM conversations
            WHERE participant_one = $1 AND participant_two = $2
            ORDER BY id
            LIMIT 1
            "#
        )
        .bind(pair.first().as_str())
        .bind(pair.second().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("finding conversation by pair", e))?;

        row.map(Conversation::try_from).transpose()
    }

    async fn create(&self, pair: &CanonicalPair) -> Result<Conversation, DomainError> {
        info!("Creating conversation for {}", pair.key());

        let row: ConversationRow = sqlx::query_as(
            r#"
            INSERT INTO conversations (participant_one, participant_two)
            VALUES ($1, $2)
            RETURNING id, participant_one, participant_two, created_at
            "#
        )
        .bind(pair.first().as_str())
        .bind(pair.second().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("creating conversation", e))?;

        Conversation::try_from(row)
    }

    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            r#"
            SELECT id, participant_one, participant_two, created_at
            FROM conversations
            WHERE id = $1
            "#
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("finding conversation by id", e))?;

        row.map(Conversation::try_from).transpose()
    }
}
