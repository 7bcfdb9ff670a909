//! PostgreSQL repository implementations

pub mod conversation_repo_impl;
pub mod message_repo_impl;

pub use conversation_repo_impl::PgConversationRepository;
pub use message_repo_impl::PgMessageRepository;

use chat_core::error::{DomainError, StorageErrorKind};
use tracing::error;

/// Logs a sqlx failure and classifies it for the domain
pub(crate) fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    let kind = match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageErrorKind::Conflict,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageErrorKind::Unavailable
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StorageErrorKind::Corrupt
        }
        _ => StorageErrorKind::Other,
    };
    DomainError::storage(kind, e.to_string())
}

/// A stored row that does not satisfy a domain invariant
pub(crate) fn corrupt_row(table: &str, id: i64, e: DomainError) -> DomainError {
    error!("Invalid row {} in {}: {}", id, table, e);
    DomainError::storage(StorageErrorKind::Corrupt, format!("invalid row {} in {}: {}", id, table, e))
}
