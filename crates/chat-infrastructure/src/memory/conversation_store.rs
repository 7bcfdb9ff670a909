use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::info;

use chat_core::domain::{CanonicalPair, Conversation, ConversationId};
use chat_core::error::{DomainError, StorageErrorKind};
use chat_core::repositories::ConversationRepository;

#[derive(Default)]
struct ConversationTable {
    rows: Vec<Conversation>,
    next_id: i64,
}

/// Conversation store kept in process memory. Ids start at 1.
///
/// By default it rejects a second row for the same pair with a
/// `Conflict`, like the unique index of the Postgres schema.
pub struct InMemoryConversationRepository {
    table: Mutex<ConversationTable>,
    unique_pair: bool,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(ConversationTable::default()),
            unique_pair: true,
            lookups: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
        }
    }

    /// A store without a uniqueness guarantee on the pair
    pub fn without_unique_pair() -> Self {
        Self {
            unique_pair: false,
            ..Self::new()
        }
    }

    /// Number of pair and id lookups served
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of successful inserts
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::Relaxed)
    }

    pub fn rows_for(&self, pair: &CanonicalPair) -> Vec<Conversation> {
        self.table
            .lock()
            .rows
            .iter()
            .filter(|c| &c.pair == pair)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryConversationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_pair(&self, pair: &CanonicalPair) -> Result<Option<Conversation>, DomainError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let table = self.table.lock();
        Ok(table.rows.iter().find(|c| &c.pair == pair).cloned())
    }

    async fn create(&self, pair: &CanonicalPair) -> Result<Conversation, DomainError> {
        // Same rule as the conversations_canonical_order constraint
        if pair.first().as_str().as_bytes() >= pair.second().as_str().as_bytes() {
            return Err(DomainError::storage(
                StorageErrorKind::Other,
                format!("pair {} is not in byte order", pair.key()),
            ));
        }

        let mut table = self.table.lock();
        if self.unique_pair && table.rows.iter().any(|c| &c.pair == pair) {
            return Err(DomainError::storage(
                StorageErrorKind::Conflict,
                format!("conversation for {} already exists", pair.key()),
            ));
        }

        table.next_id += 1;
        let conversation = Conversation::new(ConversationId(table.next_id), pair.clone(), Utc::now());
        table.rows.push(conversation.clone());
        self.inserts.fetch_add(1, Ordering::Relaxed);

        info!("Created in-memory conversation {} for {}", conversation.id, pair.key());
        Ok(conversation)
    }

    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let table = self.table.lock();
        Ok(table.rows.iter().find(|c| c.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unique_pair_enforced() {
        let repo = InMemoryConversationRepository::new();
        let pair = CanonicalPair::parse("U1", "U2").unwrap();

        let created = repo.create(&pair).await.unwrap();
        assert_eq!(created.id, ConversationId(1));
        assert!(repo.create(&pair).await.unwrap_err().is_conflict());
        assert_eq!(repo.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_mixed_case_pair_stored_in_byte_order() {
        let repo = InMemoryConversationRepository::new();
        let pair = CanonicalPair::parse("alice", "Bob").unwrap();

        let created = repo.create(&pair).await.unwrap();
        let participants: Vec<&str> = created.participants().iter().map(|p| p.as_str()).collect();
        assert_eq!(participants, vec!["Bob", "alice"]);
        assert_eq!(repo.find_by_pair(&pair).await.unwrap().unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicates_allowed_without_constraint() {
        let repo = InMemoryConversationRepository::without_unique_pair();
        let pair = CanonicalPair::parse("U1", "U2").unwrap();

        repo.create(&pair).await.unwrap();
        repo.create(&pair).await.unwrap();
        assert_eq!(repo.rows_for(&pair).len(), 2);

        // lookups return the oldest row
        let found = repo.find_by_pair(&pair).await.unwrap().unwrap();
        assert_eq!(found.id, ConversationId(1));
        assert_eq!(repo.find_by_id(ConversationId(2)).await.unwrap().unwrap().id, ConversationId(2));
    }
}
