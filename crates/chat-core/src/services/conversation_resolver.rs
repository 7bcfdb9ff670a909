// ============================================================================
// Chat Core - Conversation Resolver
// File: crates/chat-core/src/services/conversation_resolver.rs
// ============================================================================
//! Resolves a participant pair to its single conversation, creating it on
//! first use.
//!
//! Two concurrent first-time resolutions of the same pair can both miss the
//! directory, both miss the store and both try to create. With a unique
//! constraint on the pair the loser falls back to one re-query and gets the
//! winner's record; without one the store ends up with two rows for the
//! pair. The resolver does not close that window.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{CanonicalPair, Conversation};
use crate::error::{DomainError, StorageErrorKind};
use crate::repositories::ConversationRepository;
use crate::services::directory_cache::{DirectoryCache, DirectoryStats};

pub struct ConversationResolver<R: ConversationRepository + ?Sized> {
    conversation_repo: Arc<R>,
    directory: DirectoryCache,
}

impl<R: ConversationRepository + ?Sized> ConversationResolver<R> {
    /// Each resolver owns a fresh, empty directory
    pub fn new(conversation_repo: Arc<R>) -> Self {
        Self {
            conversation_repo,
            directory: DirectoryCache::new(),
        }
    }

    /// Return the conversation between two participants, in either order
    pub async fn resolve(
        &self,
        participant_a: &str,
        participant_b: &str,
    ) -> Result<Conversation, DomainError> {
        // 1. Canonicalize
        let pair = CanonicalPair::parse(participant_a, participant_b)?;
        let key = pair.key();

        // 2. Directory hit, no I/O
        if let Some(conversation) = self.directory.get(&key) {
            return Ok(conversation);
        }

        // 3. Look up by the sorted pair
        if let Some(conversation) = self.conversation_repo.find_by_pair(&pair).await? {
            debug!("Found stored conversation {} for {}", conversation.id, key);
            self.directory.put(key, conversation.clone());
            return Ok(conversation);
        }

        // 4. Create
        match self.conversation_repo.create(&pair).await {
            Ok(conversation) => {
                info!("Created conversation {} for {}", conversation.id, key);
                self.directory.put(key, conversation.clone());
                Ok(conversation)
            }
            Err(create_err) => {
                warn!("Creating conversation for {} failed, re-querying: {}", key, create_err);
                self.requery_after_failed_create(&pair, create_err).await
            }
        }
    }

    /// Single re-query after a failed create, typically lost to a concurrent creator
    async fn requery_after_failed_create(
        &self,
        pair: &CanonicalPair,
        create_err: DomainError,
    ) -> Result<Conversation, DomainError> {
        let key = pair.key();
        match self.conversation_repo.find_by_pair(pair).await? {
            Some(conversation) => {
                info!("Conversation {} for {} was created concurrently", conversation.id, key);
                self.directory.put(key, conversation.clone());
                Ok(conversation)
            }
            None if create_err.is_storage() => Err(create_err),
            None => Err(DomainError::storage(
                StorageErrorKind::Other,
                format!("conversation for {} could not be created: {}", key, create_err),
            )),
        }
    }

    pub fn directory_stats(&self) -> DirectoryStats {
        self.directory.stats()
    }
}
