use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::domain::{Conversation, ConversationKey};

/// In-memory directory of resolved conversations, keyed by conversation key.
///
/// Entries live for the lifetime of the owning resolver: there is no
/// eviction and no expiry, so growth is unbounded.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    entries: DashMap<ConversationKey, Conversation>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ConversationKey) -> Option<Conversation> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Directory hit for {}", key);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Only the resolver populates the directory
    pub(crate) fn put(&self, key: ConversationKey, conversation: Conversation) {
        debug!("Caching conversation {} under {}", conversation.id, key);
        self.entries.insert(key, conversation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Directory statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
