//! Identity pair canonicalization
//!
//! Two participant ids are turned into one order-independent pair and key.
//! The key derivation must stay stable across restarts: the store is queried
//! with the same sorted order.

use std::fmt;

use chat_shared::constants::CONVERSATION_KEY_SEPARATOR;
use serde::Serialize;

use crate::domain::ParticipantId;
use crate::error::DomainError;

/// Unordered pair of distinct participants held in ascending order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalPair {
    first: ParticipantId,
    second: ParticipantId,
}

impl CanonicalPair {
    pub fn new(a: ParticipantId, b: ParticipantId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::invalid(format!(
                "a conversation needs two distinct participants, got {} twice",
                a
            )));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    /// Parses both raw ids, then sorts them
    pub fn parse(a: &str, b: &str) -> Result<Self, DomainError> {
        Self::new(ParticipantId::parse(a)?, ParticipantId::parse(b)?)
    }

    pub fn first(&self) -> &ParticipantId {
        &self.first
    }

    pub fn second(&self) -> &ParticipantId {
        &self.second
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        &self.first == participant || &self.second == participant
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey(format!(
            "{}{}{}",
            self.first, CONVERSATION_KEY_SEPARATOR, self.second
        ))
    }
}

/// Deterministic string naming one canonical pair, used as the cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn canonical_pair(a: &str, b: &str) -> Result<CanonicalPair, DomainError> {
    CanonicalPair::parse(a, b)
}

/// Order-independent key of the conversation between `a` and `b`
pub fn canonical_key(a: &str, b: &str) -> Result<ConversationKey, DomainError> {
    Ok(canonical_pair(a, b)?.key())
}
