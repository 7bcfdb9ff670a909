// ============================================================================
// Chat Core - Conversation Entity
// File: crates/chat-core/src/domain/conversation.rs
// Description: One private two-party thread
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CanonicalPair, ConversationKey, ParticipantId};

/// Store-assigned conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversation entity. Participants are always held in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub pair: CanonicalPair,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: ConversationId, pair: CanonicalPair, created_at: DateTime<Utc>) -> Self {
        Self { id, pair, created_at }
    }

    pub fn key(&self) -> ConversationKey {
        self.pair.key()
    }

    /// Both participants in canonical order
    pub fn participants(&self) -> [&ParticipantId; 2] {
        [self.pair.first(), self.pair.second()]
    }

    pub fn includes(&self, participant: &ParticipantId) -> bool {
        self.pair.contains(participant)
    }

    /// The other side of the conversation, if `participant` takes part in it
    pub fn counterpart(&self, participant: &ParticipantId) -> Option<&ParticipantId> {
        if self.pair.first() == participant {
            Some(self.pair.second())
        } else if self.pair.second() == participant {
            Some(self.pair.first())
        } else {
            None
        }
    }
}
