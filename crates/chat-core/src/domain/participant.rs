//! Participant identifier

use std::fmt;

use chat_shared::constants::CONVERSATION_KEY_SEPARATOR;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Opaque identifier of one user taking part in a private conversation.
///
/// Never empty and never contains the conversation key separator, so two
/// different pairs can not collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::invalid("participant id must not be empty"));
        }
        if raw.contains(CONVERSATION_KEY_SEPARATOR) {
            return Err(DomainError::invalid(format!(
                "participant id must not contain '{}': {}",
                CONVERSATION_KEY_SEPARATOR, raw
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for ParticipantId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ParticipantId::parse("3f2a9c").unwrap();
        assert_eq!(id.as_str(), "3f2a9c");
        assert_eq!(id.to_string(), "3f2a9c");
    }

    #[test]
    fn test_parse_rejects_empty_and_blank() {
        assert!(ParticipantId::parse("").unwrap_err().is_invalid_argument());
        assert!(ParticipantId::parse("   ").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_parse_rejects_separator() {
        let err = ParticipantId::parse("a_b").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<ParticipantId, _> = serde_json::from_str("\"U1\"");
        assert!(ok.is_ok());
        let bad: Result<ParticipantId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
