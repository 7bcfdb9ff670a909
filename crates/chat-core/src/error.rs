//! Domain errors

use std::fmt;
use thiserror::Error;

/// Coarse classification of persistence failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// A uniqueness constraint rejected the write
    Conflict,
    /// The store could not be reached
    Unavailable,
    /// The store returned data that cannot be mapped into the domain
    Corrupt,
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageErrorKind::Conflict => "conflict",
            StorageErrorKind::Unavailable => "unavailable",
            StorageErrorKind::Corrupt => "corrupt",
            StorageErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error ({kind}): {message}")]
    StorageError { kind: StorageErrorKind, message: String },

    #[error("Subscription error: {0}")]
    SubscriptionError(String),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument(message.into())
    }

    pub fn storage(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        DomainError::StorageError { kind, message: message.into() }
    }

    pub fn subscription(message: impl Into<String>) -> Self {
        DomainError::SubscriptionError(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DomainError::InvalidArgument(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::StorageError { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::StorageError { kind: StorageErrorKind::Conflict, .. })
    }

    pub fn is_subscription(&self) -> bool {
        matches!(self, DomainError::SubscriptionError(_))
    }
}
