//! # Chat Core
//! 
//! Domain entities, services, and repository traits for private conversations.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod realtime;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, StorageErrorKind};
