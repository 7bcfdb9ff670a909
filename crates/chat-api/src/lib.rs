//! # Chat API
//! 
//! HTTP handlers, DTOs, response envelope and router for private chat.

pub mod handlers;
pub mod dto;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::{AppState, ChatService};
