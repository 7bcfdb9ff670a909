//! HTTP handlers

pub mod health;
pub mod conversations;
pub mod messages;
