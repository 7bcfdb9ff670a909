//! Realtime adapters: in-process broadcast bus fed by the Postgres listener

pub mod broadcast_bus;
pub mod pg_listener;

pub use broadcast_bus::BroadcastMessageBus;
pub use pg_listener::{forward_notification, MessageNotification, PgMessageListener};
