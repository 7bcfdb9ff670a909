use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use chat_core::domain::{ConversationId, MessageId};
use chat_core::error::DomainError;
use chat_core::repositories::MessageRepository;

use super::BroadcastMessageBus;
use crate::database::PgMessageRepository;

/// Payload of the `notify_new_message` trigger: ids only, the row is loaded
/// by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MessageNotification {
    pub id: MessageId,
    pub conversation_id: ConversationId,
}

impl MessageNotification {
    /// Malformed payloads are logged and dropped
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(notification) => Some(notification),
            Err(e) => {
                error!("Failed to parse message notification payload: {}", e);
                None
            }
        }
    }
}

/// Load the notified message and publish it. Returns the number of
/// subscribers reached; the row is not loaded when nobody listens.
pub async fn forward_notification<R>(
    repo: &R,
    bus: &BroadcastMessageBus,
    notification: MessageNotification,
) -> Result<usize, DomainError>
where
    R: MessageRepository + ?Sized,
{
    if !bus.has_subscribers(notification.conversation_id) {
        return Ok(0);
    }

    match repo.find_by_id(notification.id).await? {
        Some(message) => Ok(bus.publish(&message)),
        None => {
            warn!("Notified message {} no longer exists", notification.id);
            Ok(0)
        }
    }
}

/// Forwards `NOTIFY` events of inserted message rows to the broadcast bus.
///
/// Notifications sent while the listener is reconnecting are lost; callers
/// refetch recent messages to fill the gap.
pub struct PgMessageListener {
    pool: PgPool,
    repo: PgMessageRepository,
    channel: String,
    bus: Arc<BroadcastMessageBus>,
    reconnect_delay: Duration,
}

impl PgMessageListener {
    pub fn new(
        pool: PgPool,
        channel: String,
        bus: Arc<BroadcastMessageBus>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            repo: PgMessageRepository::new(pool.clone()),
            pool,
            channel,
            bus,
            reconnect_delay,
        }
    }

    /// Start listening in a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        loop {
            info!("🔄 Connecting message listener to channel {}...", self.channel);
            match self.listen().await {
                Ok(()) => warn!("Message listener on {} stopped", self.channel),
                Err(e) => error!("Message listener on {} failed: {}", self.channel, e),
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn listen(&self) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(&self.channel).await?;
        info!("✅ Started listening on channel: {}", self.channel);

        loop {
            let notification = listener.recv().await?;
            debug!("Received notification on {}", notification.channel());

            let Some(notification) = MessageNotification::parse(notification.payload()) else {
                continue;
            };
            if let Err(e) = forward_notification(&self.repo, &self.bus, notification).await {
                error!("Failed to forward message {}: {}", notification.id, e);
            }
        }
    }
}
