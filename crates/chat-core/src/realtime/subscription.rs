//! Cancellable subscription handle

use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::ConversationId;

/// Handle to a running message subscription.
///
/// Delivery stops on `unsubscribe` or when the handle is dropped.
#[derive(Debug)]
pub struct Subscription {
    conversation_id: ConversationId,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(conversation_id: ConversationId, task: JoinHandle<()>) -> Self {
        Self { conversation_id, task }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// False once the bus stream ended or the subscription was cancelled
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn unsubscribe(self) {
        debug!("Unsubscribing from conversation {}", self.conversation_id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
