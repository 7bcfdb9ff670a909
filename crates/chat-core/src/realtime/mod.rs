//! Realtime delivery of newly inserted messages

pub mod bus;
pub mod subscription;

pub use bus::{MessageBus, MessageStream};
pub use subscription::Subscription;

#[cfg(test)]
pub use bus::MockMessageBus;
