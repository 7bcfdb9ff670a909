//! Application-wide constants

/// Separator joining the two sorted participant ids of a conversation key.
/// Participant ids must never contain it.
pub const CONVERSATION_KEY_SEPARATOR: char = '_';

pub const DEFAULT_FETCH_LIMIT: u32 = 50;
pub const MAX_FETCH_LIMIT: u32 = 200;

pub const DEFAULT_NOTIFY_CHANNEL: &str = "new_message";
pub const DEFAULT_BUS_CAPACITY: usize = 256;
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;
