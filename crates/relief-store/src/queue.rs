//! Abstract work queue contract

use std::time::Duration;

use relief_core::Result;

/// A message received from a [`WorkQueue`].
///
/// The message stays in flight until `delete` is called with its ack token;
/// an undeleted message is redelivered (at-least-once).
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: String,
    pub ack_token: String,
}

/// An at-least-once message channel with no ordering guarantee.
///
/// One queue exists per task type, plus one results channel. `receive` uses
/// a bounded long-poll wait rather than returning immediately, so callers
/// can loop on it without busy-spinning.
pub trait WorkQueue: Send + Sync {
    /// Enqueue a message body
    fn send(&self, body: &str) -> Result<()>;

    /// Receive up to `max_messages`, waiting at most `wait` for the first one
    fn receive(&self, max_messages: usize, wait: Duration) -> Result<Vec<QueueMessage>>;

    /// Acknowledge a processed message so it is not redelivered
    fn delete(&self, ack_token: &str) -> Result<()>;
}
