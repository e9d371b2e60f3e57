//! Transport boundary: the three queue operations the bridge relies on.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;

/// Largest batch a single receive may ask for.
pub const MAX_BATCH: u32 = 10;

/// Opaque token identifying one delivery of a message.
///
/// Deliberately not `Clone`: deleting consumes the handle, so a handle can
/// never be used again after its message was acknowledged.
#[derive(PartialEq, Eq, Hash)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReceiptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are long; the prefix is enough to correlate log lines.
        let prefix: String = self.0.chars().take(12).collect();
        write!(f, "ReceiptHandle({}..)", prefix)
    }
}

/// A message as returned by the transport, before decoding.
#[derive(Debug)]
pub struct RawMessage {
    /// Transport-assigned message id
    pub message_id: String,
    /// Handle for acknowledging this delivery
    pub receipt_handle: ReceiptHandle,
    /// Serialized wire message
    pub body: String,
    /// How many times the message has been delivered, this delivery included
    pub receive_count: u32,
}

/// Client for a point-to-point message queue.
///
/// The destination is always passed explicitly; implementations hold no
/// notion of a default queue. Implementations must be safe to share between
/// threads, since producers and consumers call them concurrently.
pub trait QueueClient: Send + Sync {
    /// Enqueue a serialized message. Returns the transport-assigned id.
    fn send_message(&self, queue_url: &str, body: &str) -> Result<String, TransportError>;

    /// Long-poll for up to `max_messages`, waiting at most `wait` when the
    /// queue is empty. Received messages stay hidden from other consumers
    /// until deleted or until the visibility timeout expires.
    fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RawMessage>, TransportError>;

    /// Acknowledge one delivery.
    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: ReceiptHandle,
    ) -> Result<(), TransportError>;
}

impl<C: QueueClient + ?Sized> QueueClient for Arc<C> {
    fn send_message(&self, queue_url: &str, body: &str) -> Result<String, TransportError> {
        (**self).send_message(queue_url, body)
    }

    fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RawMessage>, TransportError> {
        (**self).receive_messages(queue_url, max_messages, wait)
    }

    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: ReceiptHandle,
    ) -> Result<(), TransportError> {
        (**self).delete_message(queue_url, receipt_handle)
    }
}
