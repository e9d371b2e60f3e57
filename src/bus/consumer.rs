//! Inbound side: long-poll, decode, and acknowledge by explicit delete.
//!
//! Per message the lifecycle is `Available -> InFlight (receive) -> Deleted`.
//! A message that is received but never deleted returns to `Available` once
//! the transport's visibility timeout expires; this module relies on that
//! instead of tracking it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::client::{QueueClient, RawMessage, ReceiptHandle, MAX_BATCH};
use crate::error::{DecodeError, TransportError};
use crate::message::WireMessage;

/// One received message with its decode outcome.
///
/// A failed decode keeps the raw body so the caller can inspect it before
/// deciding whether to delete or leave it for redelivery.
#[derive(Debug)]
pub struct Delivery<T> {
    pub raw: RawMessage,
    pub message: Result<T, DecodeError>,
}

impl<T> Delivery<T> {
    pub fn message_id(&self) -> &str {
        &self.raw.message_id
    }

    pub fn receipt_handle(&self) -> &ReceiptHandle {
        &self.raw.receipt_handle
    }

    pub fn is_malformed(&self) -> bool {
        self.message.is_err()
    }

    pub fn into_receipt(self) -> ReceiptHandle {
        self.raw.receipt_handle
    }
}

pub struct QueueConsumer<C> {
    client: Arc<C>,
}

impl<C> Clone for QueueConsumer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: QueueClient> QueueConsumer<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Long-poll `destination` for up to `max_messages` (clamped to 1..=10),
    /// waiting at most `wait_seconds` on an empty queue.
    ///
    /// Never fails: a transport error degrades to an empty batch and a
    /// warning, so a polling loop survives transient outages.
    pub fn receive(
        &self,
        destination: &str,
        max_messages: u32,
        wait_seconds: u64,
    ) -> Vec<RawMessage> {
        let max_messages = max_messages.clamp(1, MAX_BATCH);
        let started = Instant::now();

        match self
            .client
            .receive_messages(destination, max_messages, Duration::from_secs(wait_seconds))
        {
            Ok(messages) => {
                debug!(
                    destination = %destination,
                    received = messages.len(),
                    waited_ms = started.elapsed().as_millis() as u64,
                    "poll completed"
                );
                messages
            }
            Err(err) => {
                warn!(
                    destination = %destination,
                    error = %err,
                    "receive failed, treating as empty poll"
                );
                Vec::new()
            }
        }
    }

    /// Deserialize a raw body into `T`.
    ///
    /// Unknown fields are ignored; a body that does not match `T` at all is
    /// a [`DecodeError`]. The message is not touched either way.
    pub fn decode<T: WireMessage>(&self, raw: &RawMessage) -> Result<T, DecodeError> {
        serde_json::from_str(&raw.body).map_err(|source| {
            warn!(
                message_id = %raw.message_id,
                receive_count = raw.receive_count,
                error = %source,
                "failed to decode message"
            );
            DecodeError {
                message_id: raw.message_id.clone(),
                source,
            }
        })
    }

    /// Acknowledge one delivery. Until this succeeds the message counts as
    /// unprocessed and will be redelivered.
    pub fn delete(
        &self,
        destination: &str,
        receipt_handle: ReceiptHandle,
    ) -> Result<(), TransportError> {
        match self.client.delete_message(destination, receipt_handle) {
            Ok(()) => {
                info!(destination = %destination, "message deleted");
                Ok(())
            }
            Err(err) => {
                warn!(destination = %destination, error = %err, "delete failed");
                Err(err)
            }
        }
    }

    /// One poll cycle: receive, then decode every message into `T`.
    pub fn poll<T: WireMessage>(
        &self,
        destination: &str,
        max_messages: u32,
        wait_seconds: u64,
    ) -> Vec<Delivery<T>> {
        self.receive(destination, max_messages, wait_seconds)
            .into_iter()
            .map(|raw| {
                let message = self.decode(&raw);
                Delivery { raw, message }
            })
            .collect()
    }
}
