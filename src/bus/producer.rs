//! Outbound side: serialize a wire message and hand it to the transport.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::QueueClient;
use crate::error::{EncodeError, SendError};
use crate::message::WireMessage;

/// Receipt of a successful send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// Id assigned by the transport
    pub transport_message_id: String,
    /// `messageId` from the envelope
    pub message_id: String,
    pub event_type: String,
}

/// Sends wire messages to an explicit destination.
///
/// One call is one transport attempt; retry policy belongs to the caller.
pub struct QueueProducer<C> {
    client: Arc<C>,
}

impl<C> Clone for QueueProducer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: QueueClient> QueueProducer<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Serialize `message` and enqueue it on `destination`.
    ///
    /// An encode failure never reaches the transport. Sending the same
    /// message twice enqueues it twice.
    pub fn send<M: WireMessage>(
        &self,
        destination: &str,
        message: &M,
    ) -> Result<SentMessage, SendError> {
        let body = serde_json::to_string(message).map_err(|source| EncodeError {
            message_id: message.message_id().to_string(),
            event_type: message.event_type().to_string(),
            source,
        })?;

        debug!(
            message_id = %message.message_id(),
            event_type = %message.event_type(),
            destination = %destination,
            "sending message"
        );

        let transport_message_id = self
            .client
            .send_message(destination, &body)
            .map_err(|err| {
                warn!(
                    message_id = %message.message_id(),
                    event_type = %message.event_type(),
                    destination = %destination,
                    error = %err,
                    "send failed"
                );
                err
            })?;

        info!(
            transport_message_id = %transport_message_id,
            message_id = %message.message_id(),
            event_type = %message.event_type(),
            "message sent"
        );

        Ok(SentMessage {
            transport_message_id,
            message_id: message.message_id().to_string(),
            event_type: message.event_type().to_string(),
        })
    }
}
