//! Error taxonomy for the bridge.
//!
//! Each failure kind is its own type so call sites can tell a deterministic
//! encode problem from a retryable transport problem without string matching.

use std::error::Error;

use thiserror::Error;

use crate::config::ConfigError;

/// An outbound message could not be serialized. Deterministic: retrying the
/// same message yields the same failure.
#[derive(Debug, Error)]
#[error("failed to encode {event_type} message {message_id}: {source}")]
pub struct EncodeError {
    pub message_id: String,
    pub event_type: String,
    #[source]
    pub source: serde_json::Error,
}

/// The queue transport failed a send, receive or delete.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the queue failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The queue rejected the request
    #[error("request rejected: {0}")]
    Rejected(String),
    /// No response within the transport deadline
    #[error("transport timeout")]
    Timeout,
    /// Credentials missing or refused
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The receipt handle does not belong to a current delivery
    #[error("receipt handle does not match any in-flight message")]
    InvalidReceipt,
    #[error("transport error: {0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}

/// A received body does not match the requested message shape.
#[derive(Debug, Error)]
#[error("malformed message {message_id}: {source}")]
pub struct DecodeError {
    /// Transport-assigned id of the offending message.
    pub message_id: String,
    #[source]
    pub source: serde_json::Error,
}

/// Translation between a domain event and a wire message is not possible.
///
/// This is a programming or configuration defect, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("no wire mapping for event type `{0}`")]
    UnknownEventType(String),
    #[error("message {message_id} is missing `{field}`")]
    MissingField {
        message_id: String,
        field: &'static str,
    },
}

/// Failure of a single [`QueueProducer::send`](crate::QueueProducer::send).
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure reported by a [`MessageHandler`](crate::MessageHandler).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Business logic refused the message.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("handler error: {0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}

/// Umbrella error for callers that want a single type.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<SendError> for BridgeError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Encode(e) => BridgeError::Encode(e),
            SendError::Transport(e) => BridgeError::Transport(e),
        }
    }
}

impl SendError {
    /// Whether the caller may try the same send again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SendError::Transport(_))
    }
}

impl BridgeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::Transport(_))
    }
}
