//! Wire messages - the versioned JSON contract sent over the queue.
//!
//! Every concrete message flattens an [`Envelope`] (`messageId`, `eventType`,
//! `timestamp`) next to its domain fields:
//!
//! ```json
//! {
//!   "messageId": "6f1c...",
//!   "eventType": "PRODUCT_CREATED",
//!   "timestamp": "2024-05-01T12:00:00Z",
//!   "entityId": "p1",
//!   "name": "Cola",
//!   "price": "5.50"
//! }
//! ```
//!
//! Decoding ignores unknown fields and leaves absent domain fields unset, so
//! older consumers keep working when producers add fields.

mod envelope;
mod product;
mod user;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::MappingError;
use crate::event::EventKind;

pub use envelope::Envelope;
pub use product::{ProductFields, StandardProductMessage};
pub use user::{StandardUserMessage, UserFields};

/// A message type that can travel over the queue.
pub trait WireMessage: Serialize + DeserializeOwned + Send + Sync {
    fn envelope(&self) -> &Envelope;

    fn message_id(&self) -> &str {
        self.envelope().message_id()
    }

    fn event_type(&self) -> &str {
        self.envelope().event_type()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.envelope().timestamp()
    }
}

impl WireMessage for Envelope {
    fn envelope(&self) -> &Envelope {
        self
    }
}

/// The closed set of `eventType` tags of one bounded context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventTypes {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

impl EventTypes {
    pub const fn new(created: &'static str, updated: &'static str, deleted: &'static str) -> Self {
        Self {
            created,
            updated,
            deleted,
        }
    }

    /// Wire tag for an event kind.
    pub fn tag(&self, kind: EventKind) -> &'static str {
        match kind {
            EventKind::Created => self.created,
            EventKind::Updated => self.updated,
            EventKind::Deleted => self.deleted,
        }
    }

    /// Event kind for a wire tag; anything outside the set is a mapping failure.
    pub fn kind(&self, event_type: &str) -> Result<EventKind, MappingError> {
        EventKind::ALL
            .into_iter()
            .find(|kind| self.tag(*kind) == event_type)
            .ok_or_else(|| MappingError::UnknownEventType(event_type.to_string()))
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.kind(event_type).is_ok()
    }

    pub fn all(&self) -> [&'static str; 3] {
        [self.created, self.updated, self.deleted]
    }
}
