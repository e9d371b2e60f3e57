//! Pure translation between domain events and wire messages.
//!
//! Mappers own no state. Created and Updated events copy the full entity
//! snapshot into the message; Deleted events only carry the identifier, so
//! mapping a deletion back yields an id-only payload. That asymmetry is
//! intended: the entity no longer exists when the deletion is published.

mod product;
mod user;

use crate::error::MappingError;
use crate::event::{DomainEvent, EventPayload};
use crate::message::{EventTypes, WireMessage};

pub use product::ProductMessageMapper;
pub use user::UserMessageMapper;

/// Bidirectional mapping for one bounded context.
pub trait EventMapper: Send + Sync + 'static {
    type Event: EventPayload;
    type Message: WireMessage;

    /// The closed set of wire tags this mapper emits and accepts.
    fn event_types(&self) -> EventTypes;

    /// Build the outbound message for an event.
    fn to_message(&self, event: &DomainEvent<Self::Event>) -> Result<Self::Message, MappingError>;

    /// Rebuild the event payload from a received message.
    fn from_message(&self, message: &Self::Message) -> Result<Self::Event, MappingError>;

    /// Wire tag for an event, from the closed set.
    fn event_type_of(&self, event: &DomainEvent<Self::Event>) -> &'static str {
        self.event_types().tag(event.kind())
    }
}
