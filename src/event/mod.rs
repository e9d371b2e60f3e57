//! Domain events - transport-agnostic notifications of committed state changes.
//!
//! A [`DomainEvent`] wraps a closed, per-bounded-context payload enum
//! ([`ProductEvent`], [`UserEvent`]) with an id and the instant it occurred.
//! Events are immutable once built: fields are private and only exposed
//! through accessors.

mod product;
mod user;

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use product::ProductEvent;
pub use user::UserEvent;

/// The kind of state change an event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Created, EventKind::Updated, EventKind::Deleted];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload family of one bounded context.
pub trait EventPayload: Clone + fmt::Debug + Send + Sync + 'static {
    /// Name of the bounded context, used in log lines.
    const CONTEXT: &'static str;

    fn kind(&self) -> EventKind;

    /// Identifier of the affected entity.
    fn entity_id(&self) -> &str;
}

/// An immutable record that a state change happened.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainEvent<P> {
    event_id: Uuid,
    occurred_on: DateTime<Utc>,
    payload: P,
}

impl<P: EventPayload> DomainEvent<P> {
    /// Raise a new event, stamping a fresh id and the current instant.
    pub fn new(payload: P) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_on: Utc::now(),
            payload,
        }
    }

    /// Rebuild an event with explicit identity, e.g. in tests.
    pub fn from_parts(event_id: Uuid, occurred_on: DateTime<Utc>, payload: P) -> Self {
        Self {
            event_id,
            occurred_on,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn entity_id(&self) -> &str {
        self.payload.entity_id()
    }

    /// `"<context>.<kind>"`, e.g. `product.created`.
    pub fn tag(&self) -> String {
        format!("{}.{}", P::CONTEXT, self.kind())
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}
