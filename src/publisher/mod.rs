//! Event publisher port and its implementations.
//!
//! Publishing is fire-and-forget: a use case calls [`EventPublisher::publish`]
//! after its state change is committed and carries on regardless of the
//! outcome. The returned [`PublishStatus`] is for logging and tests only.
//!
//! - [`LogPublisher`] - no transport configured, records the event as a log line
//! - [`QueueForwarder`] - maps the event and sends it to a queue destination
//! - [`EventDispatcher`] - fans an event out to handlers registered per kind
//! - [`LocalEmitterPublisher`] - re-emits the wire JSON in-process (`emitter` feature)

mod dispatcher;
#[cfg(feature = "emitter")]
mod emitter;
mod forwarder;
mod log;

use std::sync::Arc;

use tracing::info;

use crate::bus::QueueClient;
use crate::event::{DomainEvent, EventPayload};
use crate::mapper::EventMapper;

pub use dispatcher::{DispatchReport, EventDispatcher};
#[cfg(feature = "emitter")]
pub use emitter::LocalEmitterPublisher;
pub use forwarder::QueueForwarder;
pub use log::{LogPublisher, LogPublisherError};

/// Outcome of one publish attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishStatus {
    /// Handed to the transport; carries the envelope `messageId`
    Sent { message_id: String },
    /// Emitted to in-process listeners
    Emitted { message_id: String },
    /// Recorded by the log publisher only
    Logged,
    /// Fanned out to registered handlers
    Dispatched { handlers: usize, failed: usize },
    /// Absorbed failure, already logged
    Failed { reason: String },
}

impl PublishStatus {
    pub fn is_failed(&self) -> bool {
        match self {
            PublishStatus::Failed { .. } => true,
            PublishStatus::Dispatched { failed, .. } => *failed > 0,
            _ => false,
        }
    }
}

/// Publish port for one bounded context.
///
/// Implementations must not fail the caller for transport conditions;
/// every failure is logged and reported through [`PublishStatus::Failed`].
pub trait EventPublisher<E: EventPayload>: Send + Sync {
    fn publish(&self, event: &DomainEvent<E>) -> PublishStatus;
}

impl<E: EventPayload, P: EventPublisher<E> + ?Sized> EventPublisher<E> for Arc<P> {
    fn publish(&self, event: &DomainEvent<E>) -> PublishStatus {
        (**self).publish(event)
    }
}

impl<E: EventPayload, P: EventPublisher<E> + ?Sized> EventPublisher<E> for Box<P> {
    fn publish(&self, event: &DomainEvent<E>) -> PublishStatus {
        (**self).publish(event)
    }
}

/// Pick a publisher for one context: forward to `destination` when one is
/// configured, otherwise only log.
pub fn publisher_for<C, M>(
    destination: Option<&str>,
    client: Arc<C>,
    mapper: M,
) -> Box<dyn EventPublisher<M::Event>>
where
    C: QueueClient + 'static,
    M: EventMapper,
{
    let context = <M::Event as EventPayload>::CONTEXT;
    match destination {
        Some(destination) => {
            info!(context, destination = %destination, "publishing events to queue");
            Box::new(QueueForwarder::new(client, mapper, destination))
        }
        None => {
            info!(context, "no queue configured, events will only be logged");
            Box::new(LogPublisher::new())
        }
    }
}
