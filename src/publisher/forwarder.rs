use std::sync::Arc;

use tracing::{debug, error};

use super::{EventDispatcher, EventPublisher, PublishStatus};
use crate::bus::{QueueClient, QueueProducer, SentMessage};
use crate::error::BridgeError;
use crate::event::DomainEvent;
use crate::mapper::EventMapper;

/// Maps events of one context and sends them to a fixed destination.
///
/// Forwarding the same event twice sends two messages; downstream consumers
/// are expected to tolerate duplicates.
pub struct QueueForwarder<C, M> {
    producer: QueueProducer<C>,
    mapper: M,
    destination: String,
}

impl<C, M> QueueForwarder<C, M>
where
    C: QueueClient + 'static,
    M: EventMapper,
{
    pub fn new(client: Arc<C>, mapper: M, destination: impl Into<String>) -> Self {
        Self {
            producer: QueueProducer::new(client),
            mapper,
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Map and send one event. Failures are logged with the entity id and
    /// returned.
    pub fn forward(&self, event: &DomainEvent<M::Event>) -> Result<SentMessage, BridgeError> {
        debug!(
            event = %event.tag(),
            entity_id = %event.entity_id(),
            destination = %self.destination,
            "forwarding event"
        );

        let sent = self
            .mapper
            .to_message(event)
            .map_err(BridgeError::from)
            .and_then(|message| {
                self.producer
                    .send(&self.destination, &message)
                    .map_err(BridgeError::from)
            });

        if let Err(err) = &sent {
            error!(
                event = %event.tag(),
                entity_id = %event.entity_id(),
                destination = %self.destination,
                retryable = err.is_retryable(),
                error = %err,
                "failed to forward event"
            );
        }
        sent
    }

    /// Subscribe this forwarder to every event kind of its context.
    pub fn register(self: Arc<Self>, dispatcher: &mut EventDispatcher<M::Event>) {
        dispatcher.subscribe_all(move |event| self.forward(event).map(|_| ()));
    }
}

impl<C, M> EventPublisher<M::Event> for QueueForwarder<C, M>
where
    C: QueueClient + 'static,
    M: EventMapper,
{
    fn publish(&self, event: &DomainEvent<M::Event>) -> PublishStatus {
        match self.forward(event) {
            Ok(sent) => PublishStatus::Sent {
                message_id: sent.message_id,
            },
            Err(err) => PublishStatus::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::InMemoryQueue;
    use crate::domain::{Product, User};
    use crate::event::{ProductEvent, UserEvent};
    use crate::mapper::{ProductMessageMapper, UserMessageMapper};
    use crate::message::StandardProductMessage;

    const Q: &str = "products";

    #[test]
    fn forward_sends_mapped_message() {
        let queue = Arc::new(InMemoryQueue::new());
        let forwarder = QueueForwarder::new(Arc::clone(&queue), ProductMessageMapper, Q);
        let product = Product::stub("p1");

        let sent = forwarder.forward(&ProductEvent::updated(product)).unwrap();

        assert_eq!(sent.event_type, StandardProductMessage::UPDATED);
        let body = queue.find_by_event_type(Q, "PRODUCT_UPDATED").unwrap();
        assert!(body.contains(r#""entityId":"p1""#));
    }

    #[test]
    fn transport_failure_is_absorbed_by_publish() {
        let queue = Arc::new(InMemoryQueue::new());
        queue.fail_next_sends(1);
        let forwarder = QueueForwarder::new(Arc::clone(&queue), ProductMessageMapper, Q);

        let status = forwarder.publish(&ProductEvent::deleted("p1"));

        assert!(status.is_failed());
        assert!(queue.is_empty(Q));
    }

    #[test]
    fn register_subscribes_every_kind() {
        let queue = Arc::new(InMemoryQueue::new());
        let forwarder = Arc::new(QueueForwarder::new(
            Arc::clone(&queue),
            UserMessageMapper,
            "users",
        ));
        let mut dispatcher = EventDispatcher::new();
        forwarder.register(&mut dispatcher);

        let user = User::new("u1", "Ana", "ana@example.com");
        dispatcher.publish(&UserEvent::created(user.clone()));
        dispatcher.publish(&UserEvent::updated(user));
        dispatcher.publish(&UserEvent::deleted("u1"));

        assert_eq!(
            queue.event_types("users"),
            vec!["USER_CREATED", "USER_UPDATED", "USER_DELETED"]
        );
    }

    #[test]
    fn dispatching_twice_sends_twice() {
        let queue = Arc::new(InMemoryQueue::new());
        let forwarder = Arc::new(QueueForwarder::new(Arc::clone(&queue), ProductMessageMapper, Q));
        let mut dispatcher = EventDispatcher::new();
        forwarder.register(&mut dispatcher);

        let event = ProductEvent::deleted("p1");
        dispatcher.publish(&event);
        dispatcher.publish(&event);

        assert_eq!(queue.len(Q), 2);
    }
}
