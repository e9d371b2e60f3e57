use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use super::{EventPublisher, PublishStatus};
use crate::event::DomainEvent;
use crate::mapper::EventMapper;
use crate::message::WireMessage;
use crate::EventEmitter;

/// Re-emits the wire JSON of each event on an in-process [`EventEmitter`],
/// under the message's `eventType`.
///
/// Listeners registered with `emitter.on("PRODUCT_CREATED", |json: String| ..)`
/// receive exactly the body a queue consumer would.
pub struct LocalEmitterPublisher<M> {
    emitter: Mutex<EventEmitter>,
    mapper: M,
}

impl<M: EventMapper> LocalEmitterPublisher<M> {
    pub fn new(emitter: EventEmitter, mapper: M) -> Self {
        LocalEmitterPublisher {
            emitter: Mutex::new(emitter),
            mapper,
        }
    }
}

impl<M: EventMapper> EventPublisher<M::Event> for LocalEmitterPublisher<M> {
    fn publish(&self, event: &DomainEvent<M::Event>) -> PublishStatus {
        let encoded = self.mapper.to_message(event).map_err(|e| e.to_string()).and_then(|message| {
            serde_json::to_string(&message)
                .map(|json| (message, json))
                .map_err(|e| e.to_string())
        });

        let (message, json) = match encoded {
            Ok(encoded) => encoded,
            Err(reason) => {
                warn!(
                    event = %event.tag(),
                    entity_id = %event.entity_id(),
                    error = %reason,
                    "failed to emit event"
                );
                return PublishStatus::Failed { reason };
            }
        };

        let mut emitter = self.emitter.lock().unwrap_or_else(PoisonError::into_inner);
        emitter.emit(message.event_type(), json);

        info!(
            message_id = %message.message_id(),
            event_type = %message.event_type(),
            "event emitted locally"
        );
        PublishStatus::Emitted {
            message_id: message.message_id().to_string(),
        }
    }
}
