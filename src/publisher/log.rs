use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{info, warn};

use super::{EventPublisher, PublishStatus};
use crate::event::{DomainEvent, EventPayload};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogPublisherError {
    #[error("log publisher buffer poisoned")]
    BufferPoisoned,
}

/// Publisher used when no queue is configured.
///
/// Every event becomes one `info` line. With a buffer attached the formatted
/// line is also kept, which is what tests assert on.
#[derive(Clone, Default)]
pub struct LogPublisher {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl LogPublisher {
    pub fn new() -> Self {
        LogPublisher { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogPublisher {
            buffer: Some(buffer),
        }
    }

    fn record(&self, line: String) -> Result<(), LogPublisherError> {
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| LogPublisherError::BufferPoisoned)?;
            buffer.push(line);
        }
        Ok(())
    }
}

impl<E: EventPayload> EventPublisher<E> for LogPublisher {
    fn publish(&self, event: &DomainEvent<E>) -> PublishStatus {
        info!(
            event_id = %event.event_id(),
            event = %event.tag(),
            entity_id = %event.entity_id(),
            occurred_on = %event.occurred_on(),
            "domain event published"
        );

        let line = format!(
            "[EVENT] {} {} event_id={}",
            event.tag(),
            event.entity_id(),
            event.event_id()
        );
        match self.record(line) {
            Ok(()) => PublishStatus::Logged,
            Err(err) => {
                warn!(event = %event.tag(), error = %err, "failed to record event");
                PublishStatus::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
