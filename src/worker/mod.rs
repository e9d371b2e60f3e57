//! Inbound worker: poll a destination, hand each message to a handler, and
//! acknowledge only what was handled.
//!
//! ```ignore
//! let consumer = QueueConsumer::new(Arc::clone(&queue));
//! let handler = MappedHandler::new(ProductMessageMapper, |event: ProductEvent| {
//!     catalog.apply(event).map_err(|e| HandlerError::Rejected(e.to_string()))
//! });
//!
//! let worker = QueueWorker::new(consumer, "products", handler)
//!     .with_worker_id("catalog-sync")
//!     .with_wait_seconds(20);
//!
//! let handle = worker.spawn();
//! // ...
//! let stats = handle.stop();
//! ```

mod queue_worker;
mod thread;

use crate::error::HandlerError;
use crate::mapper::EventMapper;

pub use queue_worker::{CycleResult, QueueWorker, WorkerStats};
pub use thread::WorkerHandle;

/// Processes one decoded message.
///
/// Returning `Err` leaves the message un-deleted, so it is delivered again
/// once its visibility timeout expires. Handlers must tolerate duplicates.
pub trait MessageHandler<T>: Send + Sync {
    fn handle(&self, message: &T) -> Result<(), HandlerError>;
}

impl<T, F> MessageHandler<T> for F
where
    F: Fn(&T) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, message: &T) -> Result<(), HandlerError> {
        self(message)
    }
}

/// Maps each wire message back to its event payload before calling `f`.
///
/// A message that does not map (unknown `eventType`, no `entityId`) fails
/// with [`HandlerError::Mapping`] and stays on the queue.
pub struct MappedHandler<M, F> {
    mapper: M,
    f: F,
}

impl<M, F> MappedHandler<M, F>
where
    M: EventMapper,
    F: Fn(M::Event) -> Result<(), HandlerError> + Send + Sync,
{
    pub fn new(mapper: M, f: F) -> Self {
        Self { mapper, f }
    }
}

impl<M, F> MessageHandler<M::Message> for MappedHandler<M, F>
where
    M: EventMapper,
    F: Fn(M::Event) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, message: &M::Message) -> Result<(), HandlerError> {
        let event = self.mapper.from_message(message)?;
        (self.f)(event)
    }
}
