//! Queue bus - point-to-point transport for wire messages
//!
//! Producers and consumers talk to a [`QueueClient`]; the bridge never owns
//! a broker connection of its own.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐          ┌──────────────────────────┐
//! │    QueueProducer     │          │      QueueConsumer       │
//! │  send(dest, message) │          │ poll / decode / delete   │
//! └──────────────────────┘          └──────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      QueueClient trait                       │
//! │  send_message / receive_messages / delete_message            │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                    │
//!          ▼                                    ▼
//! ┌─────────────────┐                 ┌─────────────────────────┐
//! │  InMemoryQueue  │                 │  SQS-style client       │
//! │   (included)    │                 │     (external)          │
//! └─────────────────┘                 └─────────────────────────┘
//! ```
//!
//! ## Delivery semantics
//!
//! At-least-once. A received message stays hidden until deleted or until its
//! visibility timeout expires, after which it is delivered again.
//!
//! ```ignore
//! let queue = Arc::new(InMemoryQueue::new());
//! let producer = QueueProducer::new(Arc::clone(&queue));
//! let consumer = QueueConsumer::new(queue);
//!
//! producer.send("products", &message)?;
//! for delivery in consumer.poll::<StandardProductMessage>("products", 10, 20) {
//!     if delivery.message.is_ok() {
//!         consumer.delete("products", delivery.into_receipt())?;
//!     }
//! }
//! ```

mod client;
mod consumer;
mod in_memory_queue;
mod producer;

pub use client::{QueueClient, RawMessage, ReceiptHandle, MAX_BATCH};
pub use consumer::{Delivery, QueueConsumer};
pub use in_memory_queue::InMemoryQueue;
pub use producer::{QueueProducer, SentMessage};
