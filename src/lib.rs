//! Domain-event to message-queue bridge.
//!
//! Internal state changes are raised as [`DomainEvent`]s, translated by an
//! [`EventMapper`] into a versioned [`WireMessage`], and handed to a queue by
//! the [`QueueProducer`]. The inbound side long-polls with a
//! [`QueueConsumer`], decodes into a concrete message type, and acknowledges
//! through an explicit delete once processing succeeded.
//!
//! ```text
//!  use case ──publish──▶ EventPublisher ──▶ EventDispatcher ──▶ QueueForwarder
//!                                                                  │ map + send
//!                                                                  ▼
//!                                                             QueueClient
//!                                                                  │ receive
//!  MessageHandler ◀── QueueWorker ◀── QueueConsumer (decode) ◀─────┘
//!                         └──── delete (ack) after success ────────▶
//! ```

pub mod bus;
pub mod config;
pub mod domain;
pub mod error;
pub mod event;
pub mod mapper;
pub mod message;
pub mod publisher;
pub mod worker;

pub use bus::{
    Delivery, InMemoryQueue, QueueClient, QueueConsumer, QueueProducer, RawMessage,
    ReceiptHandle, SentMessage,
};
pub use config::{BridgeConfig, ConfigError, ConsumerConfig, QueueConfig};
pub use domain::{Product, User};
pub use error::{
    BridgeError, DecodeError, EncodeError, HandlerError, MappingError, SendError, TransportError,
};
pub use event::{DomainEvent, EventKind, EventPayload, ProductEvent, UserEvent};
pub use mapper::{EventMapper, ProductMessageMapper, UserMessageMapper};
pub use message::{
    Envelope, EventTypes, ProductFields, StandardProductMessage, StandardUserMessage,
    UserFields, WireMessage,
};
#[cfg(feature = "emitter")]
pub use publisher::LocalEmitterPublisher;
pub use publisher::{
    publisher_for, DispatchReport, EventDispatcher, EventPublisher, LogPublisher,
    LogPublisherError, PublishStatus, QueueForwarder,
};
pub use worker::{
    CycleResult, MappedHandler, MessageHandler, QueueWorker, WorkerHandle, WorkerStats,
};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
