//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use event_bridge::{
    InMemoryQueue, Product, QueueClient, RawMessage, ReceiptHandle, TransportError, User,
};
use rust_decimal::Decimal;

pub const PRODUCTS: &str = "https://queue.local/000000000000/products";
pub const USERS: &str = "https://queue.local/000000000000/users";

/// Install a test-writer subscriber once. Set `RUST_LOG=event_bridge=debug`
/// to see the bridge's log lines for a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn cola() -> Product {
    Product::new(
        "p1",
        "Cola",
        "Bebida",
        "Refrigerante gelado",
        Decimal::new(550, 2),
        0,
    )
}

pub fn burger() -> Product {
    Product::new(
        "p2",
        "X-Burger",
        "Lanche",
        "Pão, carne e queijo",
        Decimal::new(2390, 2),
        12,
    )
}

pub fn ana() -> User {
    User::new("u1", "Ana", "ana@example.com")
}

/// One transport call as seen by [`RecordingClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Send { queue_url: String },
    Receive { queue_url: String, max_messages: u32, wait: Duration },
    Delete { queue_url: String },
}

/// Wraps an [`InMemoryQueue`] and records every call made to it.
#[derive(Clone, Default)]
pub struct RecordingClient {
    pub queue: InMemoryQueue,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    pub fn sends(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, Call::Send { .. }))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QueueClient for RecordingClient {
    fn send_message(&self, queue_url: &str, body: &str) -> Result<String, TransportError> {
        self.lock().push(Call::Send {
            queue_url: queue_url.to_string(),
        });
        self.queue.send_message(queue_url, body)
    }

    fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RawMessage>, TransportError> {
        self.lock().push(Call::Receive {
            queue_url: queue_url.to_string(),
            max_messages,
            wait,
        });
        self.queue.receive_messages(queue_url, max_messages, wait)
    }

    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: ReceiptHandle,
    ) -> Result<(), TransportError> {
        self.lock().push(Call::Delete {
            queue_url: queue_url.to_string(),
        });
        self.queue.delete_message(queue_url, receipt_handle)
    }
}

/// A transport that is always down.
pub struct DownClient;

impl QueueClient for DownClient {
    fn send_message(&self, _: &str, _: &str) -> Result<String, TransportError> {
        Err(TransportError::ConnectionFailed("connection refused".into()))
    }

    fn receive_messages(
        &self,
        _: &str,
        _: u32,
        _: Duration,
    ) -> Result<Vec<RawMessage>, TransportError> {
        Err(TransportError::Timeout)
    }

    fn delete_message(&self, _: &str, _: ReceiptHandle) -> Result<(), TransportError> {
        Err(TransportError::Unauthorized("expired credentials".into()))
    }
}

pub fn shared<C>(client: C) -> Arc<C> {
    Arc::new(client)
}
