//! In-memory queue for testing and single-process scenarios.
//!
//! This module provides a thread-safe in-memory queue that implements
//! [`QueueClient`] with the delivery semantics of a hosted queue:
//! - Named queues, created on first use
//! - Long polling bounded by the requested wait
//! - A fresh receipt handle per delivery
//! - Visibility timeout: received messages are hidden until deleted or until
//!   the timeout expires, then redelivered
//! - Fault injection for exercising transport failures

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use uuid::Uuid;

use super::client::{QueueClient, RawMessage, ReceiptHandle, MAX_BATCH};
use crate::config::ConsumerConfig;
use crate::error::TransportError;
use crate::message::Envelope;

const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(2);

struct StoredMessage {
    message_id: String,
    body: String,
    receive_count: u32,
    invisible_until: Option<Instant>,
    receipt: Option<String>,
}

impl StoredMessage {
    fn is_visible(&self, now: Instant) -> bool {
        self.invisible_until.map_or(true, |until| until <= now)
    }
}

#[derive(Default)]
struct Faults {
    send: u32,
    receive: u32,
    delete: u32,
}

/// In-memory queue client.
///
/// Cloning yields another handle to the same queues, so a producer and any
/// number of consumers can share one instance across threads.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use event_bridge::{InMemoryQueue, QueueClient};
///
/// let queue = InMemoryQueue::new();
/// queue.send_message("orders", r#"{"eventType":"ORDER_PLACED"}"#).unwrap();
///
/// let mut batch = queue.receive_messages("orders", 10, Duration::ZERO).unwrap();
/// assert_eq!(batch.len(), 1);
///
/// let message = batch.remove(0);
/// queue.delete_message("orders", message.receipt_handle).unwrap();
/// assert!(queue.is_empty("orders"));
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    queues: Arc<Mutex<HashMap<String, Vec<StoredMessage>>>>,
    faults: Arc<Mutex<Faults>>,
    visibility_timeout: Duration,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    /// Create a new in-memory queue with a 30 second visibility timeout.
    pub fn new() -> Self {
        Self::with_visibility_timeout(DEFAULT_VISIBILITY_TIMEOUT)
    }

    pub fn with_visibility_timeout(visibility_timeout: Duration) -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
            visibility_timeout,
        }
    }

    /// Queue using the visibility timeout from `[consumer]`.
    pub fn from_config(config: &ConsumerConfig) -> Self {
        Self::with_visibility_timeout(config.visibility_timeout())
    }

    pub fn visibility_timeout(&self) -> Duration {
        self.visibility_timeout
    }

    /// Make the next `n` sends fail with a connection error.
    pub fn fail_next_sends(&self, n: u32) {
        self.faults().send = n;
    }

    /// Make the next `n` receives fail with a connection error.
    pub fn fail_next_receives(&self, n: u32) {
        self.faults().receive = n;
    }

    /// Make the next `n` deletes fail with a connection error.
    pub fn fail_next_deletes(&self, n: u32) {
        self.faults().delete = n;
    }

    /// Total messages in a queue, visible or in flight.
    pub fn len(&self, queue_url: &str) -> usize {
        self.queues().get(queue_url).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, queue_url: &str) -> bool {
        self.len(queue_url) == 0
    }

    /// Messages that a receive would hand out right now.
    pub fn visible_len(&self, queue_url: &str) -> usize {
        let now = Instant::now();
        self.queues()
            .get(queue_url)
            .map_or(0, |messages| messages.iter().filter(|m| m.is_visible(now)).count())
    }

    /// Messages received but neither deleted nor timed out.
    pub fn in_flight_len(&self, queue_url: &str) -> usize {
        self.len(queue_url).saturating_sub(self.visible_len(queue_url))
    }

    /// Bodies of every message in a queue, in send order.
    pub fn bodies(&self, queue_url: &str) -> Vec<String> {
        self.queues()
            .get(queue_url)
            .map(|messages| messages.iter().map(|m| m.body.clone()).collect())
            .unwrap_or_default()
    }

    /// `eventType` of every message in a queue, in send order.
    pub fn event_types(&self, queue_url: &str) -> Vec<String> {
        self.bodies(queue_url)
            .iter()
            .filter_map(|body| serde_json::from_str::<Envelope>(body).ok())
            .map(|envelope| envelope.event_type().to_string())
            .collect()
    }

    /// First message body whose `eventType` matches.
    pub fn find_by_event_type(&self, queue_url: &str, event_type: &str) -> Option<String> {
        self.bodies(queue_url).into_iter().find(|body| {
            serde_json::from_str::<Envelope>(body)
                .map(|envelope| envelope.event_type() == event_type)
                .unwrap_or(false)
        })
    }

    /// End the visibility timeout of every in-flight message in a queue, as if
    /// the timeout had elapsed.
    pub fn expire_visibility(&self, queue_url: &str) {
        if let Some(messages) = self.queues().get_mut(queue_url) {
            for message in messages.iter_mut() {
                message.invisible_until = None;
            }
        }
    }

    /// Drop every queue and pending fault (useful for test cleanup).
    pub fn clear(&self) {
        self.queues().clear();
        *self.faults() = Faults::default();
    }

    fn queues(&self) -> MutexGuard<'_, HashMap<String, Vec<StoredMessage>>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_fault(&self, select: impl Fn(&mut Faults) -> &mut u32) -> bool {
        let mut faults = self.faults();
        let remaining = select(&mut *faults);
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }

    fn receive_now(&self, queue_url: &str, max: usize) -> Vec<RawMessage> {
        let now = Instant::now();
        let mut queues = self.queues();
        let messages = queues.entry(queue_url.to_string()).or_default();

        let mut batch = Vec::new();
        for stored in messages.iter_mut().filter(|m| m.is_visible(now)).take(max) {
            stored.receive_count += 1;
            let token = receipt_token(&stored.message_id, stored.receive_count);
            stored.receipt = Some(token.clone());
            stored.invisible_until = Some(now + self.visibility_timeout);

            batch.push(RawMessage {
                message_id: stored.message_id.clone(),
                receipt_handle: ReceiptHandle::new(token),
                body: stored.body.clone(),
                receive_count: stored.receive_count,
            });
        }
        batch
    }
}

fn receipt_token(message_id: &str, receive_count: u32) -> String {
    let raw = format!("{}:{}:{}", message_id, receive_count, Uuid::new_v4());
    URL_SAFE_NO_PAD.encode(raw)
}

impl QueueClient for InMemoryQueue {
    fn send_message(&self, queue_url: &str, body: &str) -> Result<String, TransportError> {
        if self.take_fault(|f| &mut f.send) {
            return Err(TransportError::ConnectionFailed(format!(
                "injected send fault on {}",
                queue_url
            )));
        }

        let message_id = Uuid::new_v4().to_string();
        self.queues()
            .entry(queue_url.to_string())
            .or_default()
            .push(StoredMessage {
                message_id: message_id.clone(),
                body: body.to_string(),
                receive_count: 0,
                invisible_until: None,
                receipt: None,
            });
        Ok(message_id)
    }

    fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RawMessage>, TransportError> {
        if self.take_fault(|f| &mut f.receive) {
            return Err(TransportError::ConnectionFailed(format!(
                "injected receive fault on {}",
                queue_url
            )));
        }

        let max = max_messages.clamp(1, MAX_BATCH) as usize;
        let deadline = Instant::now() + wait;

        loop {
            let batch = self.receive_now(queue_url, max);
            if !batch.is_empty() {
                return Ok(batch);
            }

            if Instant::now() >= deadline {
                return Ok(Vec::new());
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: ReceiptHandle,
    ) -> Result<(), TransportError> {
        if self.take_fault(|f| &mut f.delete) {
            return Err(TransportError::ConnectionFailed(format!(
                "injected delete fault on {}",
                queue_url
            )));
        }

        let mut queues = self.queues();
        let messages = queues
            .get_mut(queue_url)
            .ok_or_else(|| TransportError::Rejected(format!("unknown queue {}", queue_url)))?;

        let position = messages
            .iter()
            .position(|m| m.receipt.as_deref() == Some(receipt_handle.as_str()))
            .ok_or(TransportError::InvalidReceipt)?;
        messages.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: &str = "https://queue.local/products";

    fn body(event_type: &str) -> String {
        format!(r#"{{"eventType":"{}"}}"#, event_type)
    }

    #[test]
    fn send_and_receive() {
        let queue = InMemoryQueue::new();
        let id = queue.send_message(Q, &body("PRODUCT_CREATED")).unwrap();

        let batch = queue.receive_messages(Q, 10, Duration::ZERO).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].message_id, id);
        assert_eq!(batch[0].receive_count, 1);
        assert_eq!(batch[0].body, body("PRODUCT_CREATED"));
    }

    #[test]
    fn receive_times_out_when_empty() {
        let queue = InMemoryQueue::new();
        let started = Instant::now();
        let batch = queue
            .receive_messages(Q, 10, Duration::from_millis(20))
            .unwrap();

        assert!(batch.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn received_messages_are_hidden_until_deleted() {
        let queue = InMemoryQueue::new();
        queue.send_message(Q, &body("A")).unwrap();

        let mut first = queue.receive_messages(Q, 10, Duration::ZERO).unwrap();
        assert!(queue.receive_messages(Q, 10, Duration::ZERO).unwrap().is_empty());
        assert_eq!(queue.in_flight_len(Q), 1);

        queue
            .delete_message(Q, first.remove(0).receipt_handle)
            .unwrap();
        assert!(queue.is_empty(Q));
    }

    #[test]
    fn visibility_timeout_redelivers_with_new_receipt() {
        let queue = InMemoryQueue::with_visibility_timeout(Duration::from_millis(10));
        queue.send_message(Q, &body("A")).unwrap();

        let mut first = queue.receive_messages(Q, 1, Duration::ZERO).unwrap();
        thread::sleep(Duration::from_millis(20));
        let mut second = queue.receive_messages(Q, 1, Duration::ZERO).unwrap();

        assert_eq!(second[0].receive_count, 2);
        assert_ne!(first[0].receipt_handle, second[0].receipt_handle);

        // The stale receipt no longer acknowledges anything
        let stale = queue.delete_message(Q, first.remove(0).receipt_handle);
        assert!(matches!(stale, Err(TransportError::InvalidReceipt)));
        assert_eq!(queue.len(Q), 1);

        queue
            .delete_message(Q, second.remove(0).receipt_handle)
            .unwrap();
        assert!(queue.is_empty(Q));
    }

    #[test]
    fn batch_size_is_bounded() {
        let queue = InMemoryQueue::new();
        for i in 0..15 {
            queue.send_message(Q, &body(&format!("E{}", i))).unwrap();
        }

        assert_eq!(queue.receive_messages(Q, 3, Duration::ZERO).unwrap().len(), 3);
        assert_eq!(queue.receive_messages(Q, 50, Duration::ZERO).unwrap().len(), 10);
        assert_eq!(queue.receive_messages(Q, 0, Duration::ZERO).unwrap().len(), 1);
    }

    #[test]
    fn injected_faults_fail_then_recover() {
        let queue = InMemoryQueue::new();
        queue.fail_next_sends(1);

        assert!(matches!(
            queue.send_message(Q, "{}"),
            Err(TransportError::ConnectionFailed(_))
        ));
        assert!(queue.send_message(Q, "{}").is_ok());

        queue.fail_next_receives(1);
        assert!(queue.receive_messages(Q, 1, Duration::ZERO).is_err());
        let mut batch = queue.receive_messages(Q, 1, Duration::ZERO).unwrap();

        queue.fail_next_deletes(1);
        let receipt = batch.remove(0).receipt_handle;
        assert!(queue.delete_message(Q, receipt).is_err());
        assert_eq!(queue.len(Q), 1);
    }

    #[test]
    fn queues_are_isolated() {
        let queue = InMemoryQueue::new();
        queue.send_message("a", &body("A")).unwrap();
        queue.send_message("b", &body("B")).unwrap();

        assert_eq!(queue.event_types("a"), vec!["A"]);
        assert_eq!(queue.event_types("b"), vec!["B"]);
        assert!(queue.find_by_event_type("a", "B").is_none());
    }

    #[test]
    fn expire_visibility_makes_messages_available() {
        let queue = InMemoryQueue::new();
        queue.send_message(Q, &body("A")).unwrap();
        queue.receive_messages(Q, 1, Duration::ZERO).unwrap();
        assert_eq!(queue.visible_len(Q), 0);

        queue.expire_visibility(Q);
        assert_eq!(queue.visible_len(Q), 1);
    }

    #[test]
    fn clones_share_state() {
        let queue = InMemoryQueue::new();
        let other = queue.clone();
        queue.send_message(Q, &body("A")).unwrap();
        assert_eq!(other.len(Q), 1);

        other.clear();
        assert!(queue.is_empty(Q));
    }
}
