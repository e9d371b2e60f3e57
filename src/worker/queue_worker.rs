use std::marker::PhantomData;
use std::time::Duration;

use tracing::{debug, warn};

use super::MessageHandler;
use crate::bus::{Delivery, QueueClient, QueueConsumer};
use crate::config::ConsumerConfig;
use crate::message::WireMessage;

/// What one poll cycle did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleResult {
    pub received: usize,
    /// Handled and deleted
    pub processed: usize,
    /// Handler returned an error; left for redelivery
    pub failed: usize,
    /// Body did not decode; left for redelivery
    pub malformed: usize,
    /// Handled, but the delete was refused; will be redelivered
    pub delete_failed: usize,
}

/// Statistics accumulated by a spawned worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    pub polls: usize,
    pub processed: usize,
    pub failed: usize,
    pub malformed: usize,
    pub delete_failed: usize,
}

impl WorkerStats {
    pub fn record(&mut self, cycle: &CycleResult) {
        self.polls += 1;
        self.processed += cycle.processed;
        self.failed += cycle.failed;
        self.malformed += cycle.malformed;
        self.delete_failed += cycle.delete_failed;
    }
}

/// Drives the inbound path for one destination.
///
/// Each cycle is one long-poll. A message is deleted only after its handler
/// succeeded; everything else stays on the queue and comes back after the
/// visibility timeout. There is no retry or backoff of its own.
pub struct QueueWorker<C, T, H> {
    consumer: QueueConsumer<C>,
    destination: String,
    handler: H,
    max_messages: u32,
    wait_seconds: u64,
    idle_interval: Duration,
    worker_id: String,
    _message: PhantomData<fn() -> T>,
}

impl<C, T, H> QueueWorker<C, T, H>
where
    C: QueueClient,
    T: WireMessage,
    H: MessageHandler<T>,
{
    pub fn new(consumer: QueueConsumer<C>, destination: impl Into<String>, handler: H) -> Self {
        let defaults = ConsumerConfig::default();
        Self {
            consumer,
            destination: destination.into(),
            handler,
            max_messages: defaults.max_messages,
            wait_seconds: defaults.wait_seconds,
            idle_interval: Duration::from_millis(50),
            worker_id: "queue-worker".to_string(),
            _message: PhantomData,
        }
    }

    pub fn with_max_messages(mut self, max_messages: u32) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn with_wait_seconds(mut self, wait_seconds: u64) -> Self {
        self.wait_seconds = wait_seconds;
        self
    }

    /// Pause between cycles that received nothing. Only matters with a zero
    /// wait, where the transport returns immediately.
    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = worker_id.into();
        self
    }

    pub fn with_config(self, config: &ConsumerConfig) -> Self {
        self.with_max_messages(config.max_messages)
            .with_wait_seconds(config.wait_seconds)
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub(crate) fn wait_seconds(&self) -> u64 {
        self.wait_seconds
    }

    pub(crate) fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    /// Poll once and process everything received.
    pub fn run_once(&self) -> CycleResult {
        let deliveries =
            self.consumer
                .poll::<T>(&self.destination, self.max_messages, self.wait_seconds);

        let mut result = CycleResult {
            received: deliveries.len(),
            ..CycleResult::default()
        };
        for delivery in deliveries {
            self.process(delivery, &mut result);
        }

        if result.received > 0 {
            debug!(
                worker_id = %self.worker_id,
                destination = %self.destination,
                received = result.received,
                processed = result.processed,
                failed = result.failed,
                malformed = result.malformed,
                "cycle completed"
            );
        }
        result
    }

    fn process(&self, delivery: Delivery<T>, result: &mut CycleResult) {
        let Delivery { raw, message } = delivery;

        // Decode failures were already logged by the consumer.
        let Ok(message) = message else {
            result.malformed += 1;
            return;
        };

        if let Err(err) = self.handler.handle(&message) {
            warn!(
                worker_id = %self.worker_id,
                message_id = %message.message_id(),
                event_type = %message.event_type(),
                receive_count = raw.receive_count,
                error = %err,
                "handler failed, message left for redelivery"
            );
            result.failed += 1;
            return;
        }

        match self.consumer.delete(&self.destination, raw.receipt_handle) {
            Ok(()) => result.processed += 1,
            Err(_) => result.delete_failed += 1,
        }
    }
}
