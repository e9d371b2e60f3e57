use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{EventPublisher, PublishStatus};
use crate::error::BridgeError;
use crate::event::{DomainEvent, EventKind, EventPayload};

type Handler<E> = Box<dyn Fn(&DomainEvent<E>) -> Result<(), BridgeError> + Send + Sync>;

/// Result of one dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub invoked: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Explicit subscription registry for one bounded context.
///
/// Handlers are invoked synchronously on the publishing thread, in the order
/// they were registered. A failing handler is logged and counted; it never
/// stops the handlers after it.
pub struct EventDispatcher<E> {
    handlers: HashMap<EventKind, Vec<Handler<E>>>,
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<E> fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}

impl<E: EventPayload> EventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: Fn(&DomainEvent<E>) -> Result<(), BridgeError> + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
        self
    }

    /// Register one handler for every event kind.
    pub fn subscribe_all<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&DomainEvent<E>) -> Result<(), BridgeError> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        for kind in EventKind::ALL {
            let handler = Arc::clone(&handler);
            self.subscribe(kind, move |event| (*handler)(event));
        }
        self
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn dispatch(&self, event: &DomainEvent<E>) -> DispatchReport {
        let Some(handlers) = self.handlers.get(&event.kind()).filter(|h| !h.is_empty()) else {
            debug!(event = %event.tag(), entity_id = %event.entity_id(), "no subscribers");
            return DispatchReport::default();
        };

        let mut report = DispatchReport::default();
        for (position, handler) in handlers.iter().enumerate() {
            report.invoked += 1;
            if let Err(err) = handler(event) {
                report.failed += 1;
                warn!(
                    event = %event.tag(),
                    entity_id = %event.entity_id(),
                    handler = position,
                    error = %err,
                    "event handler failed"
                );
            }
        }
        report
    }
}

impl<E: EventPayload> EventPublisher<E> for EventDispatcher<E> {
    fn publish(&self, event: &DomainEvent<E>) -> PublishStatus {
        let report = self.dispatch(event);
        debug!(
            event = %event.tag(),
            entity_id = %event.entity_id(),
            invoked = report.invoked,
            failed = report.failed,
            "event dispatched"
        );
        PublishStatus::Dispatched {
            handlers: report.invoked,
            failed: report.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::error::TransportError;
    use crate::event::ProductEvent;
    use std::io;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::<ProductEvent>::new();

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            dispatcher.subscribe(EventKind::Created, move |_| {
                calls.lock().unwrap().push(name);
                Ok(())
            });
        }

        let report = dispatcher.dispatch(&ProductEvent::created(Product::stub("p1")));

        assert_eq!(report, DispatchReport { invoked: 3, failed: 0 });
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_handler_does_not_stop_later_ones() {
        let reached = Arc::new(Mutex::new(false));
        let mut dispatcher = EventDispatcher::<ProductEvent>::new();

        dispatcher.subscribe(EventKind::Deleted, |_| Err(TransportError::Timeout.into()));
        {
            let reached = reached.clone();
            dispatcher.subscribe(EventKind::Deleted, move |_| {
                *reached.lock().unwrap() = true;
                Ok(())
            });
        }

        let status = dispatcher.publish(&ProductEvent::deleted("p1"));

        assert_eq!(status, PublishStatus::Dispatched { handlers: 2, failed: 1 });
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let mut dispatcher = EventDispatcher::<ProductEvent>::new();
        dispatcher.subscribe(EventKind::Updated, |_| Ok(()));

        let report = dispatcher.dispatch(&ProductEvent::created(Product::stub("p1")));

        assert_eq!(report.invoked, 0);
        assert_eq!(dispatcher.handler_count(EventKind::Updated), 1);
        assert_eq!(dispatcher.handler_count(EventKind::Created), 0);
    }

    #[test]
    fn subscribe_all_covers_every_kind() {
        let mut dispatcher = EventDispatcher::<ProductEvent>::new();
        dispatcher.subscribe_all(|_| Ok(()));

        for kind in EventKind::ALL {
            assert_eq!(dispatcher.handler_count(kind), 1);
        }
    }

    #[test]
    fn publish_logs_the_outcome() {
        let mut dispatcher = EventDispatcher::<ProductEvent>::new();
        dispatcher.subscribe(EventKind::Created, |_| Ok(()));

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            dispatcher.publish(&ProductEvent::created(Product::stub("p1")));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("event dispatched"), "{}", output);
        assert!(output.contains("invoked=1 failed=0"), "{}", output);
    }
}
