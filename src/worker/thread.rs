//! Background thread running a [`QueueWorker`] until stopped.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info};

use super::{MessageHandler, QueueWorker, WorkerStats};
use crate::bus::QueueClient;
use crate::message::WireMessage;

/// Handle to a spawned worker.
///
/// The stop signal is checked between cycles, so stopping can take up to
/// one long-poll wait. Dropping the handle signals stop without joining.
pub struct WorkerHandle {
    worker_id: String,
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl<C, T, H> QueueWorker<C, T, H>
where
    C: QueueClient + 'static,
    T: WireMessage + 'static,
    H: MessageHandler<T> + 'static,
{
    /// Run cycles on a new thread until the handle is stopped or dropped.
    pub fn spawn(self) -> WorkerHandle {
        let (stop_tx, stop_rx) = channel();
        let worker_id = self.worker_id().to_string();

        let handle = thread::spawn(move || {
            let mut stats = WorkerStats::default();
            info!(
                worker_id = %self.worker_id(),
                destination = %self.destination(),
                "worker started"
            );

            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                let started = Instant::now();
                let cycle = self.run_once();
                stats.record(&cycle);

                // An empty poll that came back early (short poll, or a receive
                // that degraded on a transport error) backs off before retrying.
                let long_poll = Duration::from_secs(self.wait_seconds());
                let returned_early = self.wait_seconds() == 0 || started.elapsed() < long_poll;
                if cycle.received == 0 && returned_early {
                    match stop_rx.recv_timeout(self.idle_interval()) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }
                }
            }

            info!(
                worker_id = %self.worker_id(),
                polls = stats.polls,
                processed = stats.processed,
                failed = stats.failed,
                malformed = stats.malformed,
                delete_failed = stats.delete_failed,
                "worker stopped"
            );
            stats
        });

        WorkerHandle {
            worker_id,
            stop_tx,
            handle: Some(handle),
        }
    }
}

impl WorkerHandle {
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Signal the worker to stop and wait for it to finish.
    /// Returns the worker statistics, or empty statistics if the worker
    /// thread panicked.
    pub fn stop(mut self) -> WorkerStats {
        let _ = self.stop_tx.send(());
        let Some(handle) = self.handle.take() else {
            return WorkerStats::default();
        };
        match handle.join() {
            Ok(stats) => stats,
            Err(_) => {
                error!(worker_id = %self.worker_id, "worker thread panicked");
                WorkerStats::default()
            }
        }
    }

    /// Signal the worker to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
