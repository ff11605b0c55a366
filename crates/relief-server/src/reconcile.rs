//! Result reconciliation
//!
//! A background loop drains the results queue and clears entries from the
//! pending registry. Completion messages are at-least-once: duplicates and
//! completions for ids this process never tracked (e.g. after a restart)
//! are logged and ignored. A malformed message is logged and dropped
//! without stopping the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use relief_core::Completion;
use relief_store::{QueueMessage, WorkQueue};

use crate::registry::PendingTaskRegistry;

/// Messages fetched per receive cycle
const BATCH_SIZE: usize = 10;

/// Drains the results queue and reconciles the pending registry.
pub struct ResultReconciler {
    result_queue: Arc<dyn WorkQueue>,
    registry: PendingTaskRegistry,
    wait: Duration,
}

impl ResultReconciler {
    pub fn new(
        result_queue: Arc<dyn WorkQueue>,
        registry: PendingTaskRegistry,
        wait: Duration,
    ) -> Self {
        Self {
            result_queue,
            registry,
            wait,
        }
    }

    /// Spawn the reconciliation loop on a background thread.
    ///
    /// The loop checks the stop flag between receive cycles, so shutdown
    /// completes the current batch and issues no further receive.
    pub fn spawn(self) -> ReconcilerHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = std::thread::spawn(move || {
            info!("result reconciler started");
            while !flag.load(Ordering::Relaxed) {
                self.poll_once();
            }
            info!("result reconciler stopped");
        });
        ReconcilerHandle {
            stop,
            thread: Some(thread),
        }
    }

    /// Run one receive cycle; returns the number of messages processed.
    ///
    /// Receive errors are logged and swallowed so the next cycle retries
    /// naturally.
    pub fn poll_once(&self) -> usize {
        let messages = match self.result_queue.receive(BATCH_SIZE, self.wait) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "failed to receive result messages");
                return 0;
            }
        };

        let count = messages.len();
        for message in messages {
            self.process(message);
        }
        count
    }

    fn process(&self, message: QueueMessage) {
        match Completion::from_json(&message.body) {
            Ok(completion) => self.reconcile(completion),
            Err(e) => {
                warn!(error = %e, body = %message.body, "dropping malformed result message");
            }
        }

        // Delete after processing: a crash above leaves the message for
        // redelivery rather than losing it.
        if let Err(e) = self.result_queue.delete(&message.ack_token) {
            warn!(error = %e, "failed to delete result message");
        }
    }

    fn reconcile(&self, completion: Completion) {
        match self
            .registry
            .clear_pending(completion.task_type, &completion.project_id)
        {
            Ok(true) => info!(
                project_id = %completion.project_id,
                task_type = %completion.task_type,
                "task completed"
            ),
            // Duplicate delivery, or in-flight state lost to a restart.
            // Idempotent either way.
            Ok(false) => debug!(
                project_id = %completion.project_id,
                task_type = %completion.task_type,
                "completion for unknown task, ignoring"
            ),
            Err(e) => warn!(
                project_id = %completion.project_id,
                error = %e,
                "failed to clear pending state"
            ),
        }
    }
}

/// Handle for stopping and joining the reconciliation thread.
pub struct ReconcilerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ReconcilerHandle {
    /// Signal the loop to exit after its current batch
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the loop and wait for the thread to finish
    pub fn shutdown(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("reconciler thread panicked");
            }
        }
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}
