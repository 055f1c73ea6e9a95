//! Background dispatcher draining the notification queue
//!
//! Exactly one dispatcher task runs per queue. It takes one notification at
//! a time, waits for the fan-out to finish with it and only then takes the
//! next, so calls for one notification never overlap calls for the next.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::fanout::PublisherFanOut;
use crate::queue::NotificationReceiver;

/// Spawns the background dispatcher task
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Spawn the dispatcher onto the current tokio runtime
    ///
    /// The task runs until `shutdown` is cancelled or every producer handle
    /// is dropped and the queue is empty. Cancellation is observed between
    /// notifications: a fan-out in progress always completes.
    pub fn spawn(
        receiver: NotificationReceiver,
        fan_out: Arc<PublisherFanOut>,
        shutdown: CancellationToken,
    ) -> DispatcherHandle {
        let task = tokio::spawn(run_dispatch_loop(receiver, fan_out, shutdown.clone()));
        DispatcherHandle { task, shutdown }
    }
}

async fn run_dispatch_loop(
    mut receiver: NotificationReceiver,
    fan_out: Arc<PublisherFanOut>,
    shutdown: CancellationToken,
) {
    let metrics = receiver.metrics();
    tracing::info!(publishers = ?fan_out.names(), "Notification dispatcher started");

    loop {
        let notification = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                tracing::info!("Notification dispatcher received shutdown signal");
                break;
            }

            next = receiver.dequeue() => match next {
                Some(notification) => notification,
                None => {
                    tracing::info!("Notification queue closed, dispatcher exiting");
                    break;
                }
            }
        };

        let result = AssertUnwindSafe(fan_out.dispatch(&notification))
            .catch_unwind()
            .await;

        match result {
            Ok(report) => {
                if !report.failed.is_empty() {
                    metrics.record_publish_failures(report.failed.len() as u64);
                }
                tracing::trace!(
                    entity = %notification.entity,
                    event_type = %notification.event_type,
                    delivered = report.delivered.len(),
                    failed = report.failed.len(),
                    "Notification dispatched"
                );
            }
            Err(_) => {
                metrics.record_publish_failures(1);
                tracing::error!(
                    entity = %notification.entity,
                    event_type = %notification.event_type,
                    "Fan-out panicked, continuing with next notification"
                );
            }
        }

        metrics.record_processed();
    }

    tracing::info!(stats = %metrics.snapshot(), "Notification dispatcher stopped");
}

/// Handle to the running dispatcher task
pub struct DispatcherHandle {
    task: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl DispatcherHandle {
    /// Stop pulling new notifications and wait for the task to exit
    ///
    /// Notifications still in the queue are not delivered.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("Notification dispatcher task failed: {}", e);
        }
    }

    /// Wait for the task to exit on its own (all producers dropped)
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Notification dispatcher task failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Token that stops the dispatcher when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}
