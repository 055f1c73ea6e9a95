//! Bounded notification queue with lock-free metrics
//!
//! Producers (command handlers) hand notifications to a [`NotificationQueue`];
//! the single [`NotificationReceiver`] is owned by the background dispatcher.
//! The queue is one FIFO channel, so notifications about the same entity
//! leave in the order they were accepted.
//!
//! When the queue is full, producers wait for capacity. A closed queue is
//! reported to the producer as [`QueueError::Closed`], never dropped silently.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use snapdog_state::{ClientIndex, EntityRef, ZoneIndex};
use tokio::sync::mpsc;

use crate::error::{QueueError, Result};
use crate::notification::Notification;

/// Default number of notifications the queue holds before producers wait
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Create a bounded queue and its single receiving end
pub fn notification_queue(capacity: usize) -> Result<(NotificationQueue, NotificationReceiver)> {
    if capacity == 0 {
        return Err(QueueError::InvalidCapacity);
    }

    let (sender, receiver) = mpsc::channel(capacity);
    let metrics = Arc::new(QueueMetrics::new());

    Ok((
        NotificationQueue {
            sender,
            metrics: Arc::clone(&metrics),
        },
        NotificationReceiver { receiver, metrics },
    ))
}

// ============================================================================
// Producer side
// ============================================================================

/// Producer handle; cheap to clone and share between handlers
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<Notification>,
    metrics: Arc<QueueMetrics>,
}

impl NotificationQueue {
    /// Accept a notification, waiting for capacity if the queue is full
    pub async fn enqueue(&self, notification: Notification) -> Result<()> {
        let permit = self.sender.reserve().await.map_err(|_| {
            tracing::warn!(
                event_type = %notification.event_type,
                entity = %notification.entity,
                "Notification rejected: queue closed"
            );
            QueueError::Closed
        })?;

        // Counted before the send so the consumer can never observe more
        // dequeued than enqueued.
        self.metrics.record_enqueued();
        permit.send(notification);
        Ok(())
    }

    /// Enqueue a notification about a zone
    pub async fn enqueue_zone(
        &self,
        zone: ZoneIndex,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        self.enqueue(Notification::new(event_type, EntityRef::Zone(zone), payload))
            .await
    }

    /// Enqueue a notification about a client
    pub async fn enqueue_client(
        &self,
        client: ClientIndex,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        self.enqueue(Notification::new(event_type, EntityRef::Client(client), payload))
            .await
    }

    /// Enqueue a system-wide notification
    pub async fn enqueue_global(&self, event_type: &str, payload: serde_json::Value) -> Result<()> {
        self.enqueue(Notification::new(event_type, EntityRef::Global, payload))
            .await
    }

    /// Shared metrics for this queue
    pub fn metrics(&self) -> Arc<QueueMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Maximum number of notifications buffered at once
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Whether the receiving end has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("capacity", &self.capacity())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Consumer side
// ============================================================================

/// The single consuming end of the queue
pub struct NotificationReceiver {
    receiver: mpsc::Receiver<Notification>,
    metrics: Arc<QueueMetrics>,
}

impl NotificationReceiver {
    /// Wait for the next notification
    ///
    /// Returns `None` once every producer is dropped and the queue is empty.
    /// Cancel-safe: a notification is only counted once it is returned.
    pub async fn dequeue(&mut self) -> Option<Notification> {
        let notification = self.receiver.recv().await?;
        self.metrics.record_dequeued();
        Some(notification)
    }

    /// Shared metrics for this queue
    pub fn metrics(&self) -> Arc<QueueMetrics> {
        Arc::clone(&self.metrics)
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Lock-free queue counters
///
/// Counters only grow. Every notification passes enqueued, then dequeued,
/// then processed, so `enqueued >= dequeued >= processed` at all times.
#[derive(Debug, Default)]
pub struct QueueMetrics {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    processed: AtomicU64,
    publish_failures: AtomicU64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_publish_failures(&self, count: u64) {
        self.publish_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn enqueued_total(&self) -> u64 {
        self.enqueued.load(Ordering::SeqCst)
    }

    pub fn dequeued_total(&self) -> u64 {
        self.dequeued.load(Ordering::SeqCst)
    }

    pub fn processed_total(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    /// Failed publisher calls across all notifications
    pub fn publish_failures_total(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }

    /// Notifications accepted but not yet taken by the dispatcher
    pub fn depth(&self) -> u64 {
        self.snapshot().depth
    }

    /// Consistent point-in-time view of all counters
    pub fn snapshot(&self) -> QueueStats {
        // Read against the pipeline direction: anything already counted
        // downstream is guaranteed to be counted upstream by the later reads.
        let processed = self.processed.load(Ordering::SeqCst);
        let dequeued = self.dequeued.load(Ordering::SeqCst);
        let enqueued = self.enqueued.load(Ordering::SeqCst);

        QueueStats {
            enqueued,
            dequeued,
            processed,
            depth: enqueued.saturating_sub(dequeued),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
        }
    }

    /// Whether every accepted notification has been fully processed
    pub fn is_drained(&self) -> bool {
        let stats = self.snapshot();
        stats.enqueued == stats.processed
    }

    /// Wait until the queue is drained or `timeout` elapses
    ///
    /// Returns whether the queue was drained in time.
    pub async fn wait_until_drained(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_drained() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}

/// Point-in-time copy of [`QueueMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub dequeued: u64,
    pub processed: u64,
    pub depth: u64,
    pub publish_failures: u64,
}

impl QueueStats {
    /// Notifications taken by the dispatcher but not yet fully published
    pub fn in_flight(&self) -> u64 {
        self.dequeued.saturating_sub(self.processed)
    }
}

impl fmt::Display for QueueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enqueued={} dequeued={} processed={} depth={} publish_failures={}",
            self.enqueued, self.dequeued, self.processed, self.depth, self.publish_failures
        )
    }
}
