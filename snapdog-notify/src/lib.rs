//! # SnapDog Notify
//!
//! Asynchronous delivery of state notifications to external protocols.
//!
//! ## Overview
//!
//! Command handlers must never wait on a slow broker, and one dead downstream
//! must never cost a healthy one its updates. This crate decouples the two
//! sides with a bounded queue and a single background dispatcher:
//!
//! ```text
//! handlers ──enqueue──► NotificationQueue ──► NotificationDispatcher ──► PublisherFanOut
//!                        (bounded FIFO)        (one task)                 ├─► MQTT
//!                                                                         └─► KNX
//! ```
//!
//! ## Key Features
//!
//! - **Backpressure**: producers wait when the queue is full; nothing is dropped
//! - **Ordering**: one FIFO, one consumer, so per-entity order is preserved
//! - **Isolation**: every publisher call is isolated from errors and panics in the others
//! - **Metrics**: lock-free counters with consistent snapshots for health reporting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snapdog_notify::prelude::*;
//!
//! let (queue, receiver) = notification_queue(DEFAULT_QUEUE_CAPACITY)?;
//! let fan_out = PublisherFanOut::new()
//!     .with_publisher(Arc::new(MqttStatusPublisher::new(mqtt_client, "snapdog")))
//!     .with_optional_publisher(knx);
//! let dispatcher = NotificationDispatcher::spawn(receiver, Arc::new(fan_out), CancellationToken::new());
//!
//! queue.enqueue_zone(ZoneIndex::new(1), event_types::ZONE_STATE, payload).await?;
//!
//! dispatcher.shutdown().await;
//! ```

pub mod dispatcher;
pub mod error;
pub mod event_types;
pub mod fanout;
pub mod notification;
pub mod publishers;
pub mod queue;

// Re-export main types for convenience
pub use dispatcher::{DispatcherHandle, NotificationDispatcher};
pub use error::{PublishError, QueueError, Result};
pub use fanout::{DispatchReport, PublisherFanOut, StatusPublisher};
pub use notification::Notification;
pub use queue::{
    notification_queue, NotificationQueue, NotificationReceiver, QueueMetrics, QueueStats,
    DEFAULT_QUEUE_CAPACITY,
};

// Re-export commonly used types from dependencies
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
///
/// ```rust
/// use snapdog_notify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::event_types;
    pub use crate::publishers::{KnxStatusPublisher, MqttStatusPublisher};
    pub use crate::{
        notification_queue, CancellationToken, NotificationDispatcher, NotificationQueue,
        PublishError, PublisherFanOut, QueueError, QueueStats, StatusPublisher,
        DEFAULT_QUEUE_CAPACITY,
    };
}
