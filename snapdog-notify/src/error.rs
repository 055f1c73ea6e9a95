use thiserror::Error;

/// Errors returned to producers by the notification queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The dispatcher is gone; the notification was not accepted
    #[error("Notification queue has been closed")]
    Closed,

    /// A queue that can hold nothing would block every producer forever
    #[error("Queue capacity must be greater than 0")]
    InvalidCapacity,
}

/// Errors a protocol publisher can report for one notification
#[derive(Error, Debug)]
pub enum PublishError {
    /// The downstream system is not reachable right now
    #[error("Publisher unavailable: {0}")]
    Unavailable(String),

    /// The transport failed while sending
    #[error("Transport error: {0}")]
    Transport(String),

    /// The downstream system refused the message
    #[error("Rejected by downstream: {0}")]
    Rejected(String),

    /// The publisher is shutting down; expected during teardown
    #[error("Publisher has been disposed")]
    Disposed,

    /// The payload could not be encoded or decoded
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
