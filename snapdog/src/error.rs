use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapDogError {
    #[error("State error: {0}")]
    State(#[from] snapdog_state::StateError),

    #[error("Store error: {0}")]
    Store(#[from] snapdog_state::StoreError),

    #[error("Notification queue error: {0}")]
    Queue(#[from] snapdog_notify::QueueError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("SnapDog must be started from within a tokio runtime")]
    NoRuntime,

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for SnapDog operations
pub type Result<T> = std::result::Result<T, SnapDogError>;
