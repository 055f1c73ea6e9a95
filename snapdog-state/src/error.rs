//! Error types for snapdog-state

use std::time::Duration;

use crate::model::{ClientIndex, ZoneIndex};

/// Result type for snapdog-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while reading or projecting state
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No zone with this index exists in the current snapshot
    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneIndex),

    /// No client with this index exists in the current snapshot
    #[error("Client not found: {0}")]
    ClientNotFound(ClientIndex),

    /// The debounce window cannot be represented as a time span
    #[error("Invalid debounce window: {0:?}")]
    InvalidDebounceWindow(Duration),

    /// A projection could not be turned into a payload
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
