//! Error types for the versioned store

/// Errors returned by [`VersionedStore`](crate::VersionedStore) updates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Every attempt lost the race against a concurrent writer
    #[error("State update abandoned after {attempts} conflicting attempts")]
    RetriesExhausted {
        /// Number of attempts made before giving up
        attempts: u32,
    },

    /// A retry budget of zero can never apply an update
    #[error("Retry budget must be greater than 0")]
    InvalidRetryBudget,

    /// The current snapshot already holds the highest representable version
    #[error("Version space exhausted at version {version}")]
    VersionOverflow {
        /// Version of the snapshot that could not be succeeded
        version: u64,
    },
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
