//! Generic Versioned State Library
//!
//! A small, dependency-light container for an immutable snapshot that is
//! replaced atomically, with optimistic-concurrency updates.
//!
//! # Features
//!
//! - **Immutable Snapshots**: Every change produces a new `Versioned<T>`
//! - **Monotonic Versions**: Each commit is exactly `previous + 1`
//! - **Lock-free Reads**: `current()` never blocks writers or readers
//! - **Optimistic Writes**: Compare-and-swap with bounded retry
//!
//! # Quick Start
//!
//! ```rust
//! use state_store::{TryUpdate, VersionedStore};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Speakers {
//!     volume: u8,
//! }
//!
//! let store = VersionedStore::new(Speakers::default());
//!
//! // Single attempt - may lose a race against another writer
//! match store.try_update(|s| Speakers { volume: s.volume + 5 }) {
//!     TryUpdate::Committed(snapshot) => assert_eq!(snapshot.version(), 1),
//!     TryUpdate::Conflict { .. } | TryUpdate::VersionExhausted { .. } => {
//!         unreachable!("no concurrent writers here")
//!     }
//! }
//!
//! // Retrying update - re-reads and re-applies until it commits
//! let snapshot = store.update_with_retry(|s| Speakers { volume: s.volume + 5 }, 8).unwrap();
//! assert_eq!(snapshot.volume, 10);
//! assert_eq!(snapshot.version(), 2);
//! ```
//!
//! # Architecture
//!
//! ```text
//! VersionedStore<T>
//!     │
//!     └── current: ArcSwap<Versioned<T>>
//!             │
//!             ├── version: u64
//!             └── value: T          (never mutated in place)
//! ```

// Modules
pub mod error;
pub mod store;
pub mod versioned;

// Re-exports - Public API
pub use error::{Result, StoreError};
pub use store::{Commit, TryUpdate, VersionedStore, DEFAULT_MAX_RETRIES};
pub use versioned::Versioned;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::store::{Commit, TryUpdate, VersionedStore};
    pub use crate::versioned::Versioned;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Volumes(BTreeMap<u32, u8>);

    #[test]
    fn test_full_workflow() {
        let store = VersionedStore::new(Volumes::default());

        let snapshot = store
            .update_with_retry(
                |v| {
                    let mut next = v.clone();
                    next.0.insert(1, 50);
                    next
                },
                DEFAULT_MAX_RETRIES,
            )
            .unwrap();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.0.get(&1), Some(&50));

        let snapshot = store
            .update(|v| {
                let mut next = v.clone();
                next.0.insert(2, 75);
                next
            })
            .unwrap();
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.0.len(), 2);
    }

    #[test]
    fn test_store_clone_shares_state() {
        let store1 = VersionedStore::new(Volumes::default());
        let store2 = store1.clone();

        store1
            .update(|v| {
                let mut next = v.clone();
                next.0.insert(7, 20);
                next
            })
            .unwrap();

        assert_eq!(store2.current().0.get(&7), Some(&20));
    }
}
