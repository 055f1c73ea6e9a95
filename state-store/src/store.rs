//! Versioned snapshot storage with optimistic concurrency
//!
//! This module provides the core storage primitive for state management:
//! - `VersionedStore<T>`: a single atomically-swappable `Versioned<T>` snapshot
//! - `TryUpdate<T>`: the outcome of a single compare-and-swap attempt
//! - `Commit<T>`: a retried update together with the base it was applied to

use std::fmt;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::error::{Result, StoreError};
use crate::versioned::Versioned;

/// Default number of attempts used by [`VersionedStore::update`]
pub const DEFAULT_MAX_RETRIES: u32 = 16;

// ============================================================================
// TryUpdate - outcome of a single optimistic attempt
// ============================================================================

/// Outcome of a single optimistic update attempt
#[derive(Debug, Clone)]
pub enum TryUpdate<T> {
    /// The candidate was installed and is now the current snapshot
    Committed(Arc<Versioned<T>>),

    /// Another writer committed first; nothing was applied
    Conflict {
        /// The snapshot that won the race
        current: Arc<Versioned<T>>,
    },

    /// The base already holds `u64::MAX`; nothing was applied
    VersionExhausted {
        /// The snapshot that cannot be succeeded
        current: Arc<Versioned<T>>,
    },
}

impl<T> TryUpdate<T> {
    /// Whether the update was applied
    pub fn is_committed(&self) -> bool {
        matches!(self, TryUpdate::Committed(_))
    }

    /// The snapshot that is current after this attempt
    pub fn snapshot(&self) -> &Arc<Versioned<T>> {
        match self {
            TryUpdate::Committed(snapshot) => snapshot,
            TryUpdate::Conflict { current } | TryUpdate::VersionExhausted { current } => current,
        }
    }

    /// Consume the outcome, returning the snapshot current after this attempt
    pub fn into_snapshot(self) -> Arc<Versioned<T>> {
        match self {
            TryUpdate::Committed(snapshot) => snapshot,
            TryUpdate::Conflict { current } | TryUpdate::VersionExhausted { current } => current,
        }
    }
}

/// A committed update together with the snapshot it was computed from
///
/// Under contention the winning attempt may have been computed from a newer
/// snapshot than the one the caller saw before updating. `base` is that
/// winning input, so `base -> snapshot` is exactly the change this update made.
#[derive(Debug, Clone)]
pub struct Commit<T> {
    /// The snapshot the committed transform was applied to
    pub base: Arc<Versioned<T>>,
    /// The newly installed snapshot (`base.version() + 1`)
    pub snapshot: Arc<Versioned<T>>,
}

// ============================================================================
// VersionedStore<T> - lock-free snapshot container
// ============================================================================

/// Store holding one immutable, versioned snapshot
///
/// Reads never block: `current()` returns the latest committed snapshot.
/// Writes compute a candidate from a snapshot they read earlier and install
/// it only if no other writer committed in between. No lock is held while
/// the transform runs; only the final swap is atomic.
///
/// Cloning a store yields another handle to the same snapshot.
///
/// # Example
///
/// ```rust
/// use state_store::VersionedStore;
///
/// let store = VersionedStore::new(0u32);
///
/// let snapshot = store.update_with_retry(|count| count + 1, 8).unwrap();
/// assert_eq!(snapshot.version(), 1);
/// assert_eq!(**snapshot, 1);
///
/// // A stale base loses the race
/// let stale = store.current();
/// store.update_with_retry(|count| count + 1, 8).unwrap();
/// assert!(!store.try_update_from(&stale, |count| count + 10).is_committed());
/// assert_eq!(**store.current(), 2);
/// ```
pub struct VersionedStore<T> {
    current: Arc<ArcSwap<Versioned<T>>>,
}

impl<T> VersionedStore<T> {
    /// Create a store whose first snapshot is `initial` at version 0
    pub fn new(initial: T) -> Self {
        Self::with_version(initial, 0)
    }

    /// Create a store starting from an explicit version
    pub fn with_version(initial: T, version: u64) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(Versioned::new(version, initial))),
        }
    }

    /// Latest committed snapshot
    pub fn current(&self) -> Arc<Versioned<T>> {
        self.current.load_full()
    }

    /// Version of the latest committed snapshot
    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    /// Attempt one update against the latest snapshot
    ///
    /// Fails with [`TryUpdate::Conflict`] if another writer commits while
    /// `transform` is running.
    pub fn try_update<F>(&self, transform: F) -> TryUpdate<T>
    where
        F: FnOnce(&T) -> T,
    {
        let expected = self.current();
        self.try_update_from(&expected, transform)
    }

    /// Attempt one update against a snapshot the caller read earlier
    ///
    /// The candidate `transform(expected)` is installed only if `expected` is
    /// still the current snapshot.
    pub fn try_update_from<F>(&self, expected: &Arc<Versioned<T>>, transform: F) -> TryUpdate<T>
    where
        F: FnOnce(&T) -> T,
    {
        let Some(successor) = expected.successor(transform(expected.value())) else {
            return TryUpdate::VersionExhausted {
                current: Arc::clone(expected),
            };
        };
        let candidate = Arc::new(successor);

        // `expected` stays alive for the duration of the swap, so its address
        // cannot be recycled by a concurrent commit.
        let previous = self.current.compare_and_swap(expected, Arc::clone(&candidate));

        if Arc::ptr_eq(&previous, expected) {
            TryUpdate::Committed(candidate)
        } else {
            TryUpdate::Conflict {
                current: Guard::into_inner(previous),
            }
        }
    }

    /// Apply `transform` until it commits or `max_retries` attempts are spent
    ///
    /// Each attempt re-reads the latest snapshot and re-applies `transform`,
    /// so the transform must be a pure function of its input. Exhausting the
    /// budget means the caller's mutation could not be applied and is
    /// reported as [`StoreError::RetriesExhausted`].
    pub fn update_with_retry<F>(&self, transform: F, max_retries: u32) -> Result<Arc<Versioned<T>>>
    where
        F: Fn(&T) -> T,
    {
        self.commit_with_retry(transform, max_retries)
            .map(|commit| commit.snapshot)
    }

    /// Like [`update_with_retry`](Self::update_with_retry), also returning
    /// the base the winning attempt was computed from
    pub fn commit_with_retry<F>(&self, transform: F, max_retries: u32) -> Result<Commit<T>>
    where
        F: Fn(&T) -> T,
    {
        if max_retries == 0 {
            return Err(StoreError::InvalidRetryBudget);
        }

        let mut expected = self.current();
        for attempt in 1..=max_retries {
            match self.try_update_from(&expected, &transform) {
                TryUpdate::Committed(snapshot) => {
                    return Ok(Commit {
                        base: expected,
                        snapshot,
                    })
                }
                TryUpdate::Conflict { current } => {
                    tracing::trace!(
                        attempt,
                        stale_version = expected.version(),
                        current_version = current.version(),
                        "State update conflicted, retrying"
                    );
                    expected = current;
                }
                TryUpdate::VersionExhausted { current } => {
                    tracing::error!(version = current.version(), "State version space exhausted");
                    return Err(StoreError::VersionOverflow {
                        version: current.version(),
                    });
                }
            }
        }

        tracing::error!(
            attempts = max_retries,
            version = expected.version(),
            "State update abandoned: every attempt conflicted with a concurrent writer"
        );
        Err(StoreError::RetriesExhausted {
            attempts: max_retries,
        })
    }

    /// Apply `transform` with the [`DEFAULT_MAX_RETRIES`] budget
    pub fn update<F>(&self, transform: F) -> Result<Arc<Versioned<T>>>
    where
        F: Fn(&T) -> T,
    {
        self.update_with_retry(transform, DEFAULT_MAX_RETRIES)
    }
}

impl<T: Default> Default for VersionedStore<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for VersionedStore<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<T> fmt::Debug for VersionedStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedStore")
            .field("version", &self.version())
            .finish()
    }
}
