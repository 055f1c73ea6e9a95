//! Immutable versioned snapshots
//!
//! Every committed update produces a new `Versioned<T>` whose version is
//! exactly one higher than the snapshot it was derived from. Snapshots are
//! shared behind `Arc` and never mutated in place.

use std::ops::Deref;

/// An immutable, versioned point-in-time value
///
/// Dereferences to the wrapped value so callers can read fields directly:
///
/// ```rust
/// use state_store::VersionedStore;
///
/// let store = VersionedStore::new(vec![1, 2, 3]);
/// let snapshot = store.current();
///
/// assert_eq!(snapshot.version(), 0);
/// assert_eq!(snapshot.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    version: u64,
    value: T,
}

impl<T> Versioned<T> {
    /// Wrap a value at an explicit version
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    /// Monotonic version of this snapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Borrow the wrapped value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether a successor can still be derived from this snapshot
    pub fn has_successor(&self) -> bool {
        self.version < u64::MAX
    }

    /// Derive the successor snapshot (`version + 1`) holding `value`
    ///
    /// Returns `None` once the version space is exhausted.
    pub(crate) fn successor(&self, value: T) -> Option<Self> {
        let version = self.version.checked_add(1)?;
        Some(Self { version, value })
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_increments_version() {
        let snapshot = Versioned::new(7, "a");
        let next = snapshot.successor("b").unwrap();

        assert_eq!(next.version(), 8);
        assert_eq!(*next.value(), "b");
        // Original is untouched
        assert_eq!(snapshot.version(), 7);
        assert_eq!(*snapshot.value(), "a");
    }

    #[test]
    fn test_last_version_has_no_successor() {
        let snapshot = Versioned::new(u64::MAX, 1);

        assert!(!snapshot.has_successor());
        assert!(snapshot.successor(2).is_none());
        assert!(Versioned::new(u64::MAX - 1, 1).has_successor());
    }

    #[test]
    fn test_deref_reads_value() {
        let snapshot = Versioned::new(0, String::from("zone"));
        assert_eq!(snapshot.len(), 4);
    }
}
