//! Per-entity change detection and debouncing
//!
//! The detector remembers the last projection published for every entity and
//! when it was published. A candidate is worth publishing when nothing was
//! published before, or when it differs from the cached projection and the
//! debounce window has elapsed since the last publish.
//!
//! The window is lossy: a change suppressed inside the window is not flushed
//! later. The next change after the window closes carries the latest state.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::error::{Result, StateError};
use crate::model::EntityRef;
use crate::projection::Projection;

/// Default minimum interval between two publishes of the same entity
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Outcome of a publish decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDecision {
    /// Nothing was published for this entity yet
    FirstPublish,
    /// The projection changed and the window has elapsed
    Changed,
    /// Identical to the last published projection
    Unchanged,
    /// Changed, but inside the debounce window
    Debounced,
}

impl PublishDecision {
    /// Whether the candidate should be published
    pub fn should_publish(self) -> bool {
        matches!(self, PublishDecision::FirstPublish | PublishDecision::Changed)
    }
}

#[derive(Debug, Clone)]
struct PublishedEntry {
    projection: Projection,
    published_at: DateTime<Utc>,
}

/// Decides which state transitions are worth publishing
#[derive(Debug)]
pub struct ChangeDetector {
    window: TimeDelta,
    cache: Mutex<HashMap<EntityRef, PublishedEntry>>,
}

impl ChangeDetector {
    /// Create a detector with the given debounce window
    ///
    /// Fails if the window is too large to be used in timestamp arithmetic.
    pub fn new(window: Duration) -> Result<Self> {
        let window =
            TimeDelta::from_std(window).map_err(|_| StateError::InvalidDebounceWindow(window))?;
        Ok(Self {
            window,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// The configured debounce window
    pub fn window(&self) -> Duration {
        // The window was built from a std Duration and is never negative.
        self.window.to_std().unwrap_or_default()
    }

    /// Decide whether `candidate` should be published at `now`
    ///
    /// Does not record anything; pair with [`record_published`](Self::record_published),
    /// or use [`check_and_record`](Self::check_and_record).
    pub fn should_publish(&self, key: EntityRef, candidate: &Projection, now: DateTime<Utc>) -> bool {
        let cache = self.cache.lock();
        self.decide(cache.get(&key), candidate, now).should_publish()
    }

    /// Remember `candidate` as the last projection published for `key`
    pub fn record_published(&self, key: EntityRef, candidate: Projection, now: DateTime<Utc>) {
        self.cache.lock().insert(
            key,
            PublishedEntry {
                projection: candidate,
                published_at: now,
            },
        );
    }

    /// Decide and, when the answer is to publish, record in one step
    pub fn check_and_record(
        &self,
        key: EntityRef,
        candidate: &Projection,
        now: DateTime<Utc>,
    ) -> PublishDecision {
        let mut cache = self.cache.lock();
        let decision = self.decide(cache.get(&key), candidate, now);

        if decision.should_publish() {
            cache.insert(
                key,
                PublishedEntry {
                    projection: candidate.clone(),
                    published_at: now,
                },
            );
        }

        tracing::debug!(entity = %key, ?decision, "Publish decision");
        decision
    }

    /// Number of entities with a cached publish
    pub fn tracked_entities(&self) -> usize {
        self.cache.lock().len()
    }

    /// Last projection published for `key`
    pub fn last_published(&self, key: EntityRef) -> Option<Projection> {
        self.cache.lock().get(&key).map(|entry| entry.projection.clone())
    }

    fn decide(
        &self,
        cached: Option<&PublishedEntry>,
        candidate: &Projection,
        now: DateTime<Utc>,
    ) -> PublishDecision {
        let Some(entry) = cached else {
            return PublishDecision::FirstPublish;
        };

        // Equality is checked before any timing: unchanged states are dropped.
        if entry.projection == *candidate {
            return PublishDecision::Unchanged;
        }

        if now - entry.published_at < self.window {
            PublishDecision::Debounced
        } else {
            PublishDecision::Changed
        }
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self {
            window: TimeDelta::milliseconds(DEFAULT_DEBOUNCE_WINDOW.as_millis() as i64),
            cache: Mutex::new(HashMap::new()),
        }
    }
}
