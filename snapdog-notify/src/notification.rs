//! The item carried by the notification queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapdog_state::EntityRef;

/// A state transition waiting to be told to the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable name of the kind of event, see [`crate::event_types`]
    pub event_type: String,
    /// The entity this notification is about
    pub entity: EntityRef,
    /// JSON body handed to every publisher
    pub payload: serde_json::Value,
    /// When the producer handed the notification to the queue
    pub enqueued_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        event_type: impl Into<String>,
        entity: EntityRef,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            entity,
            payload,
            enqueued_at: Utc::now(),
        }
    }

    /// Time spent between enqueue and `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::TimeDelta {
        now - self.enqueued_at
    }
}
