//! Turns committed state into queued notifications
//!
//! For one entity the sequence read snapshot, project, decide, enqueue runs
//! under a per-entity async gate. Two commands touching the same zone
//! therefore enqueue in decision order, and the projection is always taken
//! from the latest snapshot inside the gate.

use std::sync::Arc;

use dashmap::DashMap;
use snapdog_notify::{event_types, Notification, NotificationQueue};
use snapdog_state::{
    ChangeDetector, ClientIndex, EntityRef, Project, Projection, StateError, StateStore,
    SystemState, ZoneIndex,
};
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::error::Result;

/// Publishes zone and client state through the change detector and queue
pub struct StateNotifier {
    store: StateStore,
    detector: ChangeDetector,
    queue: NotificationQueue,
    clock: Arc<dyn Clock>,
    gates: DashMap<EntityRef, Arc<Mutex<()>>>,
}

impl StateNotifier {
    pub fn new(
        store: StateStore,
        detector: ChangeDetector,
        queue: NotificationQueue,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            detector,
            queue,
            clock,
            gates: DashMap::new(),
        }
    }

    /// Publish the current state of a zone if it changed meaningfully
    ///
    /// Returns whether a notification was enqueued.
    pub async fn publish_zone(&self, zone: ZoneIndex) -> Result<bool> {
        self.publish_entity(EntityRef::Zone(zone), event_types::ZONE_STATE, |state| {
            state
                .zone(zone)
                .map(|z| z.project())
                .ok_or(StateError::ZoneNotFound(zone))
        })
        .await
    }

    /// Publish the current state of a client if it changed meaningfully
    ///
    /// Returns whether a notification was enqueued.
    pub async fn publish_client(&self, client: ClientIndex) -> Result<bool> {
        self.publish_entity(EntityRef::Client(client), event_types::CLIENT_STATE, |state| {
            state
                .client(client)
                .map(|c| c.project())
                .ok_or(StateError::ClientNotFound(client))
        })
        .await
    }

    /// Enqueue a system-wide notification; these are never deduplicated
    pub async fn publish_global(&self, event_type: &str, payload: serde_json::Value) -> Result<()> {
        self.queue.enqueue_global(event_type, payload).await?;
        Ok(())
    }

    /// The detector deciding which projections are published
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    async fn publish_entity<F>(&self, key: EntityRef, event_type: &str, project: F) -> Result<bool>
    where
        F: FnOnce(&SystemState) -> std::result::Result<Projection, StateError>,
    {
        let gate = self.gate(key);
        let _guard = gate.lock().await;

        let snapshot = self.store.current();
        let projection = project(snapshot.value())?;
        let payload = projection.to_payload()?;

        let decision = self
            .detector
            .check_and_record(key, &projection, self.clock.now());
        if !decision.should_publish() {
            tracing::debug!(entity = %key, ?decision, "Suppressed notification");
            return Ok(false);
        }

        self.queue
            .enqueue(Notification::new(event_type, key, payload))
            .await?;

        tracing::debug!(
            entity = %key,
            event_type,
            version = snapshot.version(),
            "Notification enqueued"
        );
        Ok(true)
    }

    fn gate(&self, key: EntityRef) -> Arc<Mutex<()>> {
        Arc::clone(self.gates.entry(key).or_default().value())
    }
}
