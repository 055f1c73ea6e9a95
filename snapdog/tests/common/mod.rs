//! Shared test publishers and fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snapdog::{ManualClock, SnapDog, SnapDogConfig};
use snapdog_notify::{PublishError, StatusPublisher};
use snapdog_state::{ClientIndex, ClientState, EntityRef, SystemState, ZoneIndex, ZoneState};
use tokio::sync::Mutex;

/// One call received by a publisher
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub entity: EntityRef,
    pub event_type: String,
    pub payload: serde_json::Value,
}

/// Records every call it receives
pub struct RecordingPublisher {
    name: &'static str,
    calls: Mutex<Vec<Published>>,
}

impl RecordingPublisher {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> Vec<Published> {
        self.calls.lock().await.clone()
    }

    /// Volumes published for one zone, in order
    pub async fn zone_volumes(&self, zone: u32) -> Vec<u64> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| c.entity == EntityRef::Zone(ZoneIndex::new(zone)))
            .filter_map(|c| c.payload["volume"].as_u64())
            .collect()
    }

    async fn record(&self, entity: EntityRef, event_type: &str, payload: &serde_json::Value) {
        self.calls.lock().await.push(Published {
            entity,
            event_type: event_type.to_string(),
            payload: payload.clone(),
        });
    }
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn publish_zone_status(
        &self,
        zone: ZoneIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.record(EntityRef::Zone(zone), event_type, payload).await;
        Ok(())
    }

    async fn publish_client_status(
        &self,
        client: ClientIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.record(EntityRef::Client(client), event_type, payload).await;
        Ok(())
    }

    async fn publish_global_status(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.record(EntityRef::Global, event_type, payload).await;
        Ok(())
    }
}

/// Fails every call, optionally after a delay
pub struct FailingPublisher {
    delay: Duration,
}

impl FailingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::ZERO,
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay })
    }

    async fn fail(&self) -> Result<(), PublishError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Err(PublishError::Unavailable("broker offline".to_string()))
    }
}

#[async_trait]
impl StatusPublisher for FailingPublisher {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn publish_zone_status(
        &self,
        _zone: ZoneIndex,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.fail().await
    }

    async fn publish_client_status(
        &self,
        _client: ClientIndex,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.fail().await
    }

    async fn publish_global_status(
        &self,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.fail().await
    }
}

/// Three zones, four clients; clients 1 and 2 in zone 1, client 3 in zone 2
pub fn household() -> SystemState {
    SystemState::new()
        .with_zone(ZoneState::new(1, "Living Room"))
        .with_zone(ZoneState::new(2, "Kitchen"))
        .with_zone(ZoneState::new(3, "Office"))
        .with_client(ClientState::new(1, "Sofa Left", "02:42:ac:11:00:01").with_zone(1))
        .with_client(ClientState::new(2, "Sofa Right", "02:42:ac:11:00:02").with_zone(1))
        .with_client(ClientState::new(3, "Counter", "02:42:ac:11:00:03").with_zone(2))
        .with_client(ClientState::new(4, "Spare", "02:42:ac:11:00:04"))
}

pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Runtime with a manual clock and one recording publisher
pub fn start_recording(config: SnapDogConfig) -> (SnapDog, Arc<RecordingPublisher>, ManualClock) {
    let recorder = RecordingPublisher::new("recorder");
    let clock = ManualClock::new(epoch());
    let snapdog = SnapDog::builder(config)
        .with_publisher(recorder.clone())
        .with_clock(clock.clone())
        .with_initial_state(household())
        .start()
        .unwrap();
    (snapdog, recorder, clock)
}
