//! KNX status publisher
//!
//! KNX carries individual status values on group addresses, so a zone or
//! client status notification is split into one `send_status` call per field.
//! The mapping from [`StatusId`] and target index to a group address belongs
//! to the bus implementation.

use async_trait::async_trait;
use snapdog_state::{
    ClientIndex, PlaybackState, PublishableClientState, PublishableZoneState, ZoneIndex,
};

#[cfg(test)]
use mockall::automock;

use crate::error::PublishError;
use crate::event_types::{CLIENT_STATE, ZONE_STATE};
use crate::fanout::StatusPublisher;

/// Stable identifiers of the status values SnapDog exposes on KNX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusId {
    ZoneVolume,
    ZoneMute,
    ZonePlayback,
    ZoneTrackIndex,
    ZoneRepeatTrack,
    ZoneRepeatPlaylist,
    ZoneShuffle,
    ClientVolume,
    ClientMute,
    ClientConnected,
    ClientLatency,
    ClientZone,
}

/// A value as sent on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnxValue {
    /// 1-bit switch
    Bool(bool),
    /// 0-100 scaled value
    Percent(u8),
    /// Unsigned counter or enumeration
    Unsigned(u32),
}

/// The bus connection the publisher writes to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnxBus: Send + Sync {
    async fn send_status(&self, status: StatusId, target: u32, value: KnxValue)
        -> Result<(), PublishError>;
}

/// Bus encoding of a playback state: 0 stopped, 1 playing, 2 paused
fn playback_code(playback: PlaybackState) -> u32 {
    match playback {
        PlaybackState::Stopped => 0,
        PlaybackState::Playing => 1,
        PlaybackState::Paused => 2,
    }
}

/// Status values sent for a zone
pub fn zone_values(zone: &PublishableZoneState) -> Vec<(StatusId, KnxValue)> {
    let track_index = zone.track.as_ref().and_then(|t| t.index).unwrap_or(0);
    vec![
        (StatusId::ZoneVolume, KnxValue::Percent(zone.volume)),
        (StatusId::ZoneMute, KnxValue::Bool(zone.mute)),
        (
            StatusId::ZonePlayback,
            KnxValue::Unsigned(playback_code(zone.playback)),
        ),
        (StatusId::ZoneTrackIndex, KnxValue::Unsigned(track_index)),
        (StatusId::ZoneRepeatTrack, KnxValue::Bool(zone.repeat_track)),
        (
            StatusId::ZoneRepeatPlaylist,
            KnxValue::Bool(zone.repeat_playlist),
        ),
        (StatusId::ZoneShuffle, KnxValue::Bool(zone.shuffle)),
    ]
}

/// Status values sent for a client; an unassigned client reports zone 0
pub fn client_values(client: &PublishableClientState) -> Vec<(StatusId, KnxValue)> {
    vec![
        (StatusId::ClientVolume, KnxValue::Percent(client.volume)),
        (StatusId::ClientMute, KnxValue::Bool(client.mute)),
        (StatusId::ClientConnected, KnxValue::Bool(client.connected)),
        (StatusId::ClientLatency, KnxValue::Unsigned(client.latency_ms)),
        (
            StatusId::ClientZone,
            KnxValue::Unsigned(client.zone.map(ZoneIndex::get).unwrap_or(0)),
        ),
    ]
}

/// Publishes zone and client status values to a KNX bus
pub struct KnxStatusPublisher<B> {
    bus: B,
}

impl<B: KnxBus> KnxStatusPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Send every value, reporting the first failure after all were tried
    async fn send_all(
        &self,
        target: u32,
        values: Vec<(StatusId, KnxValue)>,
    ) -> Result<(), PublishError> {
        let mut first_error = None;
        for (status, value) in values {
            if let Err(e) = self.bus.send_status(status, target, value).await {
                tracing::debug!(?status, target, error = %e, "KNX status write failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<B: KnxBus> StatusPublisher for KnxStatusPublisher<B> {
    fn name(&self) -> &'static str {
        "knx"
    }

    async fn publish_zone_status(
        &self,
        zone: ZoneIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        if event_type != ZONE_STATE {
            tracing::trace!(event_type, "No KNX mapping for zone event");
            return Ok(());
        }

        let state: PublishableZoneState = serde_json::from_value(payload.clone())?;
        self.send_all(zone.get(), zone_values(&state)).await
    }

    async fn publish_client_status(
        &self,
        client: ClientIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        if event_type != CLIENT_STATE {
            tracing::trace!(event_type, "No KNX mapping for client event");
            return Ok(());
        }

        let state: PublishableClientState = serde_json::from_value(payload.clone())?;
        self.send_all(client.get(), client_values(&state)).await
    }

    async fn publish_global_status(
        &self,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        // KNX carries zone and client status only
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use snapdog_state::{ClientState, Project, Projection, ZoneState};

    fn zone_payload() -> serde_json::Value {
        let mut zone = ZoneState::new(4, "Dining");
        zone.set_volume(35);
        zone.playback = PlaybackState::Paused;
        zone.shuffle = true;
        zone.project().to_payload().unwrap()
    }

    #[test]
    fn test_zone_values() {
        let Projection::Zone(zone) = ZoneState::new(1, "Hall").project() else {
            unreachable!()
        };
        let values = zone_values(&zone);

        assert_eq!(values.len(), 7);
        assert_eq!(values[0], (StatusId::ZoneVolume, KnxValue::Percent(50)));
        assert_eq!(values[2], (StatusId::ZonePlayback, KnxValue::Unsigned(0)));
        assert_eq!(values[3], (StatusId::ZoneTrackIndex, KnxValue::Unsigned(0)));
    }

    #[tokio::test]
    async fn test_zone_status_sends_every_field() {
        let mut bus = MockKnxBus::new();
        bus.expect_send_status()
            .with(eq(StatusId::ZoneVolume), eq(4), eq(KnxValue::Percent(35)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        bus.expect_send_status()
            .with(eq(StatusId::ZonePlayback), eq(4), eq(KnxValue::Unsigned(2)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        bus.expect_send_status()
            .with(always(), eq(4), always())
            .times(5)
            .returning(|_, _, _| Ok(()));

        let publisher = KnxStatusPublisher::new(bus);
        publisher
            .publish_zone_status(ZoneIndex::new(4), ZONE_STATE, &zone_payload())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_client_status_maps_zone_assignment() {
        let mut bus = MockKnxBus::new();
        bus.expect_send_status()
            .with(eq(StatusId::ClientZone), eq(2), eq(KnxValue::Unsigned(4)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        bus.expect_send_status()
            .with(always(), eq(2), always())
            .times(4)
            .returning(|_, _, _| Ok(()));

        let payload = ClientState::new(2, "Bar", "02:00:00:00:00:02")
            .with_zone(4)
            .project()
            .to_payload()
            .unwrap();

        let publisher = KnxStatusPublisher::new(bus);
        publisher
            .publish_client_status(ClientIndex::new(2), CLIENT_STATE, &payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_global_and_unknown_events_are_ignored() {
        let publisher = KnxStatusPublisher::new(MockKnxBus::new());

        publisher
            .publish_global_status("SYSTEM_STATUS", &serde_json::json!({}))
            .await
            .unwrap();
        publisher
            .publish_zone_status(ZoneIndex::new(1), "ZONE_PROGRESS", &serde_json::json!({}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bus_failure_is_reported_after_all_writes() {
        let mut bus = MockKnxBus::new();
        bus.expect_send_status()
            .with(eq(StatusId::ZoneMute), always(), always())
            .times(1)
            .returning(|_, _, _| Err(PublishError::Unavailable("bus down".into())));
        bus.expect_send_status()
            .times(6)
            .returning(|_, _, _| Ok(()));

        let publisher = KnxStatusPublisher::new(bus);
        let result = publisher
            .publish_zone_status(ZoneIndex::new(4), ZONE_STATE, &zone_payload())
            .await;

        assert!(matches!(result, Err(PublishError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_serialization_error() {
        let publisher = KnxStatusPublisher::new(MockKnxBus::new());
        let result = publisher
            .publish_zone_status(ZoneIndex::new(1), ZONE_STATE, &serde_json::json!({"volume": "loud"}))
            .await;

        assert!(matches!(result, Err(PublishError::Serialization(_))));
    }
}
