//! Publishable projections of zone and client state
//!
//! A projection is the reduced view of an entity that external systems are
//! told about. Structural equality between two projections is what counts as
//! "nothing changed": fields that move constantly without meaning anything to
//! subscribers (track progress) are left out.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    ClientIndex, ClientState, EntityRef, PlaybackState, PlaylistInfo, TrackInfo, ZoneIndex,
    ZoneState,
};

/// Track descriptor without playback progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishableTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub index: Option<u32>,
}

impl From<&TrackInfo> for PublishableTrack {
    fn from(track: &TrackInfo) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            index: track.index,
        }
    }
}

/// Zone state as published to external systems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishableZoneState {
    pub index: ZoneIndex,
    pub name: String,
    pub playback: PlaybackState,
    pub volume: u8,
    pub mute: bool,
    pub repeat_track: bool,
    pub repeat_playlist: bool,
    pub shuffle: bool,
    pub track: Option<PublishableTrack>,
    pub playlist: Option<PlaylistInfo>,
    pub clients: Vec<ClientIndex>,
}

impl From<&ZoneState> for PublishableZoneState {
    fn from(zone: &ZoneState) -> Self {
        Self {
            index: zone.index,
            name: zone.name.clone(),
            playback: zone.playback,
            volume: zone.volume,
            mute: zone.mute,
            repeat_track: zone.repeat_track,
            repeat_playlist: zone.repeat_playlist,
            shuffle: zone.shuffle,
            track: zone.track.as_ref().map(PublishableTrack::from),
            playlist: zone.playlist.clone(),
            clients: zone.clients.iter().copied().collect(),
        }
    }
}

/// Client state as published to external systems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishableClientState {
    pub index: ClientIndex,
    pub name: String,
    pub mac: String,
    pub connected: bool,
    pub volume: u8,
    pub mute: bool,
    pub latency_ms: u32,
    pub zone: Option<ZoneIndex>,
}

impl From<&ClientState> for PublishableClientState {
    fn from(client: &ClientState) -> Self {
        Self {
            index: client.index,
            name: client.name.clone(),
            mac: client.mac.clone(),
            connected: client.connected,
            volume: client.volume,
            mute: client.mute,
            latency_ms: client.latency_ms,
            zone: client.zone,
        }
    }
}

/// A projection of either entity kind
///
/// Lets a single change detector key its cache on [`EntityRef`] and compare
/// candidates of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    Zone(PublishableZoneState),
    Client(PublishableClientState),
}

impl Projection {
    /// The entity this projection describes
    pub fn entity(&self) -> EntityRef {
        match self {
            Projection::Zone(zone) => EntityRef::Zone(zone.index),
            Projection::Client(client) => EntityRef::Client(client.index),
        }
    }

    /// JSON body carried by the notification
    pub fn to_payload(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<PublishableZoneState> for Projection {
    fn from(zone: PublishableZoneState) -> Self {
        Projection::Zone(zone)
    }
}

impl From<PublishableClientState> for Projection {
    fn from(client: PublishableClientState) -> Self {
        Projection::Client(client)
    }
}

/// Types that can be reduced to a publishable [`Projection`]
pub trait Project {
    fn project(&self) -> Projection;
}

impl Project for ZoneState {
    fn project(&self) -> Projection {
        Projection::Zone(PublishableZoneState::from(self))
    }
}

impl Project for ClientState {
    fn project(&self) -> Projection {
        Projection::Client(PublishableClientState::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackProgress;

    fn playing_zone() -> ZoneState {
        let mut zone = ZoneState::new(3, "Office");
        zone.playback = PlaybackState::Playing;
        zone.track = Some(TrackInfo {
            title: Some("So What".to_string()),
            artist: Some("Miles Davis".to_string()),
            album: Some("Kind of Blue".to_string()),
            index: Some(1),
            progress: Some(TrackProgress {
                position_ms: 1_000,
                duration_ms: Some(545_000),
            }),
        });
        zone
    }

    #[test]
    fn test_progress_does_not_affect_projection() {
        let zone = playing_zone();
        let mut later = zone.clone();
        if let Some(track) = later.track.as_mut() {
            track.progress = Some(TrackProgress {
                position_ms: 90_000,
                duration_ms: Some(545_000),
            });
        }

        assert_eq!(zone.project(), later.project());
    }

    #[test]
    fn test_volume_change_affects_projection() {
        let zone = playing_zone();
        let mut louder = zone.clone();
        louder.set_volume(60);

        assert_ne!(zone.project(), louder.project());
    }

    #[test]
    fn test_optional_fields_project_to_none() {
        let zone = ZoneState::new(1, "Empty");
        let projected = PublishableZoneState::from(&zone);

        assert!(projected.track.is_none());
        assert!(projected.playlist.is_none());
        assert!(projected.clients.is_empty());
    }

    #[test]
    fn test_projection_entity() {
        let client = ClientState::new(4, "Patio", "02:00:00:00:00:04");
        assert_eq!(client.project().entity(), EntityRef::Client(ClientIndex::new(4)));
        assert_eq!(playing_zone().project().entity(), EntityRef::Zone(ZoneIndex::new(3)));
    }

    #[test]
    fn test_zone_payload_round_trips() {
        let projection = playing_zone().project();
        let payload = projection.to_payload().unwrap();

        assert_eq!(payload["volume"], 50);
        assert_eq!(payload["playback"], "playing");
        assert!(payload["track"].get("progress").is_none());

        let parsed: PublishableZoneState = serde_json::from_value(payload).unwrap();
        assert_eq!(Projection::Zone(parsed), projection);
    }
}
