//! Audio client state type

use serde::{Deserialize, Serialize};

use super::zone_state::deserialize_volume;
use super::{clamp_volume, ClientIndex, ZoneIndex};

/// Complete state of an audio client (a playback endpoint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Stable client index
    pub index: ClientIndex,
    /// Display name
    pub name: String,
    /// Hardware identity, MAC-like
    pub mac: String,
    /// Whether the client is connected to the audio server
    pub connected: bool,
    /// Configured volume (0-100), preserved while muted
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: u8,
    /// Whether the client is muted
    pub mute: bool,
    /// Playback latency compensation in milliseconds
    pub latency_ms: u32,
    /// Zone the client is assigned to, if any
    pub zone: Option<ZoneIndex>,
}

impl ClientState {
    /// Create a new, disconnected, unassigned client
    pub fn new(index: impl Into<ClientIndex>, name: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            mac: mac.into(),
            connected: false,
            volume: 50,
            mute: false,
            latency_ms: 0,
            zone: None,
        }
    }

    /// Builder-style helper assigning the client to a zone
    pub fn with_zone(mut self, zone: impl Into<ZoneIndex>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Set the volume, clamped to `0..=MAX_VOLUME`
    pub fn set_volume(&mut self, volume: i32) {
        self.volume = clamp_volume(volume);
    }

    /// Volume actually applied to the output: 0 while muted
    pub fn effective_volume(&self) -> u8 {
        if self.mute {
            0
        } else {
            self.volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_unassigned() {
        let client = ClientState::new(3, "Kitchen Speaker", "02:42:ac:11:00:02");
        assert_eq!(client.index, ClientIndex::new(3));
        assert!(client.zone.is_none());
        assert!(!client.connected);
    }

    #[test]
    fn test_set_volume_clamps() {
        let mut client = ClientState::new(1, "Desk", "aa:bb:cc:dd:ee:ff");
        client.set_volume(101);
        assert_eq!(client.volume, 100);
    }

    #[test]
    fn test_deserialized_volume_is_clamped() {
        let mut json = serde_json::to_value(ClientState::new(1, "Desk", "aa:bb:cc:dd:ee:ff")).unwrap();
        json["volume"] = serde_json::json!(1000);

        let client: ClientState = serde_json::from_value(json).unwrap();
        assert_eq!(client.volume, 100);
    }

    #[test]
    fn test_effective_volume_while_muted() {
        let mut client = ClientState::new(1, "Desk", "aa:bb:cc:dd:ee:ff");
        client.set_volume(30);
        client.mute = true;
        assert_eq!(client.effective_volume(), 0);
        assert_eq!(client.volume, 30);
    }
}
