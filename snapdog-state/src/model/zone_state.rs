//! Zone state type

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ClientIndex, PlaybackState, PlaylistInfo, TrackInfo, ZoneIndex};

/// Highest volume a zone or client accepts
pub const MAX_VOLUME: u8 = 100;

/// Clamp any requested volume into `0..=MAX_VOLUME`
pub fn clamp_volume(volume: i32) -> u8 {
    volume.clamp(0, MAX_VOLUME as i32) as u8
}

/// Read a volume from any integer, clamping it like [`clamp_volume`]
pub(crate) fn deserialize_volume<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, MAX_VOLUME as i64) as u8)
}

/// Complete state of a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    /// Stable zone index
    pub index: ZoneIndex,
    /// Display name
    pub name: String,
    /// Current playback state
    pub playback: PlaybackState,
    /// Configured volume (0-100), preserved while muted
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: u8,
    /// Whether the zone is muted
    pub mute: bool,
    /// Repeat the current track
    pub repeat_track: bool,
    /// Repeat the whole playlist
    pub repeat_playlist: bool,
    /// Shuffle playback order
    pub shuffle: bool,
    /// Currently loaded track
    pub track: Option<TrackInfo>,
    /// Current playlist
    pub playlist: Option<PlaylistInfo>,
    /// Clients assigned to this zone
    pub clients: BTreeSet<ClientIndex>,
}

impl ZoneState {
    /// Create a new ZoneState with default values
    pub fn new(index: impl Into<ZoneIndex>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            playback: PlaybackState::default(),
            volume: 50,
            mute: false,
            repeat_track: false,
            repeat_playlist: false,
            shuffle: false,
            track: None,
            playlist: None,
            clients: BTreeSet::new(),
        }
    }

    /// Set the volume, clamped to `0..=MAX_VOLUME`
    pub fn set_volume(&mut self, volume: i32) {
        self.volume = clamp_volume(volume);
    }

    /// Volume actually sent to the speakers: 0 while muted
    pub fn effective_volume(&self) -> u8 {
        if self.mute {
            0
        } else {
            self.volume
        }
    }

    /// Check if this zone is currently playing
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }
}
