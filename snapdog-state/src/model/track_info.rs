//! Track and playlist descriptors

use serde::{Deserialize, Serialize};

/// Playback position within the current track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackProgress {
    /// Position in milliseconds
    pub position_ms: u64,
    /// Track duration in milliseconds, if known
    pub duration_ms: Option<u64>,
}

impl TrackProgress {
    /// Progress as a fraction in `0.0..=1.0`, if the duration is known
    pub fn fraction(&self) -> Option<f64> {
        match self.duration_ms {
            Some(0) | None => None,
            Some(duration) => Some((self.position_ms as f64 / duration as f64).min(1.0)),
        }
    }
}

/// Information about the track currently loaded in a zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track title
    pub title: Option<String>,
    /// Artist name
    pub artist: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// 1-based position of the track in the current playlist
    pub index: Option<u32>,
    /// Playback progress
    pub progress: Option<TrackProgress>,
}

impl TrackInfo {
    /// Create a new empty TrackInfo
    pub fn new() -> Self {
        Self::default()
    }

    /// Create TrackInfo with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Check if track info has any meaningful content
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none()
    }
}

/// The playlist a zone is playing from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    /// Playlist name
    pub name: Option<String>,
    /// 1-based playlist index
    pub index: Option<u32>,
}
