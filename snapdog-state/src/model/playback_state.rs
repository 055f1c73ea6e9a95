//! Playback state enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current playback state of a zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Playback is stopped
    #[default]
    Stopped,
    /// Currently playing audio
    Playing,
    /// Playback is paused
    Paused,
}

impl PlaybackState {
    /// Parse from an audio-server status string
    ///
    /// Handles common values like:
    /// - "playing"
    /// - "paused" / "paused_playback"
    /// - "stopped" / "idle"
    ///
    /// Anything unrecognised is treated as stopped.
    pub fn from_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "playing" | "play" => PlaybackState::Playing,
            "paused" | "paused_playback" | "pause" => PlaybackState::Paused,
            _ => PlaybackState::Stopped,
        }
    }

    /// Whether audio is currently playing
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}
