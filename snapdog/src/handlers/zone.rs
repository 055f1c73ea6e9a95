//! Zone commands

use std::sync::Arc;

use snapdog_state::{PlaybackState, PlaylistInfo, TrackInfo, ZoneIndex, ZoneState};

use super::CommandContext;
use crate::error::Result;

/// Commands that change a zone
///
/// Each method returns the zone as committed by that command.
#[derive(Clone)]
pub struct ZoneCommands {
    context: Arc<CommandContext>,
}

impl ZoneCommands {
    pub(crate) fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Set the zone volume; values outside 0-100 are clamped
    pub async fn set_volume(&self, zone: ZoneIndex, volume: i32) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.set_volume(volume))
            .await
    }

    /// Raise the volume by `step`, relative to the committed value
    pub async fn volume_up(&self, zone: ZoneIndex, step: u8) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.set_volume(i32::from(z.volume) + i32::from(step)))
            .await
    }

    /// Lower the volume by `step`, relative to the committed value
    pub async fn volume_down(&self, zone: ZoneIndex, step: u8) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.set_volume(i32::from(z.volume) - i32::from(step)))
            .await
    }

    pub async fn set_mute(&self, zone: ZoneIndex, mute: bool) -> Result<ZoneState> {
        self.context.update_zone(zone, |z| z.mute = mute).await
    }

    pub async fn toggle_mute(&self, zone: ZoneIndex) -> Result<ZoneState> {
        self.context.update_zone(zone, |z| z.mute = !z.mute).await
    }

    pub async fn play(&self, zone: ZoneIndex) -> Result<ZoneState> {
        self.set_playback(zone, PlaybackState::Playing).await
    }

    pub async fn pause(&self, zone: ZoneIndex) -> Result<ZoneState> {
        self.set_playback(zone, PlaybackState::Paused).await
    }

    pub async fn stop(&self, zone: ZoneIndex) -> Result<ZoneState> {
        self.set_playback(zone, PlaybackState::Stopped).await
    }

    pub async fn set_playback(&self, zone: ZoneIndex, playback: PlaybackState) -> Result<ZoneState> {
        self.context.update_zone(zone, |z| z.playback = playback).await
    }

    pub async fn set_repeat_track(&self, zone: ZoneIndex, enabled: bool) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.repeat_track = enabled)
            .await
    }

    pub async fn set_repeat_playlist(&self, zone: ZoneIndex, enabled: bool) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.repeat_playlist = enabled)
            .await
    }

    pub async fn set_shuffle(&self, zone: ZoneIndex, enabled: bool) -> Result<ZoneState> {
        self.context.update_zone(zone, |z| z.shuffle = enabled).await
    }

    /// Replace the current track; `None` clears it
    pub async fn set_track(&self, zone: ZoneIndex, track: Option<TrackInfo>) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.track = track.clone())
            .await
    }

    /// Replace the current playlist; `None` clears it
    pub async fn set_playlist(
        &self,
        zone: ZoneIndex,
        playlist: Option<PlaylistInfo>,
    ) -> Result<ZoneState> {
        self.context
            .update_zone(zone, |z| z.playlist = playlist.clone())
            .await
    }

    pub async fn set_name(&self, zone: ZoneIndex, name: impl Into<String>) -> Result<ZoneState> {
        let name = name.into();
        self.context
            .update_zone(zone, |z| z.name.clone_from(&name))
            .await
    }
}
