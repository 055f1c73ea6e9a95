//! Model types for snapdog-state

mod client_state;
mod entity;
mod ids;
mod playback_state;
mod system_state;
mod track_info;
mod zone_state;

pub use client_state::ClientState;
pub use entity::{EntityKind, EntityRef};
pub use ids::{ClientIndex, ZoneIndex};
pub use playback_state::PlaybackState;
pub use system_state::{Snapshot, StateStore, SystemState};
pub use track_info::{PlaylistInfo, TrackInfo, TrackProgress};
pub use zone_state::{clamp_volume, ZoneState, MAX_VOLUME};
