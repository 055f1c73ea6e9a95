//! SnapDog State
//!
//! The domain model of the SnapDog audio controller and the pieces that
//! decide what is worth telling the outside world about it.
//!
//! # Features
//!
//! - **Domain Model**: `ZoneState`, `ClientState` and the whole-system
//!   `SystemState`, held in a [`StateStore`] as immutable versioned snapshots
//! - **Projections**: reduced, comparable views of zones and clients
//! - **Change Detection**: per-entity dedup and debounce of publishes
//! - **Repository**: read access to the current zone and client state
//!
//! # Architecture
//!
//! ```text
//! StateStore ──► Project ──► ChangeDetector ──► (notification queue)
//! (snapshots)   (Projection)  (publish decision)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use snapdog_state::prelude::*;
//!
//! let store = StateStore::new(SystemState::new().with_zone(ZoneState::new(1, "Lounge")));
//! let detector = ChangeDetector::default();
//! let now = chrono::Utc::now();
//!
//! let zone = store.get_zone(ZoneIndex::new(1)).unwrap();
//! let projection = zone.project();
//! assert!(detector.check_and_record(projection.entity(), &projection, now).should_publish());
//!
//! // Same state again: nothing new to publish
//! assert!(!detector.check_and_record(projection.entity(), &projection, now).should_publish());
//! ```

pub mod change_detector;
pub mod error;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repository;

// Re-exports - Public API
pub use change_detector::{ChangeDetector, PublishDecision, DEFAULT_DEBOUNCE_WINDOW};
pub use error::{Result, StateError};
pub use model::{
    clamp_volume, ClientIndex, ClientState, EntityKind, EntityRef, PlaybackState, PlaylistInfo,
    Snapshot, StateStore, SystemState, TrackInfo, TrackProgress, ZoneIndex, ZoneState, MAX_VOLUME,
};
pub use projection::{
    Project, Projection, PublishableClientState, PublishableTrack, PublishableZoneState,
};
pub use repository::ZoneRepository;

// Store types used throughout the public API
pub use state_store::{
    Commit, StoreError, TryUpdate, Versioned, VersionedStore, DEFAULT_MAX_RETRIES,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::change_detector::{ChangeDetector, PublishDecision};
    pub use crate::error::StateError;
    pub use crate::model::{
        ClientIndex, ClientState, EntityRef, PlaybackState, StateStore, SystemState, ZoneIndex,
        ZoneState,
    };
    pub use crate::projection::{Project, Projection};
    pub use crate::repository::ZoneRepository;
}
