//! # SnapDog - State synchronization core for a smart-home audio controller
//!
//! Holds the zone and client state of the controller, decides which changes
//! are worth telling the outside world about, and delivers them to MQTT, KNX
//! and any other registered protocol without ever blocking a command on the
//! network:
//!
//! ```rust,ignore
//! use snapdog::{SnapDog, SnapDogConfig, MqttConfig};
//! use snapdog_state::{SystemState, ZoneState, ZoneIndex};
//!
//! let config = SnapDogConfig::default().with_mqtt(MqttConfig::default());
//! let snapdog = SnapDog::builder(config)
//!     .with_mqtt(mqtt_client)
//!     .with_initial_state(SystemState::new().with_zone(ZoneState::new(1, "Living Room")))
//!     .start()?;
//!
//! snapdog.zones().set_volume(ZoneIndex::new(1), 40).await?;  // published
//! snapdog.zones().set_volume(ZoneIndex::new(1), 40).await?;  // unchanged, suppressed
//!
//! snapdog.shutdown().await;
//! ```
//!
//! ## Key Features
//!
//! - **Consistent state**: immutable versioned snapshots with optimistic updates
//! - **Quiet publishing**: identical states are dropped, bursts are debounced per entity
//! - **Non-blocking commands**: notifications are queued and dispatched in the background
//! - **Isolation**: a failing protocol never costs the others their updates
//!
//! ## Architecture
//!
//! ```text
//! snapdog (commands, notifier, runtime)
//!     ↓
//! snapdog-notify (queue, dispatcher, publishers)
//!     ↓
//! snapdog-state (model, projections, change detection)
//!     ↓
//! state-store (versioned snapshots)
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod runtime;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{KnxConfig, MqttConfig, SnapDogConfig};
pub use error::{Result, SnapDogError};
pub use handlers::{ClientCommands, SystemCommands, ZoneCommands};
pub use notifier::StateNotifier;
pub use runtime::{SnapDog, SnapDogBuilder};

// Re-export the lower layers for single-crate consumers
pub use snapdog_notify;
pub use snapdog_state;
