//! Whole-system state held by the versioned store

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use state_store::{Versioned, VersionedStore};

use super::{ClientIndex, ClientState, ZoneIndex, ZoneState, MAX_VOLUME};

/// Everything the controller knows about zones and clients at one instant
///
/// Values are treated as immutable once placed in the store: updates clone
/// the state, apply the change and commit the clone as a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub zones: BTreeMap<ZoneIndex, ZoneState>,
    pub clients: BTreeMap<ClientIndex, ClientState>,
    /// Free-form diagnostics, never published
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl SystemState {
    /// Create an empty system state
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper adding a zone
    pub fn with_zone(mut self, zone: ZoneState) -> Self {
        self.zones.insert(zone.index, zone);
        self
    }

    /// Builder-style helper adding a client, keeping the zone membership in sync
    pub fn with_client(mut self, client: ClientState) -> Self {
        if let Some(zone) = client.zone.and_then(|z| self.zones.get_mut(&z)) {
            zone.clients.insert(client.index);
        }
        self.clients.insert(client.index, client);
        self
    }

    /// Bring hand-built state within the model's bounds
    ///
    /// Volumes above [`MAX_VOLUME`] are clamped, since fields can be set
    /// directly without going through `set_volume`.
    pub fn normalized(mut self) -> Self {
        for zone in self.zones.values_mut() {
            if zone.volume > MAX_VOLUME {
                tracing::warn!(
                    zone = %zone.index,
                    volume = zone.volume,
                    "Clamping out-of-range zone volume"
                );
                zone.volume = MAX_VOLUME;
            }
        }
        for client in self.clients.values_mut() {
            if client.volume > MAX_VOLUME {
                tracing::warn!(
                    client = %client.index,
                    volume = client.volume,
                    "Clamping out-of-range client volume"
                );
                client.volume = MAX_VOLUME;
            }
        }
        self
    }

    pub fn zone(&self, index: ZoneIndex) -> Option<&ZoneState> {
        self.zones.get(&index)
    }

    pub fn client(&self, index: ClientIndex) -> Option<&ClientState> {
        self.clients.get(&index)
    }

    /// Clone this state with `apply` run against one zone
    ///
    /// Unknown zones leave the clone unchanged.
    pub fn update_zone<F>(&self, index: ZoneIndex, apply: F) -> Self
    where
        F: FnOnce(&mut ZoneState),
    {
        let mut next = self.clone();
        if let Some(zone) = next.zones.get_mut(&index) {
            apply(zone);
        }
        next
    }

    /// Clone this state with `apply` run against one client
    ///
    /// Unknown clients leave the clone unchanged.
    pub fn update_client<F>(&self, index: ClientIndex, apply: F) -> Self
    where
        F: FnOnce(&mut ClientState),
    {
        let mut next = self.clone();
        if let Some(client) = next.clients.get_mut(&index) {
            apply(client);
        }
        next
    }

    /// Clone this state with `client` moved into `zone` (or out of every zone)
    ///
    /// Both the client's own `zone` field and the zones' membership sets are
    /// updated in the same clone.
    pub fn assign_client(&self, client: ClientIndex, zone: Option<ZoneIndex>) -> Self {
        let mut next = self.clone();
        let Some(state) = next.clients.get_mut(&client) else {
            return next;
        };

        let previous = state.zone;
        state.zone = zone;

        if let Some(old) = previous.and_then(|z| next.zones.get_mut(&z)) {
            old.clients.remove(&client);
        }
        if let Some(new) = zone.and_then(|z| next.zones.get_mut(&z)) {
            new.clients.insert(client);
        }
        next
    }
}

/// An immutable, versioned view of the whole system
pub type Snapshot = Versioned<SystemState>;

/// The store holding the current [`Snapshot`]
pub type StateStore = VersionedStore<SystemState>;
