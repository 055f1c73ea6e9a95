//! Read access to zones and clients

use crate::error::{Result, StateError};
use crate::model::{ClientIndex, ClientState, StateStore, ZoneIndex, ZoneState};

/// Read-only lookup of zone and client state
///
/// Implementations return owned values taken from one consistent snapshot.
pub trait ZoneRepository: Send + Sync {
    /// Current state of a zone
    fn get_zone(&self, index: ZoneIndex) -> Result<ZoneState>;

    /// Current state of a client
    fn get_client(&self, index: ClientIndex) -> Result<ClientState>;

    /// Indices of every known zone, ascending
    fn zone_indices(&self) -> Vec<ZoneIndex>;

    /// Indices of every known client, ascending
    fn client_indices(&self) -> Vec<ClientIndex>;
}

impl ZoneRepository for StateStore {
    fn get_zone(&self, index: ZoneIndex) -> Result<ZoneState> {
        self.current()
            .zone(index)
            .cloned()
            .ok_or(StateError::ZoneNotFound(index))
    }

    fn get_client(&self, index: ClientIndex) -> Result<ClientState> {
        self.current()
            .client(index)
            .cloned()
            .ok_or(StateError::ClientNotFound(index))
    }

    fn zone_indices(&self) -> Vec<ZoneIndex> {
        self.current().zones.keys().copied().collect()
    }

    fn client_indices(&self) -> Vec<ClientIndex> {
        self.current().clients.keys().copied().collect()
    }
}
