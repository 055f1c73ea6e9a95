//! Entity references used to key publish decisions and notifications

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ClientIndex, ZoneIndex};

/// Kind of entity a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Zone,
    Client,
    /// System-wide status with no entity index
    Global,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Zone => write!(f, "zone"),
            EntityKind::Client => write!(f, "client"),
            EntityKind::Global => write!(f, "global"),
        }
    }
}

/// A specific entity: a zone, a client, or the system as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum EntityRef {
    Zone(ZoneIndex),
    Client(ClientIndex),
    Global,
}

impl EntityRef {
    /// The kind of entity referenced
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Zone(_) => EntityKind::Zone,
            EntityRef::Client(_) => EntityKind::Client,
            EntityRef::Global => EntityKind::Global,
        }
    }

    /// Raw entity index, `None` for global status
    pub fn index(&self) -> Option<u32> {
        match self {
            EntityRef::Zone(zone) => Some(zone.get()),
            EntityRef::Client(client) => Some(client.get()),
            EntityRef::Global => None,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Zone(zone) => write!(f, "zone {}", zone),
            EntityRef::Client(client) => write!(f, "client {}", client),
            EntityRef::Global => write!(f, "global"),
        }
    }
}

impl From<ZoneIndex> for EntityRef {
    fn from(zone: ZoneIndex) -> Self {
        EntityRef::Zone(zone)
    }
}

impl From<ClientIndex> for EntityRef {
    fn from(client: ClientIndex) -> Self {
        EntityRef::Client(client)
    }
}
