//! Zone and client identity types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a zone
///
/// Zones are configured up front and keep their index for the lifetime of
/// the process, so the index doubles as the zone's identity on every
/// external protocol (MQTT topics, KNX group addresses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneIndex(u32);

impl ZoneIndex {
    /// Create a zone index
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index value
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ZoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ZoneIndex {
    fn from(index: u32) -> Self {
        ZoneIndex::new(index)
    }
}

/// Stable index of an audio client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIndex(u32);

impl ClientIndex {
    /// Create a client index
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index value
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClientIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ClientIndex {
    fn from(index: u32) -> Self {
        ClientIndex::new(index)
    }
}
