//! Command handlers
//!
//! Every command follows the same path: check the target exists, commit a
//! pure transform through the versioned store with a bounded retry budget,
//! then ask the notifier to publish the affected entities. Publishing only
//! enqueues; handlers never wait on a downstream protocol.

mod client;
mod system;
mod zone;

pub use client::ClientCommands;
pub use system::SystemCommands;
pub use zone::ZoneCommands;

use std::sync::Arc;

use snapdog_state::{
    ClientIndex, ClientState, Commit, Snapshot, StateError, StateStore, SystemState, ZoneIndex,
    ZoneRepository, ZoneState,
};

use crate::error::Result;
use crate::notifier::StateNotifier;

/// State shared by all command handlers
pub struct CommandContext {
    store: StateStore,
    notifier: Arc<StateNotifier>,
    max_retries: u32,
}

impl CommandContext {
    pub fn new(store: StateStore, notifier: Arc<StateNotifier>, max_retries: u32) -> Self {
        Self {
            store,
            notifier,
            max_retries,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn notifier(&self) -> &StateNotifier {
        &self.notifier
    }

    /// Commit `transform` against the latest snapshot
    pub(crate) fn commit<F>(&self, transform: F) -> Result<Arc<Snapshot>>
    where
        F: Fn(&SystemState) -> SystemState,
    {
        Ok(self.store.update_with_retry(transform, self.max_retries)?)
    }

    /// Commit `transform`, keeping the snapshot the winning attempt read
    pub(crate) fn commit_with_base<F>(&self, transform: F) -> Result<Commit<SystemState>>
    where
        F: Fn(&SystemState) -> SystemState,
    {
        Ok(self.store.commit_with_retry(transform, self.max_retries)?)
    }

    /// Apply `apply` to one zone, then publish it
    pub(crate) async fn update_zone<F>(&self, zone: ZoneIndex, apply: F) -> Result<ZoneState>
    where
        F: Fn(&mut ZoneState),
    {
        self.store.get_zone(zone)?;

        let snapshot = self.commit(|state| state.update_zone(zone, &apply))?;
        self.notifier.publish_zone(zone).await?;

        Ok(snapshot
            .zone(zone)
            .cloned()
            .ok_or(StateError::ZoneNotFound(zone))?)
    }

    /// Apply `apply` to one client, then publish it
    pub(crate) async fn update_client<F>(&self, client: ClientIndex, apply: F) -> Result<ClientState>
    where
        F: Fn(&mut ClientState),
    {
        self.store.get_client(client)?;

        let snapshot = self.commit(|state| state.update_client(client, &apply))?;
        self.notifier.publish_client(client).await?;

        Ok(snapshot
            .client(client)
            .cloned()
            .ok_or(StateError::ClientNotFound(client))?)
    }
}
