//! Client commands

use std::sync::Arc;

use snapdog_state::{ClientIndex, ClientState, StateError, ZoneIndex, ZoneRepository};

use super::CommandContext;
use crate::error::Result;

/// Commands that change an audio client
///
/// Each method returns the client as committed by that command.
#[derive(Clone)]
pub struct ClientCommands {
    context: Arc<CommandContext>,
}

impl ClientCommands {
    pub(crate) fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Set the client volume; values outside 0-100 are clamped
    pub async fn set_volume(&self, client: ClientIndex, volume: i32) -> Result<ClientState> {
        self.context
            .update_client(client, |c| c.set_volume(volume))
            .await
    }

    pub async fn set_mute(&self, client: ClientIndex, mute: bool) -> Result<ClientState> {
        self.context.update_client(client, |c| c.mute = mute).await
    }

    pub async fn toggle_mute(&self, client: ClientIndex) -> Result<ClientState> {
        self.context.update_client(client, |c| c.mute = !c.mute).await
    }

    pub async fn set_latency(&self, client: ClientIndex, latency_ms: u32) -> Result<ClientState> {
        self.context
            .update_client(client, |c| c.latency_ms = latency_ms)
            .await
    }

    /// Record that the client connected to or left the audio server
    pub async fn set_connected(&self, client: ClientIndex, connected: bool) -> Result<ClientState> {
        self.context
            .update_client(client, |c| c.connected = connected)
            .await
    }

    pub async fn set_name(&self, client: ClientIndex, name: impl Into<String>) -> Result<ClientState> {
        let name = name.into();
        self.context
            .update_client(client, |c| c.name.clone_from(&name))
            .await
    }

    /// Move a client into `zone`, or out of every zone with `None`
    ///
    /// The client and both zone membership sets change in one commit. The
    /// client, the zone it left and the zone it joined are then published.
    /// The zone it left is read from the snapshot the commit was applied to,
    /// so a concurrent reassignment cannot leave a stale membership published.
    pub async fn assign_to_zone(
        &self,
        client: ClientIndex,
        zone: Option<ZoneIndex>,
    ) -> Result<ClientState> {
        let store = self.context.store();
        store.get_client(client)?;
        if let Some(zone) = zone {
            store.get_zone(zone)?;
        }

        let commit = self
            .context
            .commit_with_base(|state| state.assign_client(client, zone))?;
        let previous = commit.base.client(client).and_then(|c| c.zone);
        self.publish_reassignment(client, previous, zone).await?;

        tracing::info!(%client, from = ?previous, to = ?zone, "Client reassigned");

        Ok(commit
            .snapshot
            .client(client)
            .cloned()
            .ok_or(StateError::ClientNotFound(client))?)
    }

    async fn publish_reassignment(
        &self,
        client: ClientIndex,
        previous: Option<ZoneIndex>,
        zone: Option<ZoneIndex>,
    ) -> Result<()> {
        let notifier = self.context.notifier();
        notifier.publish_client(client).await?;
        if previous != zone {
            for affected in [previous, zone].into_iter().flatten() {
                notifier.publish_zone(affected).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notifier::StateNotifier;
    use snapdog_notify::{notification_queue, NotificationReceiver};
    use snapdog_state::{ChangeDetector, EntityRef, StateStore, SystemState, ZoneState};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn setup() -> (ClientCommands, Arc<CommandContext>, NotificationReceiver) {
        let state = SystemState::new()
            .with_zone(ZoneState::new(1, "Living Room"))
            .with_zone(ZoneState::new(2, "Kitchen"))
            .with_zone(ZoneState::new(3, "Office"))
            .with_client(ClientState::new(1, "Sofa", "02:42:ac:11:00:01").with_zone(1));
        let store = StateStore::new(state);
        let (queue, receiver) = notification_queue(32).unwrap();
        let notifier = Arc::new(StateNotifier::new(
            store.clone(),
            ChangeDetector::new(Duration::ZERO).unwrap(),
            queue,
            Arc::new(ManualClock::default()),
        ));
        let context = Arc::new(CommandContext::new(store, notifier, 4));
        (ClientCommands::new(Arc::clone(&context)), context, receiver)
    }

    async fn drain(
        receiver: &mut NotificationReceiver,
        count: usize,
    ) -> Vec<(EntityRef, serde_json::Value)> {
        let mut seen = Vec::new();
        for _ in 0..count {
            let notification = receiver.dequeue().await.unwrap();
            seen.push((notification.entity, notification.payload));
        }
        seen
    }

    #[tokio::test]
    async fn test_assign_publishes_client_and_both_zones() {
        let (clients, _context, mut receiver) = setup();

        let state = clients
            .assign_to_zone(ClientIndex::new(1), Some(ZoneIndex::new(2)))
            .await
            .unwrap();
        assert_eq!(state.zone, Some(ZoneIndex::new(2)));

        let entities: Vec<_> = drain(&mut receiver, 3)
            .await
            .into_iter()
            .map(|(entity, _)| entity)
            .collect();
        assert_eq!(
            entities,
            vec![
                EntityRef::Client(ClientIndex::new(1)),
                EntityRef::Zone(ZoneIndex::new(1)),
                EntityRef::Zone(ZoneIndex::new(2)),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_zone_left_comes_from_the_winning_base() {
        let (clients, context, mut receiver) = setup();
        let sofa = ClientIndex::new(1);
        let living_room = ZoneIndex::new(1);
        let kitchen = ZoneIndex::new(2);
        let office = ZoneIndex::new(3);

        let before = context.store().current();
        let rival = context.store().clone();
        let raced = AtomicBool::new(false);

        // While the first attempt is in flight a rival moves the client
        // 1 -> 2 and publishes the kitchen, so the retry runs on its snapshot.
        let commit = context
            .commit_with_base(|state| {
                if !raced.swap(true, Ordering::SeqCst) {
                    let moved =
                        rival.try_update_from(&before, |s| s.assign_client(sofa, Some(kitchen)));
                    assert!(moved.is_committed());
                    tokio::task::block_in_place(|| {
                        tokio::runtime::Handle::current()
                            .block_on(context.notifier().publish_zone(kitchen))
                            .unwrap();
                    });
                }
                state.assign_client(sofa, Some(office))
            })
            .unwrap();

        assert_eq!(commit.base.version(), 1);
        let previous = commit.base.client(sofa).and_then(|c| c.zone);
        assert_eq!(previous, Some(kitchen));

        clients
            .publish_reassignment(sofa, previous, Some(office))
            .await
            .unwrap();

        let seen = drain(&mut receiver, 4).await;
        assert_eq!(seen[0].0, EntityRef::Zone(kitchen));
        assert_eq!(seen[0].1["clients"], serde_json::json!([1]));
        assert_eq!(seen[1].0, EntityRef::Client(sofa));
        assert_eq!(seen[2].0, EntityRef::Zone(kitchen));
        assert_eq!(seen[2].1["clients"], serde_json::json!([]));
        assert_eq!(seen[3].0, EntityRef::Zone(office));
        assert_eq!(seen[3].1["clients"], serde_json::json!([1]));
        assert!(seen.iter().all(|(entity, _)| *entity != EntityRef::Zone(living_room)));
    }
}
