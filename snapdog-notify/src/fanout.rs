//! Fan-out of one notification to every registered protocol publisher
//!
//! Publishers are invoked concurrently and each call is isolated: an error
//! or a panic in one publisher is logged and never affects the others.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use snapdog_state::{ClientIndex, EntityRef, ZoneIndex};

#[cfg(test)]
use mockall::automock;

use crate::error::PublishError;
use crate::notification::Notification;

/// A downstream protocol that status notifications are published to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Short name used in logs and dispatch reports
    fn name(&self) -> &'static str;

    async fn publish_zone_status(
        &self,
        zone: ZoneIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError>;

    async fn publish_client_status(
        &self,
        client: ClientIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError>;

    async fn publish_global_status(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError>;
}

/// What happened to one notification across all publishers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<&'static str>,
    /// Publishers that reported they were shutting down
    pub disposed: Vec<&'static str>,
}

impl DispatchReport {
    /// Whether every publisher accepted the notification
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.disposed.is_empty()
    }
}

enum Outcome {
    Delivered,
    Failed,
    Disposed,
}

/// The explicit list of publishers a notification is handed to
#[derive(Clone, Default)]
pub struct PublisherFanOut {
    publishers: Vec<Arc<dyn StatusPublisher>>,
}

impl PublisherFanOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher
    pub fn with_publisher(mut self, publisher: Arc<dyn StatusPublisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    /// Register a publisher if it is configured; `None` is a no-op
    pub fn with_optional_publisher(self, publisher: Option<Arc<dyn StatusPublisher>>) -> Self {
        match publisher {
            Some(publisher) => self.with_publisher(publisher),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    /// Names of the registered publishers, in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.publishers.iter().map(|p| p.name()).collect()
    }

    /// Hand `notification` to every publisher and wait for all of them
    pub async fn dispatch(&self, notification: &Notification) -> DispatchReport {
        let calls = self.publishers.iter().map(|publisher| async move {
            let name = publisher.name();
            let result = AssertUnwindSafe(publish_one(publisher.as_ref(), notification))
                .catch_unwind()
                .await;

            let outcome = match result {
                Ok(Ok(())) => Outcome::Delivered,
                Ok(Err(PublishError::Disposed)) => {
                    tracing::debug!(
                        publisher = name,
                        entity = %notification.entity,
                        event_type = %notification.event_type,
                        "Publisher disposed, skipping"
                    );
                    Outcome::Disposed
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        publisher = name,
                        entity = %notification.entity,
                        event_type = %notification.event_type,
                        error = %e,
                        "Failed to publish notification"
                    );
                    Outcome::Failed
                }
                Err(_) => {
                    tracing::error!(
                        publisher = name,
                        entity = %notification.entity,
                        event_type = %notification.event_type,
                        "Publisher panicked while publishing notification"
                    );
                    Outcome::Failed
                }
            };
            (name, outcome)
        });

        let mut report = DispatchReport::default();
        for (name, outcome) in join_all(calls).await {
            match outcome {
                Outcome::Delivered => report.delivered.push(name),
                Outcome::Failed => report.failed.push(name),
                Outcome::Disposed => report.disposed.push(name),
            }
        }
        report
    }
}

impl std::fmt::Debug for PublisherFanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherFanOut")
            .field("publishers", &self.names())
            .finish()
    }
}

async fn publish_one(
    publisher: &dyn StatusPublisher,
    notification: &Notification,
) -> Result<(), PublishError> {
    let event_type = notification.event_type.as_str();
    let payload = &notification.payload;

    match notification.entity {
        EntityRef::Zone(zone) => publisher.publish_zone_status(zone, event_type, payload).await,
        EntityRef::Client(client) => {
            publisher
                .publish_client_status(client, event_type, payload)
                .await
        }
        EntityRef::Global => publisher.publish_global_status(event_type, payload).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_types::{CLIENT_STATE, SYSTEM_STATUS, ZONE_STATE};
    use mockall::predicate::*;
    use serde_json::json;

    fn zone_notification() -> Notification {
        Notification::new(ZONE_STATE, EntityRef::Zone(ZoneIndex::new(3)), json!({"volume": 10}))
    }

    fn named(name: &'static str) -> MockStatusPublisher {
        let mut mock = MockStatusPublisher::new();
        mock.expect_name().return_const(name);
        mock
    }

    #[tokio::test]
    async fn test_routes_by_entity_kind() {
        let mut mock = named("mqtt");
        mock.expect_publish_zone_status()
            .with(eq(ZoneIndex::new(3)), eq(ZONE_STATE), always())
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.expect_publish_client_status()
            .with(eq(ClientIndex::new(2)), eq(CLIENT_STATE), always())
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.expect_publish_global_status()
            .with(eq(SYSTEM_STATUS), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let fan_out = PublisherFanOut::new().with_publisher(Arc::new(mock));

        fan_out.dispatch(&zone_notification()).await;
        fan_out
            .dispatch(&Notification::new(
                CLIENT_STATE,
                EntityRef::Client(ClientIndex::new(2)),
                json!({}),
            ))
            .await;
        let report = fan_out
            .dispatch(&Notification::new(SYSTEM_STATUS, EntityRef::Global, json!({})))
            .await;

        assert_eq!(report.delivered, vec!["mqtt"]);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_failing_publisher_does_not_block_others() {
        let mut broken = named("mqtt");
        broken
            .expect_publish_zone_status()
            .returning(|_, _, _| Err(PublishError::Unavailable("broker offline".into())));

        let mut healthy = named("knx");
        healthy
            .expect_publish_zone_status()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let fan_out = PublisherFanOut::new()
            .with_publisher(Arc::new(broken))
            .with_publisher(Arc::new(healthy));

        let report = fan_out.dispatch(&zone_notification()).await;
        assert_eq!(report.delivered, vec!["knx"]);
        assert_eq!(report.failed, vec!["mqtt"]);
    }

    struct PanickingPublisher;

    #[async_trait]
    impl StatusPublisher for PanickingPublisher {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn publish_zone_status(
            &self,
            _zone: ZoneIndex,
            _event_type: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), PublishError> {
            panic!("transport bug")
        }

        async fn publish_client_status(
            &self,
            _client: ClientIndex,
            _event_type: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), PublishError> {
            panic!("transport bug")
        }

        async fn publish_global_status(
            &self,
            _event_type: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), PublishError> {
            panic!("transport bug")
        }
    }

    #[tokio::test]
    async fn test_panicking_publisher_is_isolated() {
        let mut healthy = named("knx");
        healthy
            .expect_publish_zone_status()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let fan_out = PublisherFanOut::new()
            .with_publisher(Arc::new(PanickingPublisher))
            .with_publisher(Arc::new(healthy));

        let report = fan_out.dispatch(&zone_notification()).await;
        assert_eq!(report.failed, vec!["broken"]);
        assert_eq!(report.delivered, vec!["knx"]);
    }

    #[tokio::test]
    async fn test_disposed_is_not_a_failure() {
        let mut disposed = named("mqtt");
        disposed
            .expect_publish_zone_status()
            .returning(|_, _, _| Err(PublishError::Disposed));

        let fan_out = PublisherFanOut::new().with_publisher(Arc::new(disposed));
        let report = fan_out.dispatch(&zone_notification()).await;

        assert!(report.failed.is_empty());
        assert_eq!(report.disposed, vec!["mqtt"]);
    }

    #[tokio::test]
    async fn test_optional_publisher_absent_is_noop() {
        let fan_out = PublisherFanOut::new().with_optional_publisher(None);
        assert!(fan_out.is_empty());

        let report = fan_out.dispatch(&zone_notification()).await;
        assert_eq!(report, DispatchReport::default());
    }
}
