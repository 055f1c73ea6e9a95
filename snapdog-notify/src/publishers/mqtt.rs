//! MQTT status publisher
//!
//! Topic layout:
//!
//! ```text
//! {prefix}/zones/{index}/{event}
//! {prefix}/clients/{index}/{event}
//! {prefix}/system/{event}
//! ```
//!
//! where `{event}` is the lower-cased event type. Bodies are JSON.

use async_trait::async_trait;
use snapdog_state::{ClientIndex, ZoneIndex};

#[cfg(test)]
use mockall::automock;

use crate::error::PublishError;
use crate::fanout::StatusPublisher;

/// Topic prefix used when none is configured
pub const DEFAULT_TOPIC_PREFIX: &str = "snapdog";

/// The broker connection the publisher writes to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MqttTransport: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool)
        -> Result<(), PublishError>;
}

/// Publishes status notifications as MQTT messages
pub struct MqttStatusPublisher<T> {
    transport: T,
    topic_prefix: String,
    retain: bool,
}

impl<T: MqttTransport> MqttStatusPublisher<T> {
    /// Create a publisher writing retained messages under `topic_prefix`
    pub fn new(transport: T, topic_prefix: impl Into<String>) -> Self {
        let prefix: String = topic_prefix.into();
        Self {
            transport,
            topic_prefix: prefix.trim_end_matches('/').to_string(),
            retain: true,
        }
    }

    /// Whether messages are published with the retain flag
    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    pub fn zone_topic(&self, zone: ZoneIndex, event_type: &str) -> String {
        format!(
            "{}/zones/{}/{}",
            self.topic_prefix,
            zone,
            event_type.to_lowercase()
        )
    }

    pub fn client_topic(&self, client: ClientIndex, event_type: &str) -> String {
        format!(
            "{}/clients/{}/{}",
            self.topic_prefix,
            client,
            event_type.to_lowercase()
        )
    }

    pub fn system_topic(&self, event_type: &str) -> String {
        format!("{}/system/{}", self.topic_prefix, event_type.to_lowercase())
    }

    async fn send(&self, topic: String, payload: &serde_json::Value) -> Result<(), PublishError> {
        let body = serde_json::to_vec(payload)?;
        tracing::trace!(%topic, bytes = body.len(), "Publishing MQTT message");
        self.transport.publish(&topic, body, self.retain).await
    }
}

#[async_trait]
impl<T: MqttTransport> StatusPublisher for MqttStatusPublisher<T> {
    fn name(&self) -> &'static str {
        "mqtt"
    }

    async fn publish_zone_status(
        &self,
        zone: ZoneIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.send(self.zone_topic(zone, event_type), payload).await
    }

    async fn publish_client_status(
        &self,
        client: ClientIndex,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.send(self.client_topic(client, event_type), payload)
            .await
    }

    async fn publish_global_status(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        self.send(self.system_topic(event_type), payload).await
    }
}
