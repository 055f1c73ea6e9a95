//! Configuration for the SnapDog runtime
//!
//! Controls debounce timing, queue sizing, retry budgets and which protocol
//! integrations are enabled. Loadable from JSON; every field has a default.

use std::time::Duration;

use serde::Deserialize;
use snapdog_notify::DEFAULT_QUEUE_CAPACITY;
use snapdog_state::{StoreError, DEFAULT_DEBOUNCE_WINDOW, DEFAULT_MAX_RETRIES};

use crate::error::{Result, SnapDogError};

/// Default number of optimistic attempts per command
pub const DEFAULT_MAX_UPDATE_RETRIES: u32 = DEFAULT_MAX_RETRIES;

/// Configuration for the SnapDog runtime
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapDogConfig {
    /// Minimum interval between two publishes of the same entity
    /// Default: 500 ms
    #[serde(rename = "debounce_window_ms", with = "duration_ms")]
    pub debounce_window: Duration,

    /// Notifications buffered before command handlers wait
    /// Default: 1000
    pub queue_capacity: usize,

    /// Optimistic update attempts before a command gives up
    /// Default: 16
    pub max_update_retries: u32,

    /// How long shutdown waits for queued notifications to drain
    /// Default: 5 seconds
    #[serde(rename = "shutdown_grace_period_ms", with = "duration_ms")]
    pub shutdown_grace_period: Duration,

    /// MQTT integration; absent means disabled
    pub mqtt: Option<MqttConfig>,

    /// KNX integration; absent means disabled
    pub knx: Option<KnxConfig>,
}

impl Default for SnapDogConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_update_retries: DEFAULT_MAX_UPDATE_RETRIES,
            shutdown_grace_period: Duration::from_secs(5),
            mqtt: None,
            knx: None,
        }
    }
}

impl SnapDogConfig {
    /// Create a SnapDogConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Publish every distinct change immediately
    ///
    /// Useful for tests and for integrations that do their own rate limiting.
    pub fn no_debounce() -> Self {
        Self {
            debounce_window: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Smaller buffers for constrained hosts
    pub fn resource_efficient() -> Self {
        Self {
            queue_capacity: 100,
            debounce_window: Duration::from_secs(1),
            ..Default::default()
        }
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_max_update_retries(mut self, retries: u32) -> Self {
        self.max_update_retries = retries;
        self
    }

    pub fn with_shutdown_grace_period(mut self, grace: Duration) -> Self {
        self.shutdown_grace_period = grace;
        self
    }

    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = Some(mqtt);
        self
    }

    pub fn with_knx(mut self, knx: KnxConfig) -> Self {
        self.knx = Some(knx);
        self
    }

    /// Whether an MQTT publisher should be registered
    pub fn mqtt_enabled(&self) -> bool {
        self.mqtt.as_ref().is_some_and(|m| m.enabled)
    }

    /// Whether a KNX publisher should be registered
    pub fn knx_enabled(&self) -> bool {
        self.knx.as_ref().is_some_and(|k| k.enabled)
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(SnapDogError::Configuration(
                "Queue capacity must be greater than 0".to_string(),
            ));
        }

        if self.max_update_retries == 0 {
            return Err(SnapDogError::Store(StoreError::InvalidRetryBudget));
        }

        if chrono::TimeDelta::from_std(self.debounce_window).is_err() {
            return Err(SnapDogError::Configuration(format!(
                "Debounce window {:?} is out of range",
                self.debounce_window
            )));
        }

        if let Some(mqtt) = &self.mqtt {
            mqtt.validate()?;
        }

        Ok(())
    }
}

/// MQTT publisher settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub enabled: bool,
    /// Root of every status topic
    /// Default: "snapdog"
    pub topic_prefix: String,
    /// Publish status messages with the retain flag
    /// Default: true
    pub retain: bool,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            topic_prefix: snapdog_notify::publishers::DEFAULT_TOPIC_PREFIX.to_string(),
            retain: true,
        }
    }
}

impl MqttConfig {
    pub fn with_topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    fn validate(&self) -> Result<()> {
        let prefix = self.topic_prefix.trim_matches('/');
        if prefix.is_empty() {
            return Err(SnapDogError::Configuration(
                "MQTT topic prefix must not be empty".to_string(),
            ));
        }
        if prefix.contains(['+', '#']) {
            return Err(SnapDogError::Configuration(format!(
                "MQTT topic prefix '{}' must not contain wildcards",
                self.topic_prefix
            )));
        }
        Ok(())
    }
}

/// KNX publisher settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KnxConfig {
    pub enabled: bool,
}

impl Default for KnxConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Serde adapter for durations expressed as whole milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
