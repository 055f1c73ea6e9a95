//! SnapDog - main entry point wiring store, notifier, queue and dispatcher

use std::sync::Arc;
use std::time::Duration;

use snapdog_notify::publishers::{KnxBus, KnxStatusPublisher, MqttStatusPublisher, MqttTransport};
use snapdog_notify::{
    notification_queue, CancellationToken, DispatcherHandle, NotificationDispatcher,
    PublisherFanOut, QueueMetrics, QueueStats, StatusPublisher,
};
use snapdog_state::{ChangeDetector, StateStore, SystemState, ZoneRepository};

use crate::clock::{Clock, SystemClock};
use crate::config::SnapDogConfig;
use crate::error::{Result, SnapDogError};
use crate::handlers::{ClientCommands, CommandContext, SystemCommands, ZoneCommands};
use crate::notifier::StateNotifier;

/// Builder for a [`SnapDog`] runtime
pub struct SnapDogBuilder {
    config: SnapDogConfig,
    fan_out: PublisherFanOut,
    clock: Arc<dyn Clock>,
    initial_state: SystemState,
}

impl SnapDogBuilder {
    fn new(config: SnapDogConfig) -> Self {
        Self {
            config,
            fan_out: PublisherFanOut::new(),
            clock: Arc::new(SystemClock),
            initial_state: SystemState::default(),
        }
    }

    /// Register a protocol publisher
    pub fn with_publisher(mut self, publisher: Arc<dyn StatusPublisher>) -> Self {
        self.fan_out = self.fan_out.with_publisher(publisher);
        self
    }

    /// Register a publisher if present; `None` is a no-op
    pub fn with_optional_publisher(mut self, publisher: Option<Arc<dyn StatusPublisher>>) -> Self {
        self.fan_out = self.fan_out.with_optional_publisher(publisher);
        self
    }

    /// Register an MQTT publisher over `transport` if MQTT is enabled in the config
    pub fn with_mqtt<T: MqttTransport + 'static>(self, transport: T) -> Self {
        let publisher = match &self.config.mqtt {
            Some(mqtt) if mqtt.enabled => {
                let publisher = MqttStatusPublisher::new(transport, mqtt.topic_prefix.as_str())
                    .with_retain(mqtt.retain);
                Some(Arc::new(publisher) as Arc<dyn StatusPublisher>)
            }
            _ => {
                tracing::debug!("MQTT integration disabled, transport ignored");
                None
            }
        };
        self.with_optional_publisher(publisher)
    }

    /// Register a KNX publisher over `bus` if KNX is enabled in the config
    pub fn with_knx<B: KnxBus + 'static>(self, bus: B) -> Self {
        let publisher = if self.config.knx_enabled() {
            Some(Arc::new(KnxStatusPublisher::new(bus)) as Arc<dyn StatusPublisher>)
        } else {
            tracing::debug!("KNX integration disabled, bus ignored");
            None
        };
        self.with_optional_publisher(publisher)
    }

    /// Use a custom time source for publish decisions
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Zones and clients present at startup
    ///
    /// Out-of-range volumes are clamped when the runtime starts.
    pub fn with_initial_state(mut self, state: SystemState) -> Self {
        self.initial_state = state;
        self
    }

    /// Validate the configuration and start the dispatcher
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> Result<SnapDog> {
        self.config.validate()?;

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SnapDogError::NoRuntime);
        }

        let detector = ChangeDetector::new(self.config.debounce_window)?;
        let (queue, receiver) = notification_queue(self.config.queue_capacity)?;
        let metrics = queue.metrics();
        let store = StateStore::new(self.initial_state.normalized());

        let publishers = self.fan_out.names();
        let shutdown = CancellationToken::new();
        let dispatcher = NotificationDispatcher::spawn(receiver, Arc::new(self.fan_out), shutdown);

        let notifier = Arc::new(StateNotifier::new(
            store.clone(),
            detector,
            queue,
            self.clock,
        ));
        let context = Arc::new(CommandContext::new(
            store.clone(),
            notifier,
            self.config.max_update_retries,
        ));

        let current = store.current();
        tracing::info!(
            zones = current.zones.len(),
            clients = current.clients.len(),
            ?publishers,
            debounce_ms = self.config.debounce_window.as_millis() as u64,
            queue_capacity = self.config.queue_capacity,
            "SnapDog started"
        );

        Ok(SnapDog {
            store,
            context,
            metrics,
            dispatcher,
            shutdown_grace_period: self.config.shutdown_grace_period,
        })
    }
}

/// A running SnapDog core
///
/// # Example
///
/// ```rust,ignore
/// let snapdog = SnapDog::builder(SnapDogConfig::default().with_mqtt(MqttConfig::default()))
///     .with_mqtt(mqtt_client)
///     .with_initial_state(state)
///     .start()?;
///
/// snapdog.zones().set_volume(ZoneIndex::new(1), 40).await?;
///
/// snapdog.shutdown().await;
/// ```
pub struct SnapDog {
    store: StateStore,
    context: Arc<CommandContext>,
    metrics: Arc<QueueMetrics>,
    dispatcher: DispatcherHandle,
    shutdown_grace_period: Duration,
}

impl SnapDog {
    pub fn builder(config: SnapDogConfig) -> SnapDogBuilder {
        SnapDogBuilder::new(config)
    }

    pub fn zones(&self) -> ZoneCommands {
        ZoneCommands::new(Arc::clone(&self.context))
    }

    pub fn clients(&self) -> ClientCommands {
        ClientCommands::new(Arc::clone(&self.context))
    }

    pub fn system(&self) -> SystemCommands {
        SystemCommands::new(Arc::clone(&self.context))
    }

    /// The versioned store holding all zone and client state
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Read access to zones and clients
    pub fn repository(&self) -> &dyn ZoneRepository {
        &self.store
    }

    /// Queue metrics for health reporting
    pub fn metrics(&self) -> Arc<QueueMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn stats(&self) -> QueueStats {
        self.metrics.snapshot()
    }

    /// Wait until every enqueued notification has been dispatched
    pub async fn wait_until_drained(&self, timeout: Duration) -> bool {
        self.metrics.wait_until_drained(timeout).await
    }

    /// Stop the runtime
    ///
    /// Waits up to the configured grace period for queued notifications to be
    /// dispatched, then stops the dispatcher.
    pub async fn shutdown(self) {
        if !self.wait_until_drained(self.shutdown_grace_period).await {
            tracing::warn!(
                stats = %self.metrics.snapshot(),
                "Shutdown grace period elapsed with notifications still queued"
            );
        }

        self.dispatcher.shutdown().await;
        tracing::info!(stats = %self.metrics.snapshot(), "SnapDog stopped");
    }
}
