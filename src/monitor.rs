//! Monitor service: lifecycle, startup seeding, and read accessors.
//!
//! One `Monitor` is one explicitly constructed ingestion core. There is no
//! process-wide instance; tests run several side by side and consumers
//! inject the monitor wherever it is needed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::events::{ConnectionState, MonitorObserver, ObserverSet};
use crate::feed::LiveFeed;
use crate::history::{HistoryStore, Reading};
use crate::registry::{SensorIdentity, SensorRegistry};
use crate::threshold::Severity;
use crate::transport::{FeedTransport, WebSocketTransport};

/// Most recent live reading for one sensor.
///
/// Fed only by the live path; seeded history never touches it.
#[derive(Debug, Clone, Copy)]
pub struct LatestReading {
    pub reading: Reading,
    pub severity: Severity,
    /// Receipt instant (monotonic), for staleness checks.
    pub received_at: Instant,
}

/// Mutable core state: registry, history windows, latest readings, and the
/// connection state.
///
/// Mutated only by the ingestion task and the seeding path; accessors clone
/// snapshots out under a read lock.
#[derive(Debug, Default)]
pub(crate) struct CoreState {
    pub(crate) registry: SensorRegistry,
    pub(crate) history: HistoryStore,
    pub(crate) latest: HashMap<String, LatestReading>,
    pub(crate) connection: ConnectionState,
}

/// The sensor monitoring core.
///
/// Construct, subscribe observers, then [`start`](Self::start). `start`
/// seeds the registry from the discovery endpoint, connects the live feed,
/// and loads per-sensor history; the feed then runs until
/// [`stop`](Self::stop).
pub struct Monitor {
    api: ApiClient,
    feed: Arc<LiveFeed>,
    state: Arc<RwLock<CoreState>>,
    observers: Arc<ObserverSet>,
    cancel: CancellationToken,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a monitor using the built-in WebSocket transport.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        Self::with_transport(config, Arc::new(WebSocketTransport))
    }

    /// Create a monitor with a custom feed transport.
    pub fn with_transport(
        config: MonitorConfig,
        transport: Arc<dyn FeedTransport>,
    ) -> Result<Self, MonitorError> {
        let api = ApiClient::new(&config.api_url)?;
        let state = Arc::new(RwLock::new(CoreState::default()));
        let observers = Arc::new(ObserverSet::default());
        let feed = Arc::new(LiveFeed::new(
            transport,
            config.feed_url.clone(),
            config.reconnect_delay(),
            config.thresholds,
            Arc::clone(&state),
            Arc::clone(&observers),
        ));
        Ok(Self {
            api,
            feed,
            state,
            observers,
            cancel: CancellationToken::new(),
            feed_task: Mutex::new(None),
        })
    }

    /// Register an observer. Events are delivered in registration order.
    pub async fn subscribe(&self, observer: Arc<dyn MonitorObserver>) {
        self.observers.add(observer).await;
    }

    /// Seed discovery, connect the live feed, and load per-sensor history.
    ///
    /// Ordered so display indices are stable before live data arrives:
    /// discovery first, then the connection, then history seeding alongside
    /// live readings. A failed discovery still connects the feed.
    pub async fn start(&self) {
        self.seed_sensors().await;

        let feed = Arc::clone(&self.feed);
        let handle = tokio::spawn(feed.run(self.cancel.clone()));
        *self.feed_task.lock().await = Some(handle);

        self.load_all_histories().await;
    }

    /// Tear down the live feed.
    ///
    /// Cancels the supervisor (including any pending reconnect timer) and
    /// waits for it to finish; the connection state ends `Disconnected` and
    /// nothing further is scheduled.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let task = self.feed_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
        info!("Monitor stopped");
    }

    /// Fetch the server's sensor list and register every unseen id.
    ///
    /// Known sensors are left untouched and nothing is ever deregistered;
    /// the registry only grows. Fails soft: any transport or decode error
    /// logs a warning and registers nothing.
    pub async fn seed_sensors(&self) {
        let sensors = match self.api.list_sensors().await {
            Ok(sensors) => sensors,
            Err(err) => {
                warn!(error = %err, "Sensor discovery failed");
                return;
            }
        };
        info!(count = sensors.len(), "Discovered sensors");

        let mut registered = Vec::new();
        {
            let mut state = self.state.write().await;
            for descriptor in &sensors {
                if descriptor.id.is_empty() {
                    continue;
                }
                if state.registry.lookup_by_external_id(&descriptor.id).is_some() {
                    continue;
                }
                let (display_index, _) = state.registry.register_or_update(
                    &descriptor.id,
                    descriptor.name.as_deref(),
                    descriptor.location.as_deref(),
                );
                if let Some(identity) = state.registry.lookup_by_index(display_index) {
                    registered.push((display_index, identity.clone()));
                }
            }
        }

        for (display_index, identity) in registered {
            self.observers
                .notify(|observer| observer.sensor_registered(display_index, &identity))
                .await;
        }
    }

    /// Seed one sensor's history window from the server.
    ///
    /// Resolves the display index through the registry; an unknown index or
    /// a failed fetch resolves to an empty result and leaves the window
    /// unchanged. On success the window is fully replaced.
    pub async fn load_history(&self, display_index: usize) -> Vec<Reading> {
        let Some(identity) = self.sensor(display_index).await else {
            warn!(display_index, "No sensor registered at index");
            return Vec::new();
        };

        let readings = match self.api.sensor_history(&identity.external_id).await {
            Ok(readings) => readings,
            Err(err) => {
                warn!(
                    sensor = %identity.name,
                    external_id = %identity.external_id,
                    error = %err,
                    "History fetch failed"
                );
                return Vec::new();
            }
        };
        info!(
            sensor = %identity.name,
            count = readings.len(),
            "Loaded historical readings"
        );

        self.state
            .write()
            .await
            .history
            .replace_all(&identity.external_id, readings.clone());
        readings
    }

    /// Seed every registered sensor's history.
    ///
    /// Fetches run concurrently and may settle in any order; this returns
    /// only after every one has settled (success or soft failure).
    pub async fn load_all_histories(&self) {
        let sensors = self.sensors().await;
        let fetches = sensors
            .iter()
            .map(|sensor| self.load_history(sensor.display_index));
        futures::future::join_all(fetches).await;
        info!("All historical data loaded");
    }

    /// All registered sensors, ordered by ascending display index.
    pub async fn sensors(&self) -> Vec<SensorIdentity> {
        self.state.read().await.registry.list_all()
    }

    /// One sensor by display index; `None` for an index never issued.
    pub async fn sensor(&self, display_index: usize) -> Option<SensorIdentity> {
        self.state
            .read()
            .await
            .registry
            .lookup_by_index(display_index)
            .cloned()
    }

    /// A sensor's history window, oldest first. Empty for an unknown index.
    pub async fn history(&self, display_index: usize) -> Vec<Reading> {
        let state = self.state.read().await;
        match state.registry.lookup_by_index(display_index) {
            Some(identity) => state.history.history(&identity.external_id),
            None => Vec::new(),
        }
    }

    /// The most recent live reading for a sensor, if any has arrived.
    pub async fn latest(&self, display_index: usize) -> Option<LatestReading> {
        let state = self.state.read().await;
        let identity = state.registry.lookup_by_index(display_index)?;
        state.latest.get(&identity.external_id).copied()
    }

    /// Current feed connection state.
    pub async fn connection_state(&self) -> ConnectionState {
        self.state.read().await.connection
    }
}
