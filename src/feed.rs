//! Live feed ingestion and reconnection supervision.
//!
//! One task owns the connection state machine: connect, drain frames,
//! reconnect after a fixed delay on any loss, forever. The loop shape
//! guarantees at most one pending reconnect timer (the trailing sleep) and
//! that no failure mode can leave the state stuck in `Connecting`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{ConnectionState, ObserverSet};
use crate::monitor::{CoreState, LatestReading};
use crate::registry::RegistryUpdate;
use crate::threshold::{Severity, Thresholds};
use crate::transport::FeedTransport;
use crate::wire::{self, RawReading};

/// Ingestion worker behind a [`Monitor`](crate::monitor::Monitor).
pub(crate) struct LiveFeed {
    transport: Arc<dyn FeedTransport>,
    feed_url: String,
    reconnect_delay: Duration,
    thresholds: Thresholds,
    state: Arc<RwLock<CoreState>>,
    observers: Arc<ObserverSet>,
}

impl LiveFeed {
    pub(crate) fn new(
        transport: Arc<dyn FeedTransport>,
        feed_url: String,
        reconnect_delay: Duration,
        thresholds: Thresholds,
        state: Arc<RwLock<CoreState>>,
        observers: Arc<ObserverSet>,
    ) -> Self {
        Self {
            transport,
            feed_url,
            reconnect_delay,
            thresholds,
            state,
            observers,
        }
    }

    /// Drive the connection state machine until cancelled.
    ///
    /// Each pass through the outer loop is one connection lifetime; the
    /// trailing sleep is the single pending reconnect timer. There is no
    /// backoff growth and no retry cap: the feed is a continuous monitoring
    /// channel and retries for as long as the monitor runs.
    pub(crate) async fn run(self: Arc<Self>, cancel: CancellationToken) {
        'supervisor: loop {
            self.set_connection_state(ConnectionState::Connecting).await;

            let connected = tokio::select! {
                result = self.transport.connect(&self.feed_url) => result,
                _ = cancel.cancelled() => break 'supervisor,
            };

            match connected {
                Ok(mut frames) => {
                    info!(url = %self.feed_url, "Feed connected");
                    self.set_connection_state(ConnectionState::Connected).await;

                    loop {
                        tokio::select! {
                            frame = frames.next() => match frame {
                                Some(Ok(text)) => self.ingest_frame(&text).await,
                                Some(Err(err)) => {
                                    warn!(error = %err, "Feed transport error");
                                    break;
                                }
                                None => {
                                    info!("Feed closed by server");
                                    break;
                                }
                            },
                            _ = cancel.cancelled() => break 'supervisor,
                        }
                    }
                }
                Err(err) => warn!(error = %err, "Feed connect failed"),
            }

            self.set_connection_state(ConnectionState::Disconnected).await;

            debug!(delay_ms = self.reconnect_delay.as_millis() as u64, "Reconnect scheduled");
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = cancel.cancelled() => break 'supervisor,
            }
        }

        self.set_connection_state(ConnectionState::Disconnected).await;
    }

    /// Record a transition and notify observers. No-op when unchanged.
    async fn set_connection_state(&self, next: ConnectionState) {
        {
            let mut state = self.state.write().await;
            if state.connection == next {
                return;
            }
            state.connection = next;
        }
        debug!(state = ?next, "Connection state changed");
        self.observers
            .notify(|observer| observer.connection_state_changed(next))
            .await;
    }

    /// Parse one transport message and process its readings in array order.
    async fn ingest_frame(&self, text: &str) {
        let elements = match wire::parse_frame(text) {
            Ok(elements) => elements,
            Err(err) => {
                warn!(error = %err, "Dropping unparseable frame");
                return;
            }
        };
        if elements.len() > 1 {
            debug!(count = elements.len(), "Received reading batch");
        }
        for element in elements {
            match serde_json::from_value::<RawReading>(element) {
                Ok(raw) => self.apply_reading(raw).await,
                Err(err) => warn!(error = %err, "Dropping malformed reading"),
            }
        }
    }

    /// Register, record, classify, and publish one reading.
    async fn apply_reading(&self, raw: RawReading) {
        let Some(valid) = raw.validate() else {
            warn!(raw = ?raw, "Dropping reading with missing required fields");
            return;
        };
        let severity = self.thresholds.classify(valid.reading.value);

        let (display_index, update, identity) = {
            let mut state = self.state.write().await;
            let (display_index, update) = state.registry.register_or_update(
                &valid.external_id,
                valid.name.as_deref(),
                valid.location.as_deref(),
            );
            state.history.append(&valid.external_id, valid.reading);
            state.latest.insert(
                valid.external_id.clone(),
                LatestReading {
                    reading: valid.reading,
                    severity,
                    received_at: Instant::now(),
                },
            );
            let identity = state
                .registry
                .lookup_by_external_id(&valid.external_id)
                .cloned();
            (display_index, update, identity)
        };

        debug!(
            display_index,
            value = valid.reading.value,
            severity = ?severity,
            "Reading received"
        );

        if let Some(identity) = identity {
            match update {
                RegistryUpdate::Registered => {
                    self.observers
                        .notify(|observer| observer.sensor_registered(display_index, &identity))
                        .await;
                }
                RegistryUpdate::MetadataChanged => {
                    self.observers
                        .notify(|observer| observer.metadata_changed(display_index, &identity))
                        .await;
                }
                RegistryUpdate::Unchanged => {}
            }
        }

        self.observers
            .notify(|observer| observer.reading_received(display_index, &valid.reading, severity))
            .await;

        if severity == Severity::Danger {
            warn!(display_index, value = valid.reading.value, "Dangerous gas level detected");
            self.observers
                .notify(|observer| observer.alert(display_index, &valid.reading))
                .await;
        }
    }
}
