//! Shared fixtures: a scripted feed transport and a recording observer.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;

use ppm_monitor::error::MonitorError;
use ppm_monitor::events::{ConnectionState, MonitorObserver};
use ppm_monitor::history::Reading;
use ppm_monitor::registry::SensorIdentity;
use ppm_monitor::threshold::Severity;
use ppm_monitor::transport::{FeedTransport, FrameStream};

/// One scripted connection lifetime.
pub enum Script {
    /// Fail the connect call itself.
    FailConnect,
    /// Deliver these payloads, then end the stream (server-side close).
    Deliver(Vec<String>),
    /// Deliver these payloads, then hold the connection open.
    Hold(Vec<String>),
}

/// Feed transport that replays scripts, one per connect call.
///
/// Once scripts run out, further connects hold an idle connection open so
/// the supervisor parks instead of spinning.
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    connects: AtomicUsize,
    connect_times: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedTransport {
    pub fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            connects: AtomicUsize::new(0),
            connect_times: Mutex::new(Vec::new()),
        })
    }

    /// Number of connect calls made so far.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Instants at which each connect call arrived.
    pub fn connect_times(&self) -> Vec<tokio::time::Instant> {
        self.connect_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedTransport for ScriptedTransport {
    async fn connect(&self, _url: &str) -> Result<FrameStream, MonitorError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.connect_times
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());

        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            Some(Script::FailConnect) => {
                Err(MonitorError::Transport("scripted connect failure".to_string()))
            }
            Some(Script::Deliver(payloads)) => {
                let frames: FrameStream = Box::pin(stream::iter(payloads.into_iter().map(Ok)));
                Ok(frames)
            }
            Some(Script::Hold(payloads)) => {
                let frames: FrameStream = Box::pin(
                    stream::iter(payloads.into_iter().map(Ok)).chain(stream::pending()),
                );
                Ok(frames)
            }
            None => {
                let frames: FrameStream = Box::pin(stream::pending());
                Ok(frames)
            }
        }
    }
}

/// Everything the core emitted, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Reading {
        index: usize,
        value: f64,
        timestamp: i64,
        severity: Severity,
    },
    Alert {
        index: usize,
        value: f64,
    },
    Registered {
        index: usize,
        external_id: String,
        name: String,
        location: String,
    },
    Metadata {
        index: usize,
        name: String,
        location: String,
    },
    Connection(ConnectionState),
}

/// Observer that records every event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn readings(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, Event::Reading { .. }))
            .collect()
    }

    pub fn alerts(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, Event::Alert { .. }))
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl MonitorObserver for RecordingObserver {
    fn reading_received(&self, display_index: usize, reading: &Reading, severity: Severity) {
        self.push(Event::Reading {
            index: display_index,
            value: reading.value,
            timestamp: reading.timestamp,
            severity,
        });
    }

    fn alert(&self, display_index: usize, reading: &Reading) {
        self.push(Event::Alert {
            index: display_index,
            value: reading.value,
        });
    }

    fn sensor_registered(&self, display_index: usize, identity: &SensorIdentity) {
        self.push(Event::Registered {
            index: display_index,
            external_id: identity.external_id.clone(),
            name: identity.name.clone(),
            location: identity.location.clone(),
        });
    }

    fn metadata_changed(&self, display_index: usize, identity: &SensorIdentity) {
        self.push(Event::Metadata {
            index: display_index,
            name: identity.name.clone(),
            location: identity.location.clone(),
        });
    }

    fn connection_state_changed(&self, state: ConnectionState) {
        self.push(Event::Connection(state));
    }
}

/// Poll until `condition` holds, panicking after a generous timeout.
pub async fn wait_until<F>(what: &str, condition: F)
where
    F: Fn() -> bool,
{
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {what}");
}
