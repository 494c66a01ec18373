//! Observer interface between the ingestion core and its consumers.
//!
//! The core touches no presentation state; these callbacks are the only
//! channel by which consumers see readings, alerts, registrations, and
//! connection transitions. Observers run synchronously on the ingestion
//! task, in registration order.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::history::Reading;
use crate::registry::SensorIdentity;
use crate::threshold::Severity;

/// Lifecycle state of the live feed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Callbacks invoked by the ingestion core.
///
/// All methods default to no-ops so observers implement only what they
/// consume. Implementations must not block; they run inline on the
/// ingestion task.
pub trait MonitorObserver: Send + Sync {
    /// A validated reading was ingested.
    fn reading_received(&self, _display_index: usize, _reading: &Reading, _severity: Severity) {}

    /// A danger-tier reading. Fires for every such reading, repeats included.
    fn alert(&self, _display_index: usize, _reading: &Reading) {}

    /// A previously unseen sensor was assigned a display index.
    fn sensor_registered(&self, _display_index: usize, _identity: &SensorIdentity) {}

    /// A known sensor's name or location changed.
    fn metadata_changed(&self, _display_index: usize, _identity: &SensorIdentity) {}

    /// The feed connection changed state.
    fn connection_state_changed(&self, _state: ConnectionState) {}
}

/// Registered observers, notified in registration order.
#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn MonitorObserver>>>,
}

impl ObserverSet {
    pub(crate) async fn add(&self, observer: Arc<dyn MonitorObserver>) {
        self.observers.write().await.push(observer);
    }

    /// Deliver one event to every observer, in registration order.
    pub(crate) async fn notify<F>(&self, event: F)
    where
        F: Fn(&dyn MonitorObserver),
    {
        let observers = self.observers.read().await;
        for observer in observers.iter() {
            event(observer.as_ref());
        }
    }
}
