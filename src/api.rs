//! REST client for sensor discovery and historical readings.
//!
//! Pure HTTP: seeding policy (what to register, when to fail soft) lives on
//! the monitor. Both calls are idempotent GETs, safe to retry.

use std::time::Duration;

use crate::error::MonitorError;
use crate::history::Reading;
use crate::wire::SensorDescriptor;

/// Request timeout for discovery and history calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the dashboard API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: &str) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Every sensor known to the server.
    pub async fn list_sensors(&self) -> Result<Vec<SensorDescriptor>, MonitorError> {
        let url = format!("{}/sensor", self.base_url);
        let sensors = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sensors)
    }

    /// Historical readings for one sensor, oldest first.
    ///
    /// Entries carry extra row fields on the wire; only value and timestamp
    /// are kept.
    pub async fn sensor_history(&self, external_id: &str) -> Result<Vec<Reading>, MonitorError> {
        let url = format!("{}/sensor/{}/history", self.base_url, external_id);
        let readings = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(readings)
    }
}
