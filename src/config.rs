//! Monitor configuration surface.

use std::time::Duration;

use serde::Deserialize;

use crate::threshold::Thresholds;

/// Configuration for one [`Monitor`](crate::monitor::Monitor) instance.
///
/// `Default` mirrors the reference deployment: feed and API on the same
/// local endpoint, 3 second reconnect delay, 35/50 ppm thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// WebSocket URL of the live sensor feed.
    pub feed_url: String,
    /// Base URL of the HTTP API for discovery and history.
    pub api_url: String,
    /// Delay before a reconnect attempt after connection loss, in
    /// milliseconds.
    pub reconnect_delay_ms: u64,
    /// ppm classification thresholds.
    pub thresholds: Thresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            feed_url: "ws://127.0.0.1:8080".to_string(),
            api_url: "http://127.0.0.1:8080".to_string(),
            reconnect_delay_ms: 3000,
            thresholds: Thresholds::default(),
        }
    }
}

impl MonitorConfig {
    /// Reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.reconnect_delay(), Duration::from_millis(3000));
        assert_eq!(config.thresholds.danger, 50.0);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"feed_url":"ws://10.25.74.7:8080"}"#).unwrap();
        assert_eq!(config.feed_url, "ws://10.25.74.7:8080");
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
        assert_eq!(config.reconnect_delay_ms, 3000);
    }

    #[test]
    fn test_threshold_override() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"thresholds":{"warning":40.0,"danger":60.0}}"#).unwrap();
        assert_eq!(config.thresholds.warning, 40.0);
        assert_eq!(config.thresholds.danger, 60.0);
        assert_eq!(config.thresholds.safe, 35.0);
    }
}
