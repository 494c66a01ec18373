//! Console gas monitor: runs the ingestion core and logs sensor activity.
//!
//! Connects to the live feed and the REST API, then logs registrations,
//! readings, danger alerts, and connection transitions until interrupted.

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info, warn};

use ppm_monitor::config::MonitorConfig;
use ppm_monitor::events::{ConnectionState, MonitorObserver};
use ppm_monitor::history::Reading;
use ppm_monitor::monitor::Monitor;
use ppm_monitor::registry::SensorIdentity;
use ppm_monitor::threshold::{Severity, Thresholds};

/// Live gas-sensor monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "ppm-monitor")]
#[command(about = "Ingest live gas-sensor readings and log alerts")]
struct Args {
    /// WebSocket URL of the live sensor feed
    #[arg(long, env = "FEED_URL", default_value = "ws://127.0.0.1:8080")]
    feed_url: String,

    /// Base URL of the HTTP API for discovery and history
    #[arg(long, env = "API_URL", default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// Delay before reconnect attempts, in milliseconds
    #[arg(long, default_value = "3000")]
    reconnect_ms: u64,

    /// Upper bound of the safe band, in ppm
    #[arg(long, default_value = "35.0")]
    safe_ppm: f64,

    /// Warning threshold (inclusive), in ppm
    #[arg(long, default_value = "35.0")]
    warning_ppm: f64,

    /// Danger threshold (inclusive), in ppm
    #[arg(long, default_value = "50.0")]
    danger_ppm: f64,
}

/// Logs everything the core emits.
struct ConsoleObserver;

impl MonitorObserver for ConsoleObserver {
    fn reading_received(&self, display_index: usize, reading: &Reading, severity: Severity) {
        debug!(
            display_index,
            value = reading.value,
            timestamp = reading.timestamp,
            severity = ?severity,
            "Reading"
        );
    }

    fn alert(&self, display_index: usize, reading: &Reading) {
        warn!(
            display_index,
            value = reading.value,
            time = %chrono::Local::now().format("%H:%M"),
            "ALERT: dangerous gas level"
        );
    }

    fn sensor_registered(&self, display_index: usize, identity: &SensorIdentity) {
        info!(
            display_index,
            name = %identity.name,
            location = %identity.location,
            external_id = %identity.external_id,
            "Sensor registered"
        );
    }

    fn metadata_changed(&self, display_index: usize, identity: &SensorIdentity) {
        info!(
            display_index,
            name = %identity.name,
            location = %identity.location,
            "Sensor metadata changed"
        );
    }

    fn connection_state_changed(&self, state: ConnectionState) {
        info!(state = ?state, "Feed connection");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!(
        feed_url = %args.feed_url,
        api_url = %args.api_url,
        reconnect_ms = args.reconnect_ms,
        warning_ppm = args.warning_ppm,
        danger_ppm = args.danger_ppm,
        "Starting ppm-monitor"
    );

    let config = MonitorConfig {
        feed_url: args.feed_url,
        api_url: args.api_url,
        reconnect_delay_ms: args.reconnect_ms,
        thresholds: Thresholds {
            safe: args.safe_ppm,
            warning: args.warning_ppm,
            danger: args.danger_ppm,
        },
    };

    let monitor = Monitor::new(config)?;
    monitor.subscribe(Arc::new(ConsoleObserver)).await;
    monitor.start().await;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    monitor.stop().await;

    Ok(())
}
