//! Sensor registry and live-data ingestion core for gas (ppm) monitoring.
//!
//! This crate is the data backbone of a real-time gas-sensor dashboard: it
//! ingests an unordered, self-describing stream of per-sensor readings over
//! a persistent WebSocket feed, discovers previously-unseen sensors on the
//! fly, keeps a bounded rolling history per sensor, classifies readings
//! against safety thresholds, and reconnects transparently across transport
//! failures. A REST client seeds sensor discovery and historical data.
//!
//! ## Architecture
//!
//! 1. **Registry** (`registry`) - Maps opaque server-assigned sensor ids to
//!    dense, stable display indices plus display metadata.
//!
//! 2. **History** (`history`) - Per-sensor bounded FIFO windows of readings,
//!    in arrival order.
//!
//! 3. **Classification** (`threshold`) - Stateless severity tiers
//!    (safe/warning/danger) from configured ppm thresholds.
//!
//! 4. **Live feed** (`transport`, `feed`) - Connection state machine over a
//!    pluggable transport with fixed-delay reconnection, forever.
//!
//! 5. **REST seeding** (`api`) - Discovery and per-sensor history fetches,
//!    fail-soft.
//!
//! 6. **Service** (`monitor`, `events`, `config`) - An explicitly owned
//!    [`monitor::Monitor`] with `start`/`stop` lifecycle, observer
//!    subscriptions, and read accessors for consumers.
//!
//! Consumers never mutate core state directly: readings flow in through the
//! feed, and everything observable flows out through
//! [`events::MonitorObserver`] callbacks or cloned snapshots.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
mod feed;
pub mod history;
pub mod monitor;
pub mod registry;
pub mod threshold;
pub mod transport;
pub mod wire;
