//! Per-sensor rolling reading history.
//!
//! Windows are arrival-ordered: out-of-order delivery is kept as delivered,
//! never re-sorted by timestamp. Eviction is FIFO on the arrival axis, not
//! value- or severity-based.

use std::collections::{HashMap, VecDeque};

use serde::Deserialize;

/// Maximum readings retained per sensor.
pub const HISTORY_LIMIT: usize = 20;

/// One observation as reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Reading {
    /// Measured concentration in ppm.
    pub value: f64,
    /// Epoch seconds as stamped by the source, not receipt time.
    pub timestamp: i64,
}

/// Bounded FIFO reading windows keyed by external sensor id.
#[derive(Debug, Default)]
pub struct HistoryStore {
    windows: HashMap<String, VecDeque<Reading>>,
}

impl HistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading, evicting the oldest entry once the window is full.
    pub fn append(&mut self, external_id: &str, reading: Reading) {
        let window = self.windows.entry(external_id.to_string()).or_default();
        window.push_back(reading);
        if window.len() > HISTORY_LIMIT {
            window.pop_front();
        }
    }

    /// Readings for a sensor, oldest first. Empty for an unknown id.
    pub fn history(&self, external_id: &str) -> Vec<Reading> {
        self.windows
            .get(external_id)
            .map(|window| window.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Replace a sensor's window with a seeded sequence, oldest first.
    ///
    /// A full replace, not a merge: whatever was in the window is gone and
    /// later live appends continue after the seeded tail. Oversized seed
    /// sequences keep only their most recent [`HISTORY_LIMIT`] entries so
    /// the window bound holds everywhere.
    pub fn replace_all(&mut self, external_id: &str, readings: Vec<Reading>) {
        let skip = readings.len().saturating_sub(HISTORY_LIMIT);
        self.windows
            .insert(external_id.to_string(), readings.into_iter().skip(skip).collect());
    }
}
