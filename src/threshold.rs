//! Severity classification of ppm readings against configured thresholds.
//!
//! Classification is stateless: every reading is judged on its own, so a
//! value oscillating across a boundary toggles tier on every call. The alert
//! path depends on this (repeat danger readings re-fire), so no hysteresis
//! or debouncing is applied here.

use serde::Deserialize;

/// Severity tier derived from a single reading's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Safe,
    Warning,
    Danger,
}

/// Classification thresholds in ppm.
///
/// Operator contract: `danger >= warning >= safe`. The ordering is not
/// validated at runtime; a misordered configuration simply collapses tiers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Upper bound of the safe band.
    pub safe: f64,
    /// Lower bound of the warning band (inclusive).
    pub warning: f64,
    /// Lower bound of the danger band (inclusive).
    pub danger: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            safe: 35.0,
            warning: 35.0,
            danger: 50.0,
        }
    }
}

impl Thresholds {
    /// Classify a ppm value. Tier lower bounds are inclusive.
    pub fn classify(&self, value: f64) -> Severity {
        if value >= self.danger {
            Severity::Danger
        } else if value >= self.warning {
            Severity::Warning
        } else {
            Severity::Safe
        }
    }
}
