//! Sensor identity registry.
//!
//! Maps opaque server-assigned sensor ids to dense, zero-based display
//! indices plus display metadata. Indices are handed out in first-seen order
//! and are never reused or reassigned, so consumers can treat an index as a
//! stable UI slot for the lifetime of the process. Registration happens on
//! the fly: a reading from an unseen sensor is enough to allocate a slot.

use std::collections::HashMap;

/// A registered sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorIdentity {
    /// Server-assigned opaque identifier, stable across reconnects.
    pub external_id: String,
    /// Dense zero-based index assigned at first observation.
    pub display_index: usize,
    /// Display name; synthesized placeholder until the server supplies one.
    pub name: String,
    /// Display location; `"Unknown"` until the server supplies one.
    pub location: String,
}

/// Outcome of [`SensorRegistry::register_or_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryUpdate {
    /// The id was unseen; a new display index was allocated.
    Registered,
    /// The id was known and the supplied name or location differed.
    MetadataChanged,
    /// The id was known and nothing changed.
    Unchanged,
}

/// Registry of every sensor observed during this process lifetime.
///
/// Lookup by display index goes through a dense reverse index, so it stays
/// O(1) as the sensor set grows. The registry only grows; sensors are never
/// deregistered.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    /// Primary map, keyed by external id.
    by_external_id: HashMap<String, SensorIdentity>,
    /// Reverse index: `by_index[i]` is the external id holding display index `i`.
    by_index: Vec<String>,
}

impl SensorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unseen sensor or refresh a known one's metadata.
    ///
    /// Empty or absent name/location never overwrite stored values, so a
    /// placeholder survives until a later frame carries a real value and a
    /// real value is never cleared by a sparse frame.
    pub fn register_or_update(
        &mut self,
        external_id: &str,
        name: Option<&str>,
        location: Option<&str>,
    ) -> (usize, RegistryUpdate) {
        let name = name.filter(|s| !s.is_empty());
        let location = location.filter(|s| !s.is_empty());

        if let Some(identity) = self.by_external_id.get_mut(external_id) {
            let mut changed = false;
            if let Some(name) = name {
                if identity.name != name {
                    identity.name = name.to_string();
                    changed = true;
                }
            }
            if let Some(location) = location {
                if identity.location != location {
                    identity.location = location.to_string();
                    changed = true;
                }
            }
            let update = if changed {
                RegistryUpdate::MetadataChanged
            } else {
                RegistryUpdate::Unchanged
            };
            return (identity.display_index, update);
        }

        let display_index = self.by_index.len();
        let identity = SensorIdentity {
            external_id: external_id.to_string(),
            display_index,
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| format!("Sensor {}", display_index + 1)),
            location: location.unwrap_or("Unknown").to_string(),
        };
        tracing::info!(
            external_id = %external_id,
            display_index,
            name = %identity.name,
            "New sensor registered"
        );
        self.by_index.push(external_id.to_string());
        self.by_external_id.insert(external_id.to_string(), identity);
        (display_index, RegistryUpdate::Registered)
    }

    /// Look up a sensor by display index.
    ///
    /// Returns `None` for an index never issued; callers needing a fallback
    /// record construct one themselves.
    pub fn lookup_by_index(&self, display_index: usize) -> Option<&SensorIdentity> {
        self.by_index
            .get(display_index)
            .and_then(|id| self.by_external_id.get(id))
    }

    /// Look up a sensor by its external id.
    pub fn lookup_by_external_id(&self, external_id: &str) -> Option<&SensorIdentity> {
        self.by_external_id.get(external_id)
    }

    /// All registered sensors, ordered by ascending display index.
    pub fn list_all(&self) -> Vec<SensorIdentity> {
        self.by_index
            .iter()
            .filter_map(|id| self.by_external_id.get(id))
            .cloned()
            .collect()
    }

    /// Number of registered sensors.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Whether no sensor has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}
