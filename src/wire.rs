//! Wire formats for the live feed and the REST endpoints.
//!
//! Readings are self-describing: each carries its own sensor id, so frames
//! may arrive for sensors nothing has announced yet. Frame decoding is per
//! element; one malformed element never fails the surrounding batch.

use serde::Deserialize;

use crate::history::Reading;

/// Split one transport message into its reading elements.
///
/// A JSON array is a batch; any other JSON value is a single element.
/// Element-level decoding happens separately so a bad element only costs
/// itself.
pub fn parse_frame(text: &str) -> Result<Vec<serde_json::Value>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(match value {
        serde_json::Value::Array(elements) => elements,
        single => vec![single],
    })
}

/// One inbound reading as it appears on the wire, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    /// Device identifier; preferred over `id` when both are present.
    pub sensor_id: Option<String>,
    /// Fallback device identifier.
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub value: Option<f64>,
    pub timestamp: Option<i64>,
}

/// A reading that passed validation, bound to its resolved sensor id.
#[derive(Debug, Clone)]
pub struct ValidReading {
    pub external_id: String,
    pub reading: Reading,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl RawReading {
    /// Validate required fields, resolving the device id from `sensor_id`
    /// with `id` as fallback. Empty strings count as absent.
    pub fn validate(&self) -> Option<ValidReading> {
        let external_id = non_empty(self.sensor_id.as_deref())
            .or_else(|| non_empty(self.id.as_deref()))?;
        let value = self.value?;
        let timestamp = self.timestamp?;
        Some(ValidReading {
            external_id: external_id.to_string(),
            reading: Reading { value, timestamp },
            name: self.name.clone(),
            location: self.location.clone(),
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Sensor entry from the discovery endpoint.
///
/// `id` defaults to empty rather than failing the whole listing; the
/// seeding path skips id-less entries.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorDescriptor {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
}
