//! # Sensors
//!
//! A sensor is a binary intrusion detector: a door contact, a window
//! contact, or a motion detector. Its identity is the pair (name, type),
//! carried by [`SensorId`]. Two `Sensor` values with the same id are the
//! same sensor regardless of their `active` flag, so a collection of
//! sensors keyed by id never holds duplicates.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatpointError;
use crate::status::normalize;

/// Kind of physical detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    /// Door contact.
    Door,
    /// Window contact.
    Window,
    /// Motion detector.
    Motion,
}

impl SensorType {
    /// All sensor types.
    pub fn all() -> &'static [SensorType] {
        &[Self::Door, Self::Window, Self::Motion]
    }

    /// Returns the upper snake case name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Window => "WINDOW",
            Self::Motion => "MOTION",
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = CatpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "DOOR" => Ok(Self::Door),
            "WINDOW" => Ok(Self::Window),
            "MOTION" => Ok(Self::Motion),
            _ => Err(CatpointError::InvalidArgument(format!(
                "unknown sensor type: {s:?}"
            ))),
        }
    }
}

/// Identity of a sensor: its type and its name. Orders by type, then name.
///
/// Deserialization goes through [`SensorId::new`], so stored state with a
/// blank name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSensorId")]
pub struct SensorId {
    /// Kind of detector.
    pub sensor_type: SensorType,
    /// Display name, e.g. "Front Door".
    pub name: String,
}

impl SensorId {
    /// Build an id, rejecting blank names.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Result<Self, CatpointError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatpointError::InvalidArgument(
                "sensor name must not be empty".into(),
            ));
        }
        Ok(Self { name, sensor_type })
    }
}

#[derive(Deserialize)]
struct UncheckedSensorId {
    sensor_type: SensorType,
    name: String,
}

impl TryFrom<UncheckedSensorId> for SensorId {
    type Error = CatpointError;

    fn try_from(raw: UncheckedSensorId) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.sensor_type)
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.sensor_type, self.name)
    }
}

/// A registered sensor and its current activation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    /// Identity.
    #[serde(flatten)]
    pub id: SensorId,
    /// Whether the detector is currently tripped.
    pub active: bool,
}

impl Sensor {
    /// Create a new, inactive sensor.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Result<Self, CatpointError> {
        Ok(Self {
            id: SensorId::new(name, sensor_type)?,
            active: false,
        })
    }

    /// The sensor's display name.
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// The sensor's type.
    pub fn sensor_type(&self) -> SensorType {
        self.id.sensor_type
    }

    /// Builder-style activation flag, mostly useful in tests and fixtures.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        write!(f, "{} ({state})", self.id)
    }
}
