//! # Security Repository
//!
//! Storage for the arming status, the alarm status, the sensor collection
//! and the verdict of the most recent camera image. The service never holds this state itself: every decision
//! starts with a fresh read through [`SecurityRepository`].
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemorySecurityRepository`]: plain in-process state. Never fails.
//! - [`JsonFileSecurityRepository`]: the same state, written to a JSON
//!   file after every mutation so a command-line session survives restarts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catpoint_core::{AlarmStatus, ArmingStatus, Sensor, SensorId};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by a repository implementation.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Backing store could not be read or written.
    #[error("repository io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be encoded or decoded.
    #[error("repository serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store is not reachable.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

// ─── Trait ───────────────────────────────────────────────────────────

/// Storage capability consumed by the security service.
pub trait SecurityRepository {
    /// Current alarm status.
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError>;

    /// Overwrite the alarm status.
    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError>;

    /// Current arming status.
    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError>;

    /// Overwrite the arming status.
    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError>;

    /// Whether the most recently classified image showed a threat.
    fn threat_detected(&self) -> Result<bool, RepositoryError>;

    /// Remember the verdict of the most recently classified image.
    fn set_threat_detected(&mut self, detected: bool) -> Result<(), RepositoryError>;

    /// All registered sensors, ordered by identity.
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError>;

    /// Register a sensor. Re-adding an existing identity replaces it.
    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError>;

    /// Unregister a sensor by identity. Returns whether it was present.
    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<bool, RepositoryError>;

    /// Store the sensor's current state, inserting it if unknown.
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError>;
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// The complete persisted state of an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySnapshot {
    /// Arming mode.
    #[serde(default)]
    pub arming_status: ArmingStatus,
    /// Alarm escalation level.
    #[serde(default)]
    pub alarm_status: AlarmStatus,
    /// Registered sensors, ordered by identity.
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    /// Verdict of the most recently classified image.
    #[serde(default)]
    pub threat_detected: bool,
}

// ─── In-memory ───────────────────────────────────────────────────────

/// Repository backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecurityRepository {
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
    sensors: BTreeMap<SensorId, Sensor>,
    threat_detected: bool,
}

impl InMemorySecurityRepository {
    /// Empty, disarmed installation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a snapshot. Later duplicates of an identity win.
    pub fn from_snapshot(snapshot: SecuritySnapshot) -> Self {
        Self {
            arming_status: snapshot.arming_status,
            alarm_status: snapshot.alarm_status,
            sensors: snapshot
                .sensors
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            threat_detected: snapshot.threat_detected,
        }
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> SecuritySnapshot {
        SecuritySnapshot {
            arming_status: self.arming_status,
            alarm_status: self.alarm_status,
            sensors: self.sensors.values().cloned().collect(),
            threat_detected: self.threat_detected,
        }
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.alarm_status = status;
        Ok(())
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.arming_status = status;
        Ok(())
    }

    fn threat_detected(&self) -> Result<bool, RepositoryError> {
        Ok(self.threat_detected)
    }

    fn set_threat_detected(&mut self, detected: bool) -> Result<(), RepositoryError> {
        self.threat_detected = detected;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.sensors.values().cloned().collect())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.sensors.insert(sensor.id.clone(), sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<bool, RepositoryError> {
        Ok(self.sensors.remove(&sensor.id).is_some())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.sensors.insert(sensor.id.clone(), sensor.clone());
        Ok(())
    }
}

// ─── JSON file ───────────────────────────────────────────────────────

/// Repository persisted as a pretty-printed JSON [`SecuritySnapshot`].
///
/// The file is rewritten after every successful mutation. A mutation whose
/// write fails is rolled back in memory, so the in-memory view never runs
/// ahead of the file.
#[derive(Debug)]
pub struct JsonFileSecurityRepository {
    path: PathBuf,
    state: InMemorySecurityRepository,
}

impl JsonFileSecurityRepository {
    /// Open the repository at `path`. A missing file starts from defaults
    /// and is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: SecuritySnapshot = serde_json::from_slice(&bytes)?;
                InMemorySecurityRepository::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file yet; starting from defaults");
                InMemorySecurityRepository::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, state })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> SecuritySnapshot {
        self.state.snapshot()
    }

    /// Apply `f` to the in-memory state and persist; restore on failure.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut InMemorySecurityRepository) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let before = self.state.clone();
        let out = f(&mut self.state)?;
        if let Err(e) = self.flush() {
            self.state = before;
            return Err(e);
        }
        Ok(out)
    }

    /// Write to a uniquely named sibling file, then rename it over the
    /// target. The temporary file is removed if anything fails.
    fn flush(&self) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(&self.state.snapshot())?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SecurityRepository for JsonFileSecurityRepository {
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        self.state.alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.mutate(|s| s.set_alarm_status(status))
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        self.state.arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.mutate(|s| s.set_arming_status(status))
    }

    fn threat_detected(&self) -> Result<bool, RepositoryError> {
        self.state.threat_detected()
    }

    fn set_threat_detected(&mut self, detected: bool) -> Result<(), RepositoryError> {
        self.mutate(|s| s.set_threat_detected(detected))
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        self.state.sensors()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.mutate(|s| s.add_sensor(sensor))
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<bool, RepositoryError> {
        self.mutate(|s| s.remove_sensor(sensor))
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        self.mutate(|s| s.update_sensor(sensor))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
