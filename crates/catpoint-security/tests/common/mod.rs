//! Shared fixtures for the security service integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use catpoint_core::{AlarmStatus, ArmingStatus, CameraImage, Sensor, SensorType};
use catpoint_security::{
    ClassifierError, ImageClassifier, InMemorySecurityRepository, ListenerError, RepositoryError,
    SecurityRepository, SecurityService, StatusListener,
};

/// Repository that records every write and can be told to fail them.
#[derive(Debug, Default)]
pub struct RecordingRepository {
    pub inner: InMemorySecurityRepository,
    pub alarm_writes: Vec<AlarmStatus>,
    pub arming_writes: Vec<ArmingStatus>,
    pub sensor_writes: Vec<Sensor>,
    pub threat_writes: Vec<bool>,
    pub fail_alarm_writes: bool,
    pub fail_arming_writes: bool,
    pub fail_sensor_writes: bool,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload state without recording it as writes.
    pub fn seeded(arming: ArmingStatus, alarm: AlarmStatus, sensors: &[Sensor]) -> Self {
        let mut inner = InMemorySecurityRepository::new();
        inner.set_arming_status(arming).unwrap();
        inner.set_alarm_status(alarm).unwrap();
        for s in sensors {
            inner.add_sensor(s.clone()).unwrap();
        }
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn total_writes(&self) -> usize {
        self.alarm_writes.len()
            + self.arming_writes.len()
            + self.sensor_writes.len()
            + self.threat_writes.len()
    }
}

impl SecurityRepository for RecordingRepository {
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        self.inner.alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        if self.fail_alarm_writes {
            return Err(RepositoryError::Unavailable("alarm store offline".into()));
        }
        self.alarm_writes.push(status);
        self.inner.set_alarm_status(status)
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        self.inner.arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        if self.fail_arming_writes {
            return Err(RepositoryError::Unavailable("arming store offline".into()));
        }
        self.arming_writes.push(status);
        self.inner.set_arming_status(status)
    }

    fn threat_detected(&self) -> Result<bool, RepositoryError> {
        self.inner.threat_detected()
    }

    fn set_threat_detected(&mut self, detected: bool) -> Result<(), RepositoryError> {
        self.threat_writes.push(detected);
        self.inner.set_threat_detected(detected)
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        self.inner.sensors()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.inner.add_sensor(sensor)
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<bool, RepositoryError> {
        self.inner.remove_sensor(sensor)
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        if self.fail_sensor_writes {
            return Err(RepositoryError::Unavailable("sensor store offline".into()));
        }
        self.sensor_writes.push(sensor.clone());
        self.inner.update_sensor(sensor)
    }
}

/// Classifier with a scripted verdict that remembers the thresholds it saw.
///
/// Frames built by [`frame_showing`] override the scripted verdict.
#[derive(Debug, Default)]
pub struct StubClassifier {
    pub verdict: bool,
    pub thresholds: Vec<f32>,
    pub offline: bool,
}

impl StubClassifier {
    pub fn answering(verdict: bool) -> Self {
        Self {
            verdict,
            ..Self::default()
        }
    }
}

impl ImageClassifier for StubClassifier {
    fn contains_threat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ClassifierError> {
        if self.offline {
            return Err(ClassifierError::Unavailable("vision api timeout".into()));
        }
        self.thresholds.push(confidence_threshold);
        match image.as_bytes() {
            b"CAT" => Ok(true),
            b"NO CAT" => Ok(false),
            _ => Ok(self.verdict),
        }
    }
}

/// Listener that fails every notification.
#[derive(Debug, Default)]
pub struct BrokenListener {
    pub calls: Mutex<usize>,
}

impl BrokenListener {
    fn fail(&self) -> Result<(), ListenerError> {
        *self.calls.lock().unwrap() += 1;
        Err(ListenerError::Failed("display unplugged".into()))
    }
}

impl StatusListener for BrokenListener {
    fn on_alarm_status_changed(&self, _status: AlarmStatus) -> Result<(), ListenerError> {
        self.fail()
    }

    fn on_sensor_status_changed(&self) -> Result<(), ListenerError> {
        self.fail()
    }
}

pub type Service = SecurityService<RecordingRepository, StubClassifier>;

pub fn service(repo: RecordingRepository, verdict: bool) -> Service {
    SecurityService::new(repo, StubClassifier::answering(verdict))
}

pub fn door(name: &str) -> Sensor {
    Sensor::new(name, SensorType::Door).unwrap()
}

pub fn window(name: &str) -> Sensor {
    Sensor::new(name, SensorType::Window).unwrap()
}

pub fn frame() -> CameraImage {
    CameraImage::new(vec![0x89, b'P', b'N', b'G'])
}

/// A frame whose verdict [`StubClassifier`] reads from its content.
pub fn frame_showing(threat: bool) -> CameraImage {
    let bytes: &[u8] = if threat { b"CAT" } else { b"NO CAT" };
    CameraImage::new(bytes.to_vec())
}
