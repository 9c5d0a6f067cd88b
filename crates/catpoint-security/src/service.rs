//! # Security Service
//!
//! [`SecurityService`] reconciles sensor edges, arming changes and image
//! verdicts into one alarm status. Each entry point follows the same
//! sequence:
//!
//! 1. Read the current state from the repository (one read per decision).
//! 2. Apply the rule from [`crate::transition`].
//! 3. Write the results through the repository.
//! 4. Notify listeners.
//!
//! A repository or classifier error aborts the call. Reads and
//! classification come before any write. When a later write fails, the
//! writes already made by the call are reverted, so a failed call never
//! leaves half a transition behind. The transition log and the listeners
//! only see calls whose writes all succeeded.

use std::sync::Arc;

use thiserror::Error;

use catpoint_core::{AlarmStatus, ArmingStatus, CameraImage, SecurityConfig, Sensor};

use crate::classifier::{ClassifierError, ImageClassifier};
use crate::listener::{ListenerError, StatusListener};
use crate::repository::{RepositoryError, SecurityRepository};
use crate::transition::{self, AlarmTransition, TransitionTrigger};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors returned by the service entry points.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// The repository failed; nothing after the failing call was applied.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The image classifier failed; the alarm status was not touched.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

// ─── Service ─────────────────────────────────────────────────────────

/// The alarm state machine.
pub struct SecurityService<R, C> {
    repository: R,
    classifier: C,
    config: SecurityConfig,
    listeners: Vec<Arc<dyn StatusListener>>,
    transitions: Vec<AlarmTransition>,
}

impl<R, C> std::fmt::Debug for SecurityService<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityService")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("transitions", &self.transitions.len())
            .finish_non_exhaustive()
    }
}

impl<R: SecurityRepository, C: ImageClassifier> SecurityService<R, C> {
    /// Service with the default configuration.
    pub fn new(repository: R, classifier: C) -> Self {
        Self::with_config(repository, classifier, SecurityConfig::default())
    }

    /// Service with an explicit configuration.
    pub fn with_config(repository: R, classifier: C, config: SecurityConfig) -> Self {
        Self {
            repository,
            classifier,
            config,
            listeners: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Mutable access to the repository, bypassing the alarm rules.
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Active configuration.
    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Verdict of the most recently processed image, as stored.
    pub fn threat_detected(&self) -> Result<bool, SecurityError> {
        Ok(self.repository.threat_detected()?)
    }

    /// Every alarm status write performed by this service, oldest first.
    pub fn transitions(&self) -> &[AlarmTransition] {
        &self.transitions
    }

    /// Consume the service and hand back the repository.
    pub fn into_repository(self) -> R {
        self.repository
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Register a listener. Registering the same handle twice is ignored.
    pub fn add_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        if !self.listeners.iter().any(|l| same_listener(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    /// Unregister a listener by handle. Returns whether it was registered.
    pub fn remove_status_listener(&mut self, listener: &Arc<dyn StatusListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a sensor.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), SecurityError> {
        tracing::debug!(sensor = %sensor.id, "adding sensor");
        self.repository.add_sensor(sensor)?;
        self.notify("sensor_status_changed", |l| l.on_sensor_status_changed());
        Ok(())
    }

    /// Unregister a sensor. Returns whether it was registered.
    pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<bool, SecurityError> {
        tracing::debug!(sensor = %sensor.id, "removing sensor");
        let removed = self.repository.remove_sensor(sensor)?;
        if removed {
            self.notify("sensor_status_changed", |l| l.on_sensor_status_changed());
        }
        Ok(removed)
    }

    /// Current alarm status.
    pub fn alarm_status(&self) -> Result<AlarmStatus, SecurityError> {
        Ok(self.repository.alarm_status()?)
    }

    /// Current arming status.
    pub fn arming_status(&self) -> Result<ArmingStatus, SecurityError> {
        Ok(self.repository.arming_status()?)
    }

    /// All registered sensors.
    pub fn sensors(&self) -> Result<Vec<Sensor>, SecurityError> {
        Ok(self.repository.sensors()?)
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// A sensor reports a new activation state.
    ///
    /// Deactivating a sensor that is already inactive is a no-op: nothing
    /// is written and nobody is notified. Otherwise the alarm rule is
    /// applied: the sensor is persisted with its new flag first, then the
    /// alarm status. If the alarm write fails the sensor write is reverted.
    /// `sensor` is updated in place only on success.
    pub fn change_sensor_activation_status(
        &mut self,
        sensor: &mut Sensor,
        active: bool,
    ) -> Result<(), SecurityError> {
        if !sensor.active && !active {
            tracing::debug!(sensor = %sensor.id, "sensor already inactive");
            return Ok(());
        }

        let current = self.repository.alarm_status()?;
        let (next, trigger) = if active {
            let arming = self.repository.arming_status()?;
            (
                transition::on_sensor_activated(current, arming),
                TransitionTrigger::SensorActivated,
            )
        } else {
            let others_active = self
                .repository
                .sensors()?
                .iter()
                .any(|s| s.active && s != &*sensor);
            (
                transition::on_sensor_deactivated(current, others_active),
                TransitionTrigger::SensorDeactivated,
            )
        };
        tracing::debug!(sensor = %sensor.id, active, from = %current, to = ?next, "sensor rule evaluated");

        let original = sensor.clone();
        let updated = sensor.clone().with_active(active);
        self.repository.update_sensor(&updated)?;

        if let Some(next) = next {
            if let Err(e) = self.repository.set_alarm_status(next) {
                self.undo("restore sensor", |r| r.update_sensor(&original));
                return Err(e.into());
            }
            self.record_transition(current, next, trigger);
        }
        *sensor = updated;

        if let Some(next) = next {
            self.notify("alarm_status_changed", |l| l.on_alarm_status_changed(next));
        }
        self.notify("sensor_status_changed", |l| l.on_sensor_status_changed());
        Ok(())
    }

    /// Classify a camera image and apply the image rule.
    pub fn process_image(&mut self, image: &CameraImage) -> Result<(), SecurityError> {
        let threat = self
            .classifier
            .contains_threat(image, self.config.confidence_threshold)?;

        let current = self.repository.alarm_status()?;
        let arming = self.repository.arming_status()?;
        let any_active = self.repository.sensors()?.iter().any(|s| s.active);
        let next = transition::on_image_classified(threat, arming, any_active);
        tracing::debug!(threat, from = %current, to = ?next, "image rule evaluated");

        let previous_threat = self.repository.threat_detected()?;
        self.repository.set_threat_detected(threat)?;
        if let Some(next) = next {
            if let Err(e) = self.repository.set_alarm_status(next) {
                self.undo("restore threat verdict", |r| {
                    r.set_threat_detected(previous_threat)
                });
                return Err(e.into());
            }
            self.record_transition(current, next, TransitionTrigger::ImageProcessed);
        }

        self.notify("threat_detected", |l| l.on_threat_detected(threat));
        if let Some(next) = next {
            self.notify("alarm_status_changed", |l| l.on_alarm_status_changed(next));
        }
        Ok(())
    }

    /// Change the arming mode.
    ///
    /// Disarming forces `NO_ALARM`. Arming resets every active sensor to
    /// inactive without running the sensor rules, then raises `ALARM` if
    /// the last processed image showed a threat. The new arming status is
    /// written last; if any write fails, the earlier ones are reverted.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), SecurityError> {
        let current = self.repository.alarm_status()?;
        let threat = self.repository.threat_detected()?;

        let mut reset: Vec<Sensor> = Vec::new();
        if status.is_armed() {
            for sensor in self.repository.sensors()?.into_iter().filter(|s| s.active) {
                let cleared = sensor.clone().with_active(false);
                if let Err(e) = self.repository.update_sensor(&cleared) {
                    self.restore_sensors(&reset);
                    return Err(e.into());
                }
                reset.push(sensor);
            }
        }

        let next = transition::on_arming_changed(status, threat);
        if let Some((next, _)) = next {
            if let Err(e) = self.repository.set_alarm_status(next) {
                self.restore_sensors(&reset);
                return Err(e.into());
            }
        }

        if let Err(e) = self.repository.set_arming_status(status) {
            if next.is_some() {
                self.undo("restore alarm status", |r| r.set_alarm_status(current));
            }
            self.restore_sensors(&reset);
            return Err(e.into());
        }
        if let Some((next, trigger)) = next {
            self.record_transition(current, next, trigger);
        }
        tracing::info!(arming_status = %status, sensors_reset = reset.len(), "arming status changed");

        if let Some((next, _)) = next {
            self.notify("alarm_status_changed", |l| l.on_alarm_status_changed(next));
        }
        if !reset.is_empty() {
            self.notify("sensor_status_changed", |l| l.on_sensor_status_changed());
        }
        self.notify("arming_status_changed", |l| l.on_arming_status_changed(status));
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Log an alarm status write that has already been persisted.
    fn record_transition(
        &mut self,
        from: AlarmStatus,
        to: AlarmStatus,
        trigger: TransitionTrigger,
    ) {
        let record = AlarmTransition::now(from, to, trigger);
        if record.is_change() {
            tracing::info!(from = %from, to = %to, trigger = %trigger, "alarm status changed");
        } else {
            tracing::debug!(status = %to, trigger = %trigger, "alarm status rewritten");
        }
        self.transitions.push(record);
    }

    /// Revert one write after a later write in the same call failed.
    fn undo(
        &mut self,
        step: &'static str,
        f: impl FnOnce(&mut R) -> Result<(), RepositoryError>,
    ) {
        if let Err(error) = f(&mut self.repository) {
            tracing::error!(step, %error, "rollback failed; stored state may be inconsistent");
        }
    }

    fn restore_sensors(&mut self, sensors: &[Sensor]) {
        for sensor in sensors {
            self.undo("restore sensor", |r| r.update_sensor(sensor));
        }
    }

    fn notify(
        &self,
        event: &'static str,
        f: impl Fn(&dyn StatusListener) -> Result<(), ListenerError>,
    ) {
        for (index, listener) in self.listeners.iter().enumerate() {
            if let Err(error) = f(listener.as_ref()) {
                tracing::warn!(event, listener = index, %error, "status listener failed");
            }
        }
    }
}

/// Handle identity, ignoring vtable pointers.
fn same_listener(a: &Arc<dyn StatusListener>, b: &Arc<dyn StatusListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────
