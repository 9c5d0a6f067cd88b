//! # Status Listeners
//!
//! Presentation layers subscribe to the service through [`StatusListener`].
//! Notifications are synchronous and happen after the repository has been
//! written. A listener that returns an error is logged and skipped; the
//! remaining listeners are still notified.

use std::sync::Mutex;

use thiserror::Error;

use catpoint_core::{AlarmStatus, ArmingStatus};

/// Error returned by a listener. Never propagated out of the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener could not handle the notification.
    #[error("listener failed: {0}")]
    Failed(String),
}

/// Observer of security status changes.
pub trait StatusListener: Send + Sync {
    /// The alarm status was written.
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), ListenerError>;

    /// One or more sensors were added, removed, activated or reset.
    fn on_sensor_status_changed(&self) -> Result<(), ListenerError> {
        Ok(())
    }

    /// The arming status was written.
    fn on_arming_status_changed(&self, _status: ArmingStatus) -> Result<(), ListenerError> {
        Ok(())
    }

    /// A camera image was classified.
    fn on_threat_detected(&self, _detected: bool) -> Result<(), ListenerError> {
        Ok(())
    }
}

/// Logs every notification through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatusListener;

impl StatusListener for TracingStatusListener {
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), ListenerError> {
        tracing::info!(alarm_status = %status, "{}", status.description());
        Ok(())
    }

    fn on_sensor_status_changed(&self) -> Result<(), ListenerError> {
        tracing::debug!("sensor status changed");
        Ok(())
    }

    fn on_arming_status_changed(&self, status: ArmingStatus) -> Result<(), ListenerError> {
        tracing::info!(arming_status = %status, "{}", status.description());
        Ok(())
    }

    fn on_threat_detected(&self, detected: bool) -> Result<(), ListenerError> {
        if detected {
            tracing::warn!("camera reports a cat");
        } else {
            tracing::info!("camera is clear");
        }
        Ok(())
    }
}

/// One notification received by a [`RecordingStatusListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// `on_alarm_status_changed`.
    AlarmStatus(AlarmStatus),
    /// `on_sensor_status_changed`.
    SensorsChanged,
    /// `on_arming_status_changed`.
    ArmingStatus(ArmingStatus),
    /// `on_threat_detected`.
    ThreatDetected(bool),
}

/// Listener that records every notification in order.
///
/// Used when callers only need to observe what was announced; also useful
/// in tests.
#[derive(Debug, Default)]
pub struct RecordingStatusListener {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingStatusListener {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    pub fn events(&self) -> Vec<StatusEvent> {
        self.lock().clone()
    }

    /// Alarm statuses received so far, in order.
    pub fn alarm_statuses(&self) -> Vec<AlarmStatus> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                StatusEvent::AlarmStatus(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, event: StatusEvent) -> Result<(), ListenerError> {
        self.lock().push(event);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StatusEvent>> {
        // A poisoned recorder still holds valid events.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StatusListener for RecordingStatusListener {
    fn on_alarm_status_changed(&self, status: AlarmStatus) -> Result<(), ListenerError> {
        self.push(StatusEvent::AlarmStatus(status))
    }

    fn on_sensor_status_changed(&self) -> Result<(), ListenerError> {
        self.push(StatusEvent::SensorsChanged)
    }

    fn on_arming_status_changed(&self, status: ArmingStatus) -> Result<(), ListenerError> {
        self.push(StatusEvent::ArmingStatus(status))
    }

    fn on_threat_detected(&self, detected: bool) -> Result<(), ListenerError> {
        self.push(StatusEvent::ThreatDetected(detected))
    }
}
