//! # Alarm Transition Rules
//!
//! Pure functions that map the current alarm status plus one input to the
//! next alarm status, and the record appended to the transition log when
//! the service writes a status.
//!
//! Every function returns `None` when the input must leave the alarm
//! status untouched, so callers can skip the repository write entirely.

use serde::{Deserialize, Serialize};

use catpoint_core::{AlarmStatus, ArmingStatus, Timestamp};

// ─── Triggers ────────────────────────────────────────────────────────

/// Which rule produced an alarm status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionTrigger {
    /// A sensor was activated (or re-activated).
    SensorActivated,
    /// An active sensor was deactivated.
    SensorDeactivated,
    /// A camera image was classified.
    ImageProcessed,
    /// The system was disarmed.
    Disarmed,
    /// The system was armed while the last image showed a threat.
    ArmedWithThreat,
}

impl TransitionTrigger {
    /// Returns the snake_case identifier for this trigger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SensorActivated => "sensor_activated",
            Self::SensorDeactivated => "sensor_deactivated",
            Self::ImageProcessed => "image_processed",
            Self::Disarmed => "disarmed",
            Self::ArmedWithThreat => "armed_with_threat",
        }
    }
}

impl std::fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of one alarm status write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTransition {
    /// Status before the write.
    pub from: AlarmStatus,
    /// Status written.
    pub to: AlarmStatus,
    /// Rule that caused the write.
    pub trigger: TransitionTrigger,
    /// When the write happened.
    pub at: Timestamp,
}

impl AlarmTransition {
    /// Stamp a new record with the current time.
    pub fn now(from: AlarmStatus, to: AlarmStatus, trigger: TransitionTrigger) -> Self {
        Self {
            from,
            to,
            trigger,
            at: Timestamp::now(),
        }
    }

    /// Whether the write actually changed the status.
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

// ─── Rules ───────────────────────────────────────────────────────────

/// A sensor reports active.
///
/// Escalates one level while armed; `ALARM` is sticky and a disarmed system
/// ignores sensors.
pub fn on_sensor_activated(current: AlarmStatus, arming: ArmingStatus) -> Option<AlarmStatus> {
    if !arming.is_armed() {
        return None;
    }
    match current {
        AlarmStatus::NoAlarm => Some(AlarmStatus::PendingAlarm),
        AlarmStatus::PendingAlarm => Some(AlarmStatus::Alarm),
        AlarmStatus::Alarm => None,
    }
}

/// A previously active sensor reports inactive.
///
/// `others_active` is whether any *other* registered sensor is still active.
pub fn on_sensor_deactivated(current: AlarmStatus, others_active: bool) -> Option<AlarmStatus> {
    match current {
        AlarmStatus::PendingAlarm if !others_active => Some(AlarmStatus::NoAlarm),
        AlarmStatus::PendingAlarm => None,
        AlarmStatus::Alarm => Some(AlarmStatus::PendingAlarm),
        AlarmStatus::NoAlarm => None,
    }
}

/// A classified camera image.
///
/// A threat while armed forces `ALARM` whatever the sensors say. A clear
/// image resets to `NO_ALARM` only when no sensor is active.
pub fn on_image_classified(
    threat: bool,
    arming: ArmingStatus,
    any_sensor_active: bool,
) -> Option<AlarmStatus> {
    if threat {
        arming.is_armed().then_some(AlarmStatus::Alarm)
    } else {
        (!any_sensor_active).then_some(AlarmStatus::NoAlarm)
    }
}

/// The arming mode changes.
///
/// Disarming always clears the alarm. Arming raises `ALARM` only when the
/// last processed image showed a threat.
pub fn on_arming_changed(
    arming: ArmingStatus,
    threat_on_camera: bool,
) -> Option<(AlarmStatus, TransitionTrigger)> {
    if !arming.is_armed() {
        return Some((AlarmStatus::NoAlarm, TransitionTrigger::Disarmed));
    }
    threat_on_camera.then_some((AlarmStatus::Alarm, TransitionTrigger::ArmedWithThreat))
}

// ─── Tests ───────────────────────────────────────────────────────────
