//! # Alarm and Arming Status
//!
//! The two enumerations the alarm state machine reasons about. Both are
//! owned by the repository; only the security service writes them.
//!
//! ```text
//! AlarmStatus:   NO_ALARM ──▶ PENDING_ALARM ──▶ ALARM
//!                    ▲              │   ▲          │
//!                    └──────────────┘   └──────────┘
//!
//! ArmingStatus:  DISARMED | ARMED_HOME | ARMED_AWAY
//! ```
//!
//! Names render and parse in upper snake case (`PENDING_ALARM`). Parsing is
//! case-insensitive and accepts `-` in place of `_`; anything else is
//! rejected with [`CatpointError::InvalidArgument`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatpointError;

/// Current escalation level of the alarm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    /// Nothing is wrong.
    #[default]
    NoAlarm,
    /// One trigger seen; waiting for confirmation or clearance.
    PendingAlarm,
    /// The alarm is sounding.
    Alarm,
}

impl AlarmStatus {
    /// All alarm statuses in escalation order.
    pub fn all() -> &'static [AlarmStatus] {
        &[Self::NoAlarm, Self::PendingAlarm, Self::Alarm]
    }

    /// Returns the upper snake case name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAlarm => "NO_ALARM",
            Self::PendingAlarm => "PENDING_ALARM",
            Self::Alarm => "ALARM",
        }
    }

    /// Human readable description, as shown on a control panel.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoAlarm => "Cool and Good",
            Self::PendingAlarm => "I'm in Danger...",
            Self::Alarm => "Awooga!",
        }
    }
}

impl std::fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmStatus {
    type Err = CatpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "NO_ALARM" => Ok(Self::NoAlarm),
            "PENDING_ALARM" => Ok(Self::PendingAlarm),
            "ALARM" => Ok(Self::Alarm),
            _ => Err(CatpointError::InvalidArgument(format!(
                "unknown alarm status: {s:?}"
            ))),
        }
    }
}

/// Operating mode of the security system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    /// System is off; sensors and camera cannot raise an alarm.
    #[default]
    Disarmed,
    /// Armed while occupants are home.
    ArmedHome,
    /// Armed while the house is empty.
    ArmedAway,
}

impl ArmingStatus {
    /// All arming statuses.
    pub fn all() -> &'static [ArmingStatus] {
        &[Self::Disarmed, Self::ArmedHome, Self::ArmedAway]
    }

    /// Whether this is one of the armed modes.
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::ArmedHome | Self::ArmedAway)
    }

    /// Returns the upper snake case name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disarmed => "DISARMED",
            Self::ArmedHome => "ARMED_HOME",
            Self::ArmedAway => "ARMED_AWAY",
        }
    }

    /// Human readable description, as shown on a control panel.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Disarmed => "Disarmed",
            Self::ArmedHome => "Armed - At Home",
            Self::ArmedAway => "Armed - Away",
        }
    }
}

impl std::fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmingStatus {
    type Err = CatpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "DISARMED" => Ok(Self::Disarmed),
            "ARMED_HOME" => Ok(Self::ArmedHome),
            "ARMED_AWAY" => Ok(Self::ArmedAway),
            _ => Err(CatpointError::InvalidArgument(format!(
                "unknown arming status: {s:?}"
            ))),
        }
    }
}

/// Upper-case and map `-` to `_` so `armed-home` parses as `ARMED_HOME`.
pub(crate) fn normalize(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}
