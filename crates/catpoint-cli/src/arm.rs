//! # Arm / Disarm Subcommands
//!
//! Change the arming mode. Arming resets every active sensor; disarming
//! clears the alarm.

use anyhow::Result;
use clap::{Args, ValueEnum};

use catpoint_core::ArmingStatus;
use catpoint_security::FakeImageClassifier;

use crate::status::StatusReport;
use crate::Session;

/// Armed mode selected on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmMode {
    /// Occupants are home; perimeter sensors armed.
    Home,
    /// Nobody is home.
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

/// Arguments for the `catpoint arm` subcommand.
#[derive(Args, Debug)]
pub struct ArmArgs {
    /// Armed mode.
    #[arg(value_enum)]
    pub mode: ArmMode,
}

/// Execute `catpoint arm`.
pub fn run_arm(args: &ArmArgs, session: &Session) -> Result<u8> {
    set_arming(session, args.mode.into())
}

/// Execute `catpoint disarm`.
pub fn run_disarm(session: &Session) -> Result<u8> {
    set_arming(session, ArmingStatus::Disarmed)
}

fn set_arming(session: &Session, status: ArmingStatus) -> Result<u8> {
    let mut service = session.open(FakeImageClassifier::default())?;
    service.set_arming_status(status)?;
    StatusReport::collect(&service)?.print(false)?;
    Ok(0)
}
