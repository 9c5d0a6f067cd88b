//! # Status Subcommand
//!
//! Prints the persisted state. Every other subcommand finishes by printing
//! the same report.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use catpoint_core::{AlarmStatus, ArmingStatus, Sensor};
use catpoint_security::{
    FakeImageClassifier, ImageClassifier, SecurityRepository, SecurityService,
};

use crate::Session;

/// Arguments for the `catpoint status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Current state of the installation as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub arming_status: ArmingStatus,
    pub alarm_status: AlarmStatus,
    pub sensors: Vec<Sensor>,
}

impl StatusReport {
    /// Read the report through the service.
    pub fn collect<R: SecurityRepository, C: ImageClassifier>(
        service: &SecurityService<R, C>,
    ) -> Result<Self> {
        Ok(Self {
            arming_status: service.arming_status()?,
            alarm_status: service.alarm_status()?,
            sensors: service.sensors()?,
        })
    }

    /// Human-readable rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Arming: {} ({})",
            self.arming_status,
            self.arming_status.description()
        );
        let _ = writeln!(
            out,
            "Alarm:  {} ({})",
            self.alarm_status,
            self.alarm_status.description()
        );
        if self.sensors.is_empty() {
            out.push_str("Sensors: none\n");
        } else {
            out.push_str("Sensors:\n");
            for sensor in &self.sensors {
                let _ = writeln!(out, "  {sensor}");
            }
        }
        out
    }

    /// Print to stdout, as text or JSON.
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            print!("{}", self.render());
        }
        Ok(())
    }
}

/// Execute the status subcommand.
pub fn run_status(args: &StatusArgs, session: &Session) -> Result<u8> {
    let service = session.open(FakeImageClassifier::default())?;
    StatusReport::collect(&service)?.print(args.json)?;
    Ok(0)
}
