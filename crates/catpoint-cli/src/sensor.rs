//! # Sensor Subcommand
//!
//! Registry and activation commands for door, window and motion sensors.
//! A sensor is addressed by name and type, e.g. `catpoint sensor activate
//! Front door`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use catpoint_core::{Sensor, SensorType};
use catpoint_security::{FakeImageClassifier, ImageClassifier};

use crate::status::StatusReport;
use crate::{FileBackedService, Session};

/// Arguments for the `catpoint sensor` subcommand.
#[derive(Args, Debug)]
pub struct SensorArgs {
    #[command(subcommand)]
    pub command: SensorCommand,
}

/// Name and type identifying one sensor.
#[derive(Args, Debug, Clone)]
pub struct SensorRef {
    /// Sensor name, e.g. "Front".
    pub name: String,
    /// Sensor type: door, window or motion.
    pub sensor_type: SensorType,
}

impl SensorRef {
    fn to_sensor(&self) -> Result<Sensor> {
        Ok(Sensor::new(self.name.as_str(), self.sensor_type)?)
    }
}

/// Sensor subcommands.
#[derive(Subcommand, Debug)]
pub enum SensorCommand {
    /// Register a new, inactive sensor.
    Add(SensorRef),
    /// Unregister a sensor.
    Remove(SensorRef),
    /// Report the sensor as triggered.
    Activate(SensorRef),
    /// Report the sensor as back to rest.
    Deactivate(SensorRef),
}

/// Execute the sensor subcommand.
pub fn run_sensor(args: &SensorArgs, session: &Session) -> Result<u8> {
    let mut service = session.open(FakeImageClassifier::default())?;

    match &args.command {
        SensorCommand::Add(target) => {
            let sensor = target.to_sensor()?;
            if find(&service, &sensor)?.is_some() {
                bail!("sensor {} is already registered", sensor.id);
            }
            service.add_sensor(sensor)?;
        }
        SensorCommand::Remove(target) => {
            let sensor = target.to_sensor()?;
            if !service.remove_sensor(&sensor)? {
                bail!("no sensor {} is registered", sensor.id);
            }
        }
        SensorCommand::Activate(target) => set_active(&mut service, target, true)?,
        SensorCommand::Deactivate(target) => set_active(&mut service, target, false)?,
    }

    StatusReport::collect(&service)?.print(false)?;
    Ok(0)
}

/// Activation acts on the stored sensor so that its current flag is known.
fn set_active<C: ImageClassifier>(
    service: &mut FileBackedService<C>,
    target: &SensorRef,
    active: bool,
) -> Result<()> {
    let probe = target.to_sensor()?;
    let Some(mut sensor) = find(service, &probe)? else {
        bail!(
            "no sensor {} is registered; add it with `catpoint sensor add {} {}`",
            probe.id,
            target.name,
            target.sensor_type.as_str().to_lowercase()
        );
    };
    service.change_sensor_activation_status(&mut sensor, active)?;
    tracing::debug!(sensor = %sensor, "sensor updated");
    Ok(())
}

fn find<C: ImageClassifier>(
    service: &FileBackedService<C>,
    probe: &Sensor,
) -> Result<Option<Sensor>> {
    Ok(service.sensors()?.into_iter().find(|s| s == probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpoint_core::{AlarmStatus, ArmingStatus};
    use catpoint_security::{JsonFileSecurityRepository, SecurityRepository};

    fn session(dir: &tempfile::TempDir) -> Session {
        Session::load(Some(&dir.path().join("state.json")), None).unwrap()
    }

    fn front() -> SensorRef {
        SensorRef {
            name: "Front".to_string(),
            sensor_type: SensorType::Door,
        }
    }

    fn run(s: &Session, command: SensorCommand) -> Result<u8> {
        run_sensor(&SensorArgs { command }, s)
    }

    fn reopen(s: &Session) -> JsonFileSecurityRepository {
        JsonFileSecurityRepository::open(&s.state).unwrap()
    }

    #[test]
    fn test_add_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);

        run(&s, SensorCommand::Add(front())).unwrap();
        let sensors = reopen(&s).sensors().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].name(), "Front");
        assert!(!sensors[0].active);

        run(&s, SensorCommand::Remove(front())).unwrap();
        assert!(reopen(&s).sensors().unwrap().is_empty());
    }

    #[test]
    fn test_add_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);
        run(&s, SensorCommand::Add(front())).unwrap();
        let err = run(&s, SensorCommand::Add(front())).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_remove_unknown_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&session(&dir), SensorCommand::Remove(front())).unwrap_err();
        assert!(err.to_string().contains("DOOR:Front"));
    }

    #[test]
    fn test_activate_unknown_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&session(&dir), SensorCommand::Activate(front())).unwrap_err();
        assert!(err.to_string().contains("catpoint sensor add Front door"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blank = SensorRef {
            name: "  ".to_string(),
            sensor_type: SensorType::Motion,
        };
        assert!(run(&session(&dir), SensorCommand::Add(blank)).is_err());
    }

    #[test]
    fn test_activation_escalates_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);
        run(&s, SensorCommand::Add(front())).unwrap();
        {
            let mut repo = reopen(&s);
            repo.set_arming_status(ArmingStatus::ArmedAway).unwrap();
        }

        run(&s, SensorCommand::Activate(front())).unwrap();
        assert_eq!(
            reopen(&s).alarm_status().unwrap(),
            AlarmStatus::PendingAlarm
        );
        assert!(reopen(&s).sensors().unwrap()[0].active);

        run(&s, SensorCommand::Deactivate(front())).unwrap();
        assert_eq!(reopen(&s).alarm_status().unwrap(), AlarmStatus::NoAlarm);
        assert!(!reopen(&s).sensors().unwrap()[0].active);
    }
}
