//! # catpoint CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catpoint_cli::arm::{run_arm, run_disarm, ArmArgs};
use catpoint_cli::image::{run_image, ImageArgs};
use catpoint_cli::sensor::{run_sensor, SensorArgs};
use catpoint_cli::status::{run_status, StatusArgs};
use catpoint_cli::Session;

/// Catpoint home security controller.
///
/// Arms and disarms the installation, registers and trips sensors, and
/// feeds camera frames to the cat detector. State is kept in a JSON file.
#[derive(Parser, Debug)]
#[command(name = "catpoint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON state file [default: catpoint-state.json].
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show arming status, alarm status and sensors.
    Status(StatusArgs),

    /// Arm the system at home or away. Resets every active sensor.
    Arm(ArmArgs),

    /// Disarm the system and clear the alarm.
    Disarm,

    /// Add, remove, activate or deactivate a sensor.
    Sensor(SensorArgs),

    /// Classify a camera frame.
    Image(ImageArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("catpoint CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Session::load(cli.state.as_deref(), cli.config.as_deref()).and_then(|session| {
        match &cli.command {
            Commands::Status(args) => run_status(args, &session),
            Commands::Arm(args) => run_arm(args, &session),
            Commands::Disarm => run_disarm(&session),
            Commands::Sensor(args) => run_sensor(args, &session),
            Commands::Image(args) => run_image(args, &session),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
