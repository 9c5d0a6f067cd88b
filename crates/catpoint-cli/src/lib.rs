//! # catpoint-cli — Command-Line Driver
//!
//! Provides the `catpoint` binary. Every invocation opens the JSON state
//! file, runs exactly one [`SecurityService`] entry point, persists the
//! result and prints the status that follows.
//!
//! ## Subcommands
//!
//! - `catpoint status`: Arming status, alarm status and sensors.
//! - `catpoint arm home|away` / `catpoint disarm`: Change the arming mode.
//! - `catpoint sensor add|remove|activate|deactivate`: Sensor registry and
//!   activation.
//! - `catpoint image`: Classify a camera frame.
//!
//! ```bash
//! catpoint sensor add Front door
//! catpoint arm away
//! catpoint sensor activate Front door
//! catpoint -v image porch.jpg --threat true
//! ```
//!
//! The verdict of the last image is kept in the state file, so arming
//! after a cat was seen raises the alarm even in a later invocation.

pub mod arm;
pub mod image;
pub mod sensor;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use catpoint_core::SecurityConfig;
use catpoint_security::{
    ImageClassifier, JsonFileSecurityRepository, SecurityService, TracingStatusListener,
};

/// Default location of the persisted state.
pub const DEFAULT_STATE_FILE: &str = "catpoint-state.json";

/// Service type every subcommand drives.
pub type FileBackedService<C> = SecurityService<JsonFileSecurityRepository, C>;

/// Global options shared by all subcommands.
#[derive(Debug, Clone)]
pub struct Session {
    /// JSON state file.
    pub state: PathBuf,
    /// Tunables loaded from `--config`, or the defaults.
    pub config: SecurityConfig,
}

impl Session {
    /// Resolve the global options. A missing `--config` means defaults.
    pub fn load(state: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => SecurityConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SecurityConfig::default(),
        };
        Ok(Self {
            state: state
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            config,
        })
    }

    /// Open the state file and build a service around it, with a
    /// [`TracingStatusListener`] attached.
    pub fn open<C: ImageClassifier>(&self, classifier: C) -> Result<FileBackedService<C>> {
        let repository = JsonFileSecurityRepository::open(&self.state)
            .with_context(|| format!("opening state file {}", self.state.display()))?;
        tracing::debug!(state = %self.state.display(), "opened state file");

        let mut service = SecurityService::with_config(repository, classifier, self.config.clone());
        service.add_status_listener(Arc::new(TracingStatusListener));
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpoint_core::DEFAULT_CONFIDENCE_THRESHOLD;
    use catpoint_security::FakeImageClassifier;

    #[test]
    fn test_load_defaults() {
        let session = Session::load(None, None).unwrap();
        assert_eq!(session.state, PathBuf::from(DEFAULT_STATE_FILE));
        assert_eq!(
            session.config.confidence_threshold,
            DEFAULT_CONFIDENCE_THRESHOLD
        );
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catpoint.yaml");
        std::fs::write(&path, "confidence_threshold: 80.0\n").unwrap();

        let session = Session::load(Some(&dir.path().join("s.json")), Some(&path)).unwrap();
        assert_eq!(session.config.confidence_threshold, 80.0);
        assert_eq!(session.state, dir.path().join("s.json"));
    }

    #[test]
    fn test_load_rejects_out_of_range_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catpoint.yaml");
        std::fs::write(&path, "confidence_threshold: 140.0\n").unwrap();

        let err = Session::load(None, Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("loading config"));
    }

    #[test]
    fn test_open_attaches_tracing_listener() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(Some(&dir.path().join("s.json")), None).unwrap();
        let service = session.open(FakeImageClassifier::fixed(false)).unwrap();
        assert_eq!(service.listener_count(), 1);
        assert!(service.sensors().unwrap().is_empty());
    }
}
