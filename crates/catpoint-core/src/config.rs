//! # Service Configuration
//!
//! Tunables for the security service, loaded from YAML. Every field is
//! optional in the document; missing fields take their defaults.
//!
//! ```yaml
//! confidence_threshold: 50.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatpointError;

/// Confidence (percent) an image classifier must reach before it reports a
/// threat.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Configuration for the security service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// Classifier confidence threshold in percent, `0.0..=100.0`.
    pub confidence_threshold: f32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl SecurityConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, CatpointError> {
        // An empty document parses as YAML null; treat it as all defaults.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(s).map_err(|e| CatpointError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatpointError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            CatpointError::Config(msg) => {
                CatpointError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), CatpointError> {
        let t = self.confidence_threshold;
        if !t.is_finite() || !(0.0..=100.0).contains(&t) {
            return Err(CatpointError::InvalidArgument(format!(
                "confidence_threshold must be within 0..=100, got {t}"
            )));
        }
        Ok(())
    }
}
