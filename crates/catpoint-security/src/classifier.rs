//! # Image Classification
//!
//! The service asks one question of a camera frame: does it show an
//! intruder with at least the configured confidence? [`ImageClassifier`] is
//! that capability. Real deployments back it with a vision service;
//! [`FakeImageClassifier`] stands in for one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use catpoint_core::CameraImage;

/// Errors raised by an image classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Classification backend is not reachable.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// The image could not be analysed.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Threat classification capability.
pub trait ImageClassifier {
    /// Whether `image` shows a threat with confidence of at least
    /// `confidence_threshold` percent.
    fn contains_threat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ClassifierError>;
}

/// Stand-in classifier: a coin flip, or a fixed verdict.
///
/// Empty images are rejected so that callers exercise the error path the
/// same way a real backend would.
#[derive(Debug, Clone)]
pub struct FakeImageClassifier {
    rng: StdRng,
    verdict: Option<bool>,
}

impl FakeImageClassifier {
    /// Random verdicts from an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            verdict: None,
        }
    }

    /// Random verdicts from a fixed seed (reproducible).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            verdict: None,
        }
    }

    /// Always answer `verdict`.
    pub fn fixed(verdict: bool) -> Self {
        Self {
            rng: StdRng::seed_from_u64(0),
            verdict: Some(verdict),
        }
    }
}

impl Default for FakeImageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageClassifier for FakeImageClassifier {
    fn contains_threat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ClassifierError> {
        if image.is_empty() {
            return Err(ClassifierError::InvalidImage("image has no data".into()));
        }
        let verdict = match self.verdict {
            Some(v) => v,
            None => self.rng.gen_bool(0.5),
        };
        tracing::debug!(
            bytes = image.len(),
            confidence_threshold,
            verdict,
            "fake classifier verdict"
        );
        Ok(verdict)
    }
}
