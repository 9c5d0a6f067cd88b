//! # Image Subcommand
//!
//! Classifies a camera frame with the stand-in classifier and applies the
//! verdict. `--threat` pins the verdict; `--seed` makes the random verdict
//! reproducible.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use catpoint_core::CameraImage;
use catpoint_security::FakeImageClassifier;

use crate::status::StatusReport;
use crate::Session;

/// Arguments for the `catpoint image` subcommand.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Camera frame to classify.
    pub file: PathBuf,

    /// Force the classifier verdict instead of guessing.
    #[arg(long)]
    pub threat: Option<bool>,

    /// Seed for the random verdict. Ignored with `--threat`.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ImageArgs {
    fn classifier(&self) -> FakeImageClassifier {
        match (self.threat, self.seed) {
            (Some(verdict), _) => FakeImageClassifier::fixed(verdict),
            (None, Some(seed)) => FakeImageClassifier::seeded(seed),
            (None, None) => FakeImageClassifier::new(),
        }
    }
}

/// Execute the image subcommand.
pub fn run_image(args: &ImageArgs, session: &Session) -> Result<u8> {
    let image = CameraImage::from_file(&args.file)
        .with_context(|| format!("reading image {}", args.file.display()))?;

    let mut service = session.open(args.classifier())?;
    service.process_image(&image)?;

    if service.threat_detected()? {
        println!("Cat detected in {}", args.file.display());
    } else {
        println!("No cat in {}", args.file.display());
    }
    StatusReport::collect(&service)?.print(false)?;
    Ok(0)
}
