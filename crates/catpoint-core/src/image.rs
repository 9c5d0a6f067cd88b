//! # Camera Images
//!
//! The controller never decodes pictures; it only forwards them to an
//! image classifier. `CameraImage` is therefore an opaque byte payload.

use serde::{Deserialize, Serialize};

/// An encoded camera frame (PNG, JPEG, ...) awaiting classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraImage {
    bytes: Vec<u8>,
}

impl CameraImage {
    /// Wrap encoded image bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read an image from disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::CatpointError> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// The raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for CameraImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
