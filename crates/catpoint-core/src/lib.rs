//! # catpoint-core — Foundational Types for the Catpoint Controller
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: the sensors a home installation registers, the two status
//! enums the alarm state machine reads and writes, the opaque camera image
//! handed to a classifier, and the service configuration.
//!
//! ## Key Design Principles
//!
//! 1. **Identity is a newtype.** A sensor is identified by [`SensorId`]
//!    (name + type). Equality, hashing and ordering of [`Sensor`] go through
//!    the id, never through the mutable `active` flag.
//!
//! 2. **Closed enums for status.** [`AlarmStatus`] and [`ArmingStatus`] have
//!    exactly three variants each. Parsing an unknown name is an
//!    [`CatpointError::InvalidArgument`], never a silent default.
//!
//! 3. **UTC timestamps.** [`Timestamp`] is seconds-precision UTC, used for
//!    the alarm transition log.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `catpoint-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod image;
pub mod sensor;
pub mod status;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use config::{SecurityConfig, DEFAULT_CONFIDENCE_THRESHOLD};
pub use error::CatpointError;
pub use image::CameraImage;
pub use sensor::{Sensor, SensorId, SensorType};
pub use status::{AlarmStatus, ArmingStatus};
pub use temporal::Timestamp;
