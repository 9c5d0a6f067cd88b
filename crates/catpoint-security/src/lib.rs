//! # catpoint-security — The Alarm State Machine
//!
//! Derives the overall alarm status of a home installation from three
//! independent inputs: sensor activations, the arming mode, and periodic
//! camera images classified for intruders.
//!
//! ## Modules
//!
//! - **Service** ([`service`]): [`SecurityService`], the only component with
//!   decision logic. Three entry points (`change_sensor_activation_status`,
//!   `process_image`, `set_arming_status`) read state through the repository,
//!   apply the transition rules, write the result back, then notify listeners.
//!
//! - **Transition** ([`transition`]): the pure alarm rules and the
//!   [`AlarmTransition`] log record.
//!
//! - **Repository** ([`repository`]): the [`SecurityRepository`] trait plus an
//!   in-memory and a JSON-file implementation.
//!
//! - **Classifier** ([`classifier`]): the [`ImageClassifier`] trait plus a
//!   randomised stand-in.
//!
//! - **Listener** ([`listener`]): the [`StatusListener`] trait plus a
//!   `tracing` logger and a recorder.
//!
//! ## Alarm Transitions
//!
//! ```text
//! NO_ALARM      ── sensor activates (armed) ──────────▶ PENDING_ALARM
//! PENDING_ALARM ── any sensor activates ──────────────▶ ALARM
//! PENDING_ALARM ── last active sensor deactivates ────▶ NO_ALARM
//! ALARM         ── sensor deactivates ────────────────▶ PENDING_ALARM
//! any           ── threat image while armed ──────────▶ ALARM
//! any           ── clear image, no sensor active ─────▶ NO_ALARM
//! any           ── disarm ────────────────────────────▶ NO_ALARM
//! any           ── arm after a threat image ──────────▶ ALARM
//! ```
//!
//! ## Concurrency
//!
//! Entry points take `&mut self`. The service performs no locking; a
//! multi-threaded host wraps the whole service in a `Mutex`.

pub mod classifier;
pub mod listener;
pub mod repository;
pub mod service;
pub mod transition;

pub use classifier::{ClassifierError, FakeImageClassifier, ImageClassifier};
pub use listener::{
    ListenerError, RecordingStatusListener, StatusEvent, StatusListener, TracingStatusListener,
};
pub use repository::{
    InMemorySecurityRepository, JsonFileSecurityRepository, RepositoryError, SecurityRepository,
    SecuritySnapshot,
};
pub use service::{SecurityError, SecurityService};
pub use transition::{AlarmTransition, TransitionTrigger};
