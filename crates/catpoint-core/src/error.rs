//! # Error Types
//!
//! Defines the error type shared by the domain primitives. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Collaborator-specific failures (repository, classifier, listener) live
//! next to their traits in `catpoint-security`.

use thiserror::Error;

/// Top-level error type for the Catpoint domain primitives.
#[derive(Error, Debug)]
pub enum CatpointError {
    /// A value outside an enumerated or numeric domain was supplied.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
