//! Error types for loading schemas and writing generated files.
//!
//! Wraps I/O and serialization failures together with the compiler's own
//! [`SpecError`] so callers deal with a single error type.

use argspec_core::SpecError;
use thiserror::Error;

/// Errors that can occur while loading inputs or writing artifacts.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A path that cannot be used as an input (missing, wrong extension).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The schema itself failed validation.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
