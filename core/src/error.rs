//! Error taxonomy for schema validation.
//!
//! Every check in the compiler runs eagerly while the smallest enclosing
//! record is built, so the first violation aborts the run. Each variant
//! carries a message naming the offending command or option.

use thiserror::Error;

/// Schema validation errors.
///
/// The `Display` impl provides a human-readable message prefixed with the
/// error class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Casing, character set, or length violation in an identifier.
    #[error("naming error: {0}")]
    Naming(String),
    /// Missing, extra, or misspelled keys; malformed group layout.
    #[error("schema shape error: {0}")]
    SchemaShape(String),
    /// A default value does not match the declared option type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// A name that must be unique was declared twice or is reserved.
    #[error("duplicate: {0}")]
    Duplicate(String),
    /// Malformed arity bounds, empty enum variants, or empty help text.
    #[error("invalid value: {0}")]
    Value(String),
}

/// Convenience alias for results with [`SpecError`].
pub type Result<T> = std::result::Result<T, SpecError>;
