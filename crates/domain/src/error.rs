//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A field casing name could not be parsed.
    #[error("unknown field casing: {0}")]
    UnknownCasing(String),

    /// An unknown-monster status policy could not be parsed.
    #[error("unknown monster status policy: {0}")]
    UnknownStatusPolicy(String),

    /// A settings value is out of range.
    #[error("invalid setting '{field}': {reason}")]
    InvalidSetting {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
