//! Application error types

use combat_probe_domain::DomainError;
use thiserror::Error;

use crate::ports::ReportError;

/// Application-level errors.
///
/// A failing assertion or an unreachable endpoint is not an error at this
/// level: both end up in the run results. These variants stop a run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The base URL cannot be used.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A reporter failed to record results.
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
