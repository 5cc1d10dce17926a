//! Reporter port

use combat_probe_domain::{CaseResult, SuiteResults, TestSuite};
use thiserror::Error;

/// Errors a reporter can raise while writing output.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Results could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Port receiving run events as they happen.
///
/// Events arrive in order: one `suite_started`, one `case_finished` per case
/// actually run, then one `suite_finished`.
pub trait Reporter {
    /// Called before the first case runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the reporter cannot write its output.
    fn suite_started(&mut self, suite: &TestSuite, base_url: &str) -> Result<(), ReportError>;

    /// Called after each case.
    ///
    /// # Errors
    ///
    /// Returns an error if the reporter cannot write its output.
    fn case_finished(&mut self, result: &CaseResult) -> Result<(), ReportError>;

    /// Called once the run is over.
    ///
    /// # Errors
    ///
    /// Returns an error if the reporter cannot write its output.
    fn suite_finished(&mut self, results: &SuiteResults) -> Result<(), ReportError>;
}
