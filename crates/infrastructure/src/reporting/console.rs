//! Plain-text reporter.

use std::io::Write;

use combat_probe_application::ports::{ReportError, Reporter};
use combat_probe_domain::{CaseOutcome, CaseResult, SuiteResults, TestSuite};

/// Writes a human-readable line per case and a summary at the end.
///
/// ```text
/// Running "D&D Combat API" against https://api.example.com (10 cases)
///
/// characters
///   ✔ Validates a character with correct data [200, 84ms]
///   ✘ Rejects a character with incomplete data [500, 61ms]
///       - Status code = 400: Expected status = 400, got 500
///   ! Rejects a character with negative strength [request timed out after 90000ms]
///
/// 3 cases: 1 passed, 1 failed, 1 errored (33.3%) in 90.2s
/// ```
pub struct ConsoleReporter<W: Write> {
    out: W,
    current_group: Option<String>,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            current_group: None,
        }
    }

    /// Consumes the reporter and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn suite_started(&mut self, suite: &TestSuite, base_url: &str) -> Result<(), ReportError> {
        self.current_group = None;
        writeln!(
            self.out,
            "Running \"{}\" against {base_url} ({} cases)",
            suite.name,
            suite.len()
        )?;
        Ok(())
    }

    fn case_finished(&mut self, result: &CaseResult) -> Result<(), ReportError> {
        if self.current_group.as_deref() != Some(result.group.as_str()) {
            writeln!(self.out)?;
            writeln!(self.out, "{}", result.group)?;
            self.current_group = Some(result.group.clone());
        }

        match result.outcome {
            CaseOutcome::Passed | CaseOutcome::Failed => {
                let marker = if result.outcome.is_passed() { '✔' } else { '✘' };
                let status = result
                    .status
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                writeln!(
                    self.out,
                    "  {marker} {} [{status}, {}ms]",
                    result.name, result.duration_ms
                )?;
                for failure in result.failures() {
                    let reason = failure.error.as_deref().unwrap_or("failed");
                    writeln!(self.out, "      - {}: {reason}", failure.description)?;
                }
            }
            CaseOutcome::Errored => {
                let reason = result.error.as_deref().unwrap_or("no response");
                writeln!(self.out, "  ! {} [{reason}]", result.name)?;
            }
        }
        Ok(())
    }

    fn suite_finished(&mut self, results: &SuiteResults) -> Result<(), ReportError> {
        writeln!(self.out)?;
        #[allow(clippy::cast_precision_loss)]
        let seconds = results.duration_ms as f64 / 1000.0;
        writeln!(
            self.out,
            "{} cases: {} passed, {} failed, {} errored ({:.1}%) in {seconds:.1}s",
            results.total,
            results.passed,
            results.failed,
            results.errored,
            results.pass_rate(),
        )?;
        self.out.flush()?;
        Ok(())
    }
}
