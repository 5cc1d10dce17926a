//! Fan-out reporter.

use combat_probe_application::ports::{ReportError, Reporter};
use combat_probe_domain::{CaseResult, SuiteResults, TestSuite};

/// Forwards every event to each inner reporter, in order. The first error
/// stops the fan-out for that event.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter (builder pattern).
    #[must_use]
    pub fn with(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    /// Number of inner reporters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// Returns true if there are no inner reporters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for MultiReporter {
    fn suite_started(&mut self, suite: &TestSuite, base_url: &str) -> Result<(), ReportError> {
        self.reporters
            .iter_mut()
            .try_for_each(|r| r.suite_started(suite, base_url))
    }

    fn case_finished(&mut self, result: &CaseResult) -> Result<(), ReportError> {
        self.reporters
            .iter_mut()
            .try_for_each(|r| r.case_finished(result))
    }

    fn suite_finished(&mut self, results: &SuiteResults) -> Result<(), ReportError> {
        self.reporters
            .iter_mut()
            .try_for_each(|r| r.suite_finished(results))
    }
}
