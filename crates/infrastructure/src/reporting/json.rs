//! JSON file reporter.

use std::fs;
use std::path::{Path, PathBuf};

use combat_probe_application::ports::{ReportError, Reporter};
use combat_probe_domain::{CaseResult, SuiteResults, TestSuite};
use tracing::info;

use crate::serialization::to_json_stable;

/// Writes the complete run results as JSON once the suite ends.
///
/// Parent directories are created as needed; an existing file is replaced.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    /// Creates a reporter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination of the report.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Reporter for JsonReporter {
    fn suite_started(&mut self, _suite: &TestSuite, _base_url: &str) -> Result<(), ReportError> {
        Ok(())
    }

    fn case_finished(&mut self, _result: &CaseResult) -> Result<(), ReportError> {
        Ok(())
    }

    fn suite_finished(&mut self, results: &SuiteResults) -> Result<(), ReportError> {
        let json =
            to_json_stable(results).map_err(|e| ReportError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "wrote JSON report");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use combat_probe_domain::request::RequestSpec;
    use combat_probe_domain::{CaseOutcome, TestCase};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writes_report_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/run.json");
        let case = TestCase::new("example", "Template", RequestSpec::get("/api/characters/example"));
        let results = SuiteResults::new(
            "D&D Combat API",
            "http://api.test",
            Utc::now(),
            vec![CaseResult::completed(&case, "http://api.test/api/characters/example", 200, vec![], 5)],
            5,
        );

        let mut reporter = JsonReporter::new(&path);
        reporter.suite_started(&TestSuite::new("D&D Combat API"), "http://api.test").unwrap();
        reporter.suite_finished(&results).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        let parsed: SuiteResults = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, results);
        assert_eq!(parsed.cases[0].outcome, CaseOutcome::Passed);
    }

    #[test]
    fn test_unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let results = SuiteResults::new("s", "http://api.test", Utc::now(), vec![], 0);
        let mut reporter = JsonReporter::new(blocker.join("run.json"));
        let err = reporter.suite_finished(&results).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
