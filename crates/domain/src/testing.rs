//! Test cases, assertions and results.
//!
//! A [`TestSuite`] is an ordered list of [`TestCase`]s. Each case issues one
//! request and checks the response against its [`Assertion`]s. Running a
//! suite produces [`SuiteResults`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::request::{HttpMethod, RequestSpec};

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code, range or set.
        expected: StatusExpectation,
    },
    /// Check the raw body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// Check the raw body matches a regex.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// Check the body is JSON valid against a JSON Schema.
    JsonSchema {
        /// The schema document.
        schema: Value,
    },
    /// Check the body is JSON deep-equal to a value.
    JsonEquals {
        /// Expected JSON value.
        expected: Value,
    },
    /// Check a JSON path exists and optionally its value.
    JsonPath {
        /// Path expression (e.g., "$.monsters[0]").
        path: String,
        /// Expected value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<Value>,
    },
    /// Check a header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Expected exact value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Check the Content-Type header contains a string.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check the body is valid JSON.
    IsJson,
}

impl Assertion {
    /// Expect an exact status code.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Expect the body to contain `text` (case-sensitive).
    #[must_use]
    pub fn body_contains(text: impl Into<String>) -> Self {
        Self::BodyContains {
            text: text.into(),
            ignore_case: false,
        }
    }

    /// Expect the JSON value at `path` to equal `expected`.
    #[must_use]
    pub fn json_path_eq(path: impl Into<String>, expected: Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("Body matches /{pattern}/"),
            Self::JsonSchema { .. } => "Body matches JSON schema".to_string(),
            Self::JsonEquals { .. } => "Body equals expected JSON".to_string(),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
            Self::IsJson => "Body is valid JSON".to_string(),
        }
    }
}

/// Expected status code value, range or set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Description of the assertion that was run.
    pub description: String,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(assertion: &Assertion) -> Self {
        Self {
            description: assertion.description(),
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: &Assertion, actual: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::pass(assertion)
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: &Assertion, error: impl Into<String>) -> Self {
        Self {
            description: assertion.description(),
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: &Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }
}

/// One request plus the checks to run on its response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    /// Case name, shown in reports.
    pub name: String,
    /// Group the case belongs to (e.g., "monsters").
    #[serde(default)]
    pub group: String,
    /// The request to issue.
    pub request: RequestSpec,
    /// Assertions to run on the response.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl TestCase {
    /// Create a case with no assertions.
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            request,
            assertions: Vec::new(),
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }
}

/// An ordered collection of test cases.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Suite name.
    pub name: String,
    /// Cases, run in this order.
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// Whether to skip remaining cases after the first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add a case to the suite.
    pub fn add(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// Add a case (builder pattern).
    #[must_use]
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Keep only the cases whose group matches one of `groups`
    /// (case-insensitive). An empty filter keeps everything.
    #[must_use]
    pub fn filter_groups(mut self, groups: &[String]) -> Self {
        if !groups.is_empty() {
            self.cases
                .retain(|case| groups.iter().any(|g| g.eq_ignore_ascii_case(&case.group)));
        }
        self
    }

    /// Distinct group names in first-seen order.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for case in &self.cases {
            if !seen.contains(&case.group.as_str()) {
                seen.push(&case.group);
            }
        }
        seen
    }

    /// Check if the suite is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Get the number of cases.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.cases.len()
    }
}

/// How a case ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Every assertion passed.
    Passed,
    /// A response arrived but at least one assertion failed.
    Failed,
    /// No response: timeout, connection failure, bad URL or cancellation.
    Errored,
}

impl CaseOutcome {
    /// Returns true for [`CaseOutcome::Passed`].
    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of running one case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Case group.
    pub group: String,
    /// Method used.
    pub method: HttpMethod,
    /// Fully resolved URL.
    pub url: String,
    /// How the case ended.
    pub outcome: CaseOutcome,
    /// Status received, if a response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Per-assertion results.
    #[serde(default)]
    pub assertions: Vec<AssertionResult>,
    /// Transport error, if the case errored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time for the request in milliseconds.
    pub duration_ms: u64,
}

impl CaseResult {
    /// Result for a case whose response arrived and was checked.
    #[must_use]
    pub fn completed(
        case: &TestCase,
        url: impl Into<String>,
        status: u16,
        assertions: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let outcome = if assertions.iter().all(|a| a.passed) {
            CaseOutcome::Passed
        } else {
            CaseOutcome::Failed
        };
        Self {
            name: case.name.clone(),
            group: case.group.clone(),
            method: case.request.method,
            url: url.into(),
            outcome,
            status: Some(status),
            assertions,
            error: None,
            duration_ms,
        }
    }

    /// Result for a case that never got a response.
    #[must_use]
    pub fn errored(
        case: &TestCase,
        url: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: case.name.clone(),
            group: case.group.clone(),
            method: case.request.method,
            url: url.into(),
            outcome: CaseOutcome::Errored,
            status: None,
            assertions: Vec::new(),
            error: Some(error.into()),
            duration_ms,
        }
    }

    /// Failed assertion results only.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| !a.passed)
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteResults {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Suite that was run.
    pub suite_name: String,
    /// Base URL the suite ran against.
    pub base_url: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total run time in milliseconds.
    pub duration_ms: u64,
    /// Per-case results, in execution order.
    pub cases: Vec<CaseResult>,
    /// Number of cases run.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of errored cases.
    pub errored: usize,
}

impl SuiteResults {
    /// Create new suite results and tally outcomes.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        base_url: impl Into<String>,
        started_at: DateTime<Utc>,
        cases: Vec<CaseResult>,
        duration_ms: u64,
    ) -> Self {
        let count = |outcome: CaseOutcome| cases.iter().filter(|c| c.outcome == outcome).count();
        let passed = count(CaseOutcome::Passed);
        let failed = count(CaseOutcome::Failed);
        let errored = count(CaseOutcome::Errored);

        Self {
            run_id: Uuid::now_v7(),
            suite_name: suite_name.into(),
            base_url: base_url.into(),
            started_at,
            duration_ms,
            total: cases.len(),
            cases,
            passed,
            failed,
            errored,
        }
    }

    /// True when no case failed or errored.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Pass rate as a percentage. An empty run counts as 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
