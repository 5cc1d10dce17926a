//! Assertion evaluator.
//!
//! Checks assertions against HTTP responses and produces per-assertion results.

use combat_probe_application::ports::AssertionEvaluator;
use combat_probe_domain::response::ResponseSpec;
use combat_probe_domain::{Assertion, AssertionResult, StatusExpectation};
use regex::Regex;
use serde_json::Value;

use super::json_path;

/// Characters of body shown when an assertion on the body fails.
const PREVIEW_CHARS: usize = 100;

/// Evaluates assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::BodyContains { text, ignore_case } => {
                check_body_contains(assertion, response, text, *ignore_case)
            }
            Assertion::BodyMatches { pattern } => check_body_matches(assertion, response, pattern),
            Assertion::JsonSchema { schema } => check_json_schema(assertion, response, schema),
            Assertion::JsonEquals { expected } => check_json_equals(assertion, response, expected),
            Assertion::JsonPath { path, expected } => {
                check_json_path(assertion, response, path, expected.as_ref())
            }
            Assertion::HeaderExists { name, value } => {
                check_header_exists(assertion, response, name, value.as_deref())
            }
            Assertion::ContentType { expected } => {
                check_content_type(assertion, response, expected)
            }
            Assertion::ResponseTime { max_ms } => check_response_time(assertion, response, *max_ms),
            Assertion::IsJson => match response.json() {
                Ok(_) => AssertionResult::pass(assertion),
                Err(e) => AssertionResult::fail(assertion, format!("Body is not valid JSON: {e}")),
            },
        }
    }
}

impl AssertionEvaluator for TestRunner {
    fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        self.run_assertion(assertion, response)
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion, actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion,
            actual.to_string(),
            format!("Expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_body_contains(
    assertion: &Assertion,
    response: &ResponseSpec,
    text: &str,
    ignore_case: bool,
) -> AssertionResult {
    let contains = if ignore_case {
        response.body.to_lowercase().contains(&text.to_lowercase())
    } else {
        response.body.contains(text)
    };

    if contains {
        AssertionResult::pass(assertion)
    } else {
        AssertionResult::fail_with_value(
            assertion,
            response.body_preview(PREVIEW_CHARS),
            format!("Body does not contain '{text}'"),
        )
    }
}

fn check_body_matches(assertion: &Assertion, response: &ResponseSpec, pattern: &str) -> AssertionResult {
    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(&response.body) => AssertionResult::pass(assertion),
        Ok(_) => AssertionResult::fail_with_value(
            assertion,
            response.body_preview(PREVIEW_CHARS),
            format!("Body does not match pattern '{pattern}'"),
        ),
        Err(e) => AssertionResult::fail(assertion, format!("Invalid regex pattern '{pattern}': {e}")),
    }
}

fn parse_body(assertion: &Assertion, response: &ResponseSpec) -> Result<Value, AssertionResult> {
    response.json().map_err(|e| {
        AssertionResult::fail_with_value(
            assertion,
            response.body_preview(PREVIEW_CHARS),
            format!("Failed to parse body as JSON: {e}"),
        )
    })
}

fn check_json_schema(assertion: &Assertion, response: &ResponseSpec, schema: &Value) -> AssertionResult {
    let validator = match jsonschema::validator_for(schema) {
        Ok(validator) => validator,
        Err(e) => return AssertionResult::fail(assertion, format!("Invalid JSON schema: {e}")),
    };
    let body = match parse_body(assertion, response) {
        Ok(body) => body,
        Err(result) => return result,
    };

    let messages: Vec<String> = validator
        .iter_errors(&body)
        .map(|err| err.to_string())
        .collect();

    if messages.is_empty() {
        AssertionResult::pass(assertion)
    } else {
        AssertionResult::fail_with_value(
            assertion,
            response.body_preview(PREVIEW_CHARS),
            format!("Schema validation failed: {}", messages.join("; ")),
        )
    }
}

fn check_json_equals(assertion: &Assertion, response: &ResponseSpec, expected: &Value) -> AssertionResult {
    let body = match parse_body(assertion, response) {
        Ok(body) => body,
        Err(result) => return result,
    };
    if &body == expected {
        AssertionResult::pass(assertion)
    } else {
        AssertionResult::fail_with_value(
            assertion,
            body.to_string(),
            format!("Body JSON differs: expected {expected}, got {body}"),
        )
    }
}

fn check_json_path(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    expected: Option<&Value>,
) -> AssertionResult {
    let body = match parse_body(assertion, response) {
        Ok(body) => body,
        Err(result) => return result,
    };

    match json_path::query(&body, path) {
        Ok(Some(value)) => match expected {
            Some(expected) if value != expected => AssertionResult::fail_with_value(
                assertion,
                value.to_string(),
                format!("JSON path '{path}' value mismatch: expected {expected}, got {value}"),
            ),
            _ => AssertionResult::pass_with_value(assertion, value.to_string()),
        },
        Ok(None) => AssertionResult::fail(assertion, format!("JSON path '{path}' not found")),
        Err(e) => AssertionResult::fail(assertion, format!("Invalid JSON path '{path}': {e}")),
    }
}

fn check_header_exists(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    expected: Option<&str>,
) -> AssertionResult {
    match (response.get_header(name), expected) {
        (None, _) => AssertionResult::fail(assertion, format!("Header '{name}' not found")),
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion,
            actual.clone(),
            format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion, actual.clone()),
    }
}

fn check_content_type(assertion: &Assertion, response: &ResponseSpec, expected: &str) -> AssertionResult {
    match &response.content_type {
        Some(actual) if actual.contains(expected) => {
            AssertionResult::pass_with_value(assertion, actual.clone())
        }
        Some(actual) => AssertionResult::fail_with_value(
            assertion,
            actual.clone(),
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => AssertionResult::fail(assertion, "No Content-Type header present"),
    }
}

fn check_response_time(assertion: &Assertion, response: &ResponseSpec, max_ms: u64) -> AssertionResult {
    let actual_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX);
    if actual_ms <= max_ms {
        AssertionResult::pass_with_value(assertion, format!("{actual_ms}ms"))
    } else {
        AssertionResult::fail_with_value(
            assertion,
            format!("{actual_ms}ms"),
            format!("Response took {actual_ms}ms, expected <= {max_ms}ms"),
        )
    }
}
