//! Request specification type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{Header, Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// A single HTTP call issued by a test case.
///
/// The path is usually relative to the base URL of the API under test
/// (`/api/monsters/Goblin`), but an absolute `http(s)://` URL is accepted
/// and used unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL, or an absolute URL
    pub path: String,
    /// Extra HTTP headers
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// JSON body sent with the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a request with no headers, body or timeout override.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
            timeout_ms: None,
        }
    }

    /// Creates a GET request for the given path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request for the given path.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Attaches a JSON body (builder pattern).
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Sets a timeout override (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Returns true if the path is already an absolute URL.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }

    /// Joins the base URL and the path with exactly one `/` between them.
    #[must_use]
    pub fn full_url(&self, base_url: &str) -> String {
        if self.is_absolute() {
            return self.path.clone();
        }
        let base = base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Resolves and parses the full URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is malformed.
    pub fn parse_url(&self, base_url: &str) -> DomainResult<Url> {
        let full = self.full_url(base_url);
        Url::parse(&full).map_err(|e| DomainError::InvalidUrl(format!("{e}: {full}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_url_single_slash() {
        let req = RequestSpec::get("/api/characters/example");
        assert_eq!(
            req.full_url("https://example.com/"),
            "https://example.com/api/characters/example"
        );
        assert_eq!(
            req.full_url("https://example.com"),
            "https://example.com/api/characters/example"
        );

        let req = RequestSpec::get("api/monsters/names/1");
        assert_eq!(
            req.full_url("https://example.com"),
            "https://example.com/api/monsters/names/1"
        );
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let req = RequestSpec::get("http://other.test/health");
        assert!(req.is_absolute());
        assert_eq!(req.full_url("https://example.com"), "http://other.test/health");
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        let req = RequestSpec::get("/x");
        assert!(req.parse_url("not a url").is_err());
        assert!(req.parse_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_builder() {
        let req = RequestSpec::post("/api/battle/Goblin")
            .with_json(json!({"name": "Kaya"}))
            .with_header("Accept", "application/json")
            .with_timeout_ms(5_000);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, Some(json!({"name": "Kaya"})));
        assert!(req.headers.contains("accept"));
        assert_eq!(req.timeout_ms, Some(5_000));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(RequestSpec::get("/a")).unwrap_or_default();
        assert_eq!(json, json!({"method": "GET", "path": "/a"}));
    }
}
