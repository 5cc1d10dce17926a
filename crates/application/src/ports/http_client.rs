//! HTTP Client port

use std::future::Future;

use combat_probe_domain::request::RequestSpec;
use combat_probe_domain::response::ResponseSpec;
use thiserror::Error;

/// Transport-level failures. Any of these means no response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was applied.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request was cancelled before a response arrived.
    #[error("cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Sends `request` to the already resolved `url` and waits for the
    /// full response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport problems. HTTP error statuses are
    /// responses, not errors.
    fn execute(
        &self,
        url: &str,
        request: &RequestSpec,
        timeout_ms: u64,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}
