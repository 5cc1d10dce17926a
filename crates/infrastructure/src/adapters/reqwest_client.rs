//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.

use std::time::{Duration, Instant};

use combat_probe_application::ports::{HttpClient, HttpClientError};
use combat_probe_domain::{
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};
use reqwest::{Client, Method, Url};

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Default configuration:
/// - Follow redirects: up to 10
/// - TLS verification: enabled (rustls)
/// - Timeout: per request, supplied by the caller
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with the given User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(user_agent: &str) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Builds the outgoing request. Bodies are only attached for methods
    /// that carry one.
    fn prepare(
        &self,
        url: &str,
        request: &RequestSpec,
        timeout_ms: u64,
    ) -> Result<reqwest::Request, HttpClientError> {
        let parsed_url =
            Url::parse(url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), parsed_url)
            .timeout(Duration::from_millis(timeout_ms));

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        // `json` only sets Content-Type when the case did not.
        match &request.body {
            Some(body) if request.method.sends_body() => builder = builder.json(body),
            Some(_) => tracing::debug!(method = %request.method, "ignoring body"),
            None => {}
        }

        builder.build().map_err(|e| Self::map_error(&e, timeout_ms))
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(error.to_string());
        }

        HttpClientError::Other(error_chain(error))
    }
}

/// Joins an error with its sources; reqwest keeps the useful part
/// (e.g. "Connection refused") a few levels down.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        url: &str,
        request: &RequestSpec,
        timeout_ms: u64,
    ) -> Result<ResponseSpec, HttpClientError> {
        let prepared = self.prepare(url, request, timeout_ms)?;
        let start = Instant::now();

        let response = self
            .client
            .execute(prepared)
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();

        Ok(ResponseSpec::new(status, headers, body, start.elapsed()))
    }
}
