//! Run Suite Use Case
//!
//! Executes every case of a suite against a base URL, one request at a time,
//! and streams the results to a reporter.

use std::sync::Arc;
use std::time::Instant;

use combat_probe_domain::{CaseResult, DEFAULT_TIMEOUT_MS, SuiteResults, TestCase, TestSuite};
use tracing::{debug, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{
    AssertionEvaluator, CancellationReceiver, Clock, HttpClient, HttpClientError, Reporter,
};

/// Use case for running a test suite.
///
/// Cases run strictly in order and each request is awaited before its
/// assertions are checked. A transport failure marks the case as errored
/// and the run moves on, unless stop-on-failure is set.
///
/// # Example
///
/// ```ignore
/// let client = ReqwestHttpClient::new("combat-probe")?;
/// let runner = RunSuite::new(Arc::new(client), TestRunner::new(), SystemClock::new());
/// let results = runner
///     .run(&suite, "https://api.example.com", &mut reporter, CancellationReceiver::never())
///     .await?;
/// ```
pub struct RunSuite<C: HttpClient, E: AssertionEvaluator, K: Clock> {
    client: Arc<C>,
    evaluator: E,
    clock: K,
    default_timeout_ms: u64,
    stop_on_failure: bool,
}

impl<C: HttpClient, E: AssertionEvaluator, K: Clock> RunSuite<C, E, K> {
    /// Creates the use case with the default 90 second timeout.
    pub fn new(client: Arc<C>, evaluator: E, clock: K) -> Self {
        Self {
            client,
            evaluator,
            clock,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            stop_on_failure: false,
        }
    }

    /// Sets the timeout used by cases without their own override.
    #[must_use]
    pub const fn with_default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Stops after the first failed or errored case, whatever the suite says.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Runs the suite.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or a reporter fails.
    /// Failing cases are reported in the returned results, not as errors.
    pub async fn run(
        &self,
        suite: &TestSuite,
        base_url: &str,
        reporter: &mut dyn Reporter,
        mut cancel: CancellationReceiver,
    ) -> ApplicationResult<SuiteResults> {
        validate_base_url(base_url)?;

        let started_at = self.clock.now();
        let start = Instant::now();
        let stop_on_failure = self.stop_on_failure || suite.stop_on_failure;

        info!(suite = %suite.name, base_url, cases = suite.len(), "starting suite");
        reporter.suite_started(suite, base_url)?;

        let mut results = Vec::with_capacity(suite.len());
        for case in &suite.cases {
            // Cancelled between cases: error the next case without sending it.
            let (result, cancelled) = if cancel.is_cancelled() {
                let error = HttpClientError::Cancelled.to_string();
                (CaseResult::errored(case, case.request.full_url(base_url), error, 0), true)
            } else {
                self.run_case(case, base_url, &mut cancel).await
            };
            info!(
                group = %result.group,
                case = %result.name,
                outcome = ?result.outcome,
                status = ?result.status,
                duration_ms = result.duration_ms,
                "case finished"
            );
            reporter.case_finished(&result)?;

            let passed = result.outcome.is_passed();
            results.push(result);

            if cancelled {
                warn!("run cancelled, skipping remaining cases");
                break;
            }
            if !passed && stop_on_failure {
                info!("stopping after first failure");
                break;
            }
        }

        let summary = SuiteResults::new(
            &suite.name,
            base_url,
            started_at,
            results,
            elapsed_ms(start),
        );
        info!(
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            duration_ms = summary.duration_ms,
            "suite finished"
        );
        reporter.suite_finished(&summary)?;
        Ok(summary)
    }

    /// Runs one case. The flag is true if the request was cancelled.
    async fn run_case(
        &self,
        case: &TestCase,
        base_url: &str,
        cancel: &mut CancellationReceiver,
    ) -> (CaseResult, bool) {
        let url = match case.request.parse_url(base_url) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(case = %case.name, error = %e, "cannot resolve request URL");
                return (
                    CaseResult::errored(case, case.request.full_url(base_url), e.to_string(), 0),
                    false,
                );
            }
        };
        let timeout_ms = case.request.timeout_ms.unwrap_or(self.default_timeout_ms);

        debug!(method = %case.request.method, %url, timeout_ms, "sending request");
        let start = Instant::now();
        let outcome = tokio::select! {
            result = self.client.execute(&url, &case.request, timeout_ms) => result,
            () = cancel.cancelled() => Err(HttpClientError::Cancelled),
        };
        let duration_ms = elapsed_ms(start);

        match outcome {
            Ok(response) => {
                debug!(status = response.status, size = response.size, "response received");
                let assertions = self.evaluator.evaluate_all(&case.assertions, &response);
                (
                    CaseResult::completed(case, url, response.status, assertions, duration_ms),
                    false,
                )
            }
            Err(e) => {
                warn!(case = %case.name, error = %e, "request failed");
                let cancelled = e == HttpClientError::Cancelled;
                (CaseResult::errored(case, url, e.to_string(), duration_ms), cancelled)
            }
        }
    }
}

fn validate_base_url(base_url: &str) -> ApplicationResult<()> {
    let base = base_url.trim();
    if base.is_empty() {
        return Err(ApplicationError::InvalidBaseUrl("URL is required".to_string()));
    }
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(ApplicationError::InvalidBaseUrl(format!(
            "'{base}' must start with http:// or https://"
        )));
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{DateTime, TimeZone, Utc};
    use combat_probe_domain::request::RequestSpec;
    use combat_probe_domain::response::ResponseSpec;
    use combat_probe_domain::{Assertion, AssertionResult, CaseOutcome};
    use pretty_assertions::assert_eq;

    use crate::ports::{CancellationToken, ReportError};

    enum Reply {
        Status(u16),
        Fail(HttpClientError),
        Hang,
    }

    #[derive(Default)]
    struct FakeClient {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<(String, u64)>>,
    }

    impl FakeClient {
        fn reply(mut self, path: &str, reply: Reply) -> Self {
            self.replies.insert(path.to_string(), reply);
            self
        }

        fn calls(&self) -> Vec<(String, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HttpClient for FakeClient {
        async fn execute(
            &self,
            url: &str,
            request: &RequestSpec,
            timeout_ms: u64,
        ) -> Result<ResponseSpec, HttpClientError> {
            self.calls.lock().unwrap().push((url.to_string(), timeout_ms));
            match self.replies.get(&request.path) {
                Some(Reply::Status(status)) => Ok(ResponseSpec::new(
                    *status,
                    Vec::<(String, String)>::new(),
                    Vec::new(),
                    Duration::from_millis(1),
                )),
                Some(Reply::Fail(e)) => Err(e.clone()),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(HttpClientError::Timeout { timeout_ms })
                }
                None => Ok(ResponseSpec::new(
                    200,
                    Vec::<(String, String)>::new(),
                    Vec::new(),
                    Duration::ZERO,
                )),
            }
        }
    }

    /// Only understands status assertions; everything else passes.
    struct StatusOnly;

    impl AssertionEvaluator for StatusOnly {
        fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
            match assertion {
                Assertion::StatusCode { expected } if !expected.matches(response.status) => {
                    AssertionResult::fail(assertion, format!("got {}", response.status))
                }
                _ => AssertionResult::pass(assertion),
            }
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on_case: bool,
    }

    impl Reporter for Recorder {
        fn suite_started(&mut self, suite: &TestSuite, _base_url: &str) -> Result<(), ReportError> {
            self.events.push(format!("start {}", suite.name));
            Ok(())
        }

        fn case_finished(&mut self, result: &CaseResult) -> Result<(), ReportError> {
            if self.fail_on_case {
                return Err(ReportError::Io(std::io::Error::other("disk full")));
            }
            self.events.push(format!("case {} {:?}", result.name, result.outcome));
            Ok(())
        }

        fn suite_finished(&mut self, results: &SuiteResults) -> Result<(), ReportError> {
            self.events.push(format!("end {}", results.total));
            Ok(())
        }
    }

    fn suite(paths: &[&str]) -> TestSuite {
        let mut suite = TestSuite::new("fake");
        for path in paths {
            suite.add(
                TestCase::new("g", path.trim_start_matches('/'), RequestSpec::get(*path))
                    .expect(Assertion::status(200)),
            );
        }
        suite
    }

    fn runner(client: FakeClient) -> (Arc<FakeClient>, RunSuite<FakeClient, StatusOnly, FixedClock>) {
        let client = Arc::new(client);
        (client.clone(), RunSuite::new(client, StatusOnly, FixedClock))
    }

    #[tokio::test]
    async fn test_runs_cases_in_order() {
        let (client, use_case) = runner(FakeClient::default().reply("/b", Reply::Status(404)));
        let mut recorder = Recorder::default();

        let results = use_case
            .run(
                &suite(&["/a", "/b", "/c"]),
                "http://api.test/",
                &mut recorder,
                CancellationReceiver::never(),
            )
            .await
            .unwrap();

        let urls: Vec<_> = client.calls().into_iter().map(|(url, _)| url).collect();
        assert_eq!(urls, vec!["http://api.test/a", "http://api.test/b", "http://api.test/c"]);
        assert_eq!(
            recorder.events,
            vec![
                "start fake",
                "case a Passed",
                "case b Failed",
                "case c Passed",
                "end 3",
            ]
        );
        assert_eq!((results.passed, results.failed, results.errored), (2, 1, 0));
        assert_eq!(results.started_at, FixedClock.now());
        assert_eq!(results.cases[1].status, Some(404));
    }

    #[tokio::test]
    async fn test_default_and_override_timeouts() {
        let (client, use_case) = runner(FakeClient::default());
        let mut cases = suite(&["/a"]);
        cases.add(TestCase::new("g", "slow", RequestSpec::get("/slow").with_timeout_ms(5)));

        use_case
            .run(&cases, "http://api.test", &mut Recorder::default(), CancellationReceiver::never())
            .await
            .unwrap();

        let timeouts: Vec<_> = client.calls().into_iter().map(|(_, t)| t).collect();
        assert_eq!(timeouts, vec![DEFAULT_TIMEOUT_MS, 5]);
    }

    #[tokio::test]
    async fn test_transport_error_does_not_abort() {
        let (_, use_case) = runner(FakeClient::default().reply(
            "/a",
            Reply::Fail(HttpClientError::ConnectionRefused {
                host: "api.test".to_string(),
                port: 80,
            }),
        ));

        let results = use_case
            .run(
                &suite(&["/a", "/b"]),
                "http://api.test",
                &mut Recorder::default(),
                CancellationReceiver::never(),
            )
            .await
            .unwrap();

        assert_eq!(results.cases[0].outcome, CaseOutcome::Errored);
        assert_eq!(
            results.cases[0].error.as_deref(),
            Some("connection refused by api.test:80")
        );
        assert_eq!(results.cases[1].outcome, CaseOutcome::Passed);
        assert!(!results.all_passed());
    }

    #[tokio::test]
    async fn test_stop_on_failure() {
        let (client, use_case) = runner(FakeClient::default().reply("/a", Reply::Status(500)));
        let mut cases = suite(&["/a", "/b"]);
        cases.stop_on_failure = true;

        let results = use_case
            .run(&cases, "http://api.test", &mut Recorder::default(), CancellationReceiver::never())
            .await
            .unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(client.calls().len(), 1);

        let (client, use_case) = runner(FakeClient::default().reply("/a", Reply::Status(500)));
        let use_case = use_case.with_stop_on_failure(true);
        let results = use_case
            .run(
                &suite(&["/a", "/b"]),
                "http://api.test",
                &mut Recorder::default(),
                CancellationReceiver::never(),
            )
            .await
            .unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_errors_in_flight_case_and_stops() {
        let (client, use_case) = runner(FakeClient::default().reply("/b", Reply::Hang));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let mut recorder = Recorder::default();
        let results = use_case
            .run(&suite(&["/a", "/b", "/c"]), "http://api.test", &mut recorder, token.receiver())
            .await
            .unwrap();

        assert_eq!(results.total, 2);
        assert_eq!(results.cases[1].outcome, CaseOutcome::Errored);
        assert_eq!(results.cases[1].error.as_deref(), Some("cancelled"));
        assert_eq!(client.calls().len(), 2);
        assert_eq!(recorder.events.last().map(String::as_str), Some("end 2"));
    }

    #[tokio::test]
    async fn test_cancel_between_cases_errors_next_case() {
        let (client, use_case) = runner(FakeClient::default());
        let token = CancellationToken::new();
        token.cancel();

        let mut recorder = Recorder::default();
        let results = use_case
            .run(&suite(&["/a", "/b"]), "http://api.test", &mut recorder, token.receiver())
            .await
            .unwrap();

        assert!(client.calls().is_empty());
        assert_eq!(results.total, 1);
        assert_eq!(results.cases[0].outcome, CaseOutcome::Errored);
        assert_eq!(results.cases[0].error.as_deref(), Some("cancelled"));
        assert!(!results.all_passed());
        assert_eq!(recorder.events, vec!["start fake", "case a Errored", "end 1"]);
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let (client, use_case) = runner(FakeClient::default());
        for base in ["", "   ", "ftp://api.test"] {
            let err = use_case
                .run(&suite(&["/a"]), base, &mut Recorder::default(), CancellationReceiver::never())
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::InvalidBaseUrl(_)));
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_case_url_is_errored() {
        let (client, use_case) = runner(FakeClient::default());
        let results = use_case
            .run(
                &suite(&["/a"]),
                "http://bad host",
                &mut Recorder::default(),
                CancellationReceiver::never(),
            )
            .await
            .unwrap();
        assert_eq!(results.cases[0].outcome, CaseOutcome::Errored);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reporter_error_propagates() {
        let (_, use_case) = runner(FakeClient::default());
        let mut recorder = Recorder {
            fail_on_case: true,
            ..Default::default()
        };
        let err = use_case
            .run(&suite(&["/a"]), "http://api.test", &mut recorder, CancellationReceiver::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Report(ReportError::Io(_))));
    }
}
