//! Assertion evaluator port

use combat_probe_domain::response::ResponseSpec;
use combat_probe_domain::{Assertion, AssertionResult};

/// Port for checking assertions against a response.
///
/// Evaluation never fails: a malformed assertion (bad regex, bad schema)
/// yields a failed [`AssertionResult`] explaining why.
pub trait AssertionEvaluator: Send + Sync {
    /// Checks one assertion.
    fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult;

    /// Checks every assertion, in order.
    fn evaluate_all(&self, assertions: &[Assertion], response: &ResponseSpec) -> Vec<AssertionResult> {
        assertions
            .iter()
            .map(|assertion| self.evaluate(assertion, response))
            .collect()
    }
}
