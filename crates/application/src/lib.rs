//! Combat Probe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, assertion evaluator, reporter, clock)
//! - The built-in D&D Combat API suite
//! - The suite runner use case

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    AssertionEvaluator, CancellationReceiver, CancellationToken, Clock, HttpClient,
    HttpClientError, ReportError, Reporter,
};
pub use use_cases::{CombatSuiteOptions, RunSuite, combat_suite, groups};
