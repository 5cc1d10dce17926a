//! Combat Probe Domain - Core types
//!
//! This crate defines the domain model for the Combat Probe contract tester:
//! HTTP request/response specs, the combat payloads exchanged with the
//! remote API, assertions, suites and their results.
//! All types here are pure Rust with no I/O dependencies.

pub mod combat;
pub mod error;
pub mod request;
pub mod response;
pub mod settings;
pub mod testing;

pub use combat::{BattleResult, Character, FieldCasing, Monster, MonsterNames};
pub use error::{DomainError, DomainResult};
pub use settings::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, ProbeSettings, UnknownMonsterStatus};
pub use testing::{
    Assertion, AssertionResult, CaseOutcome, CaseResult, StatusExpectation, SuiteResults,
    TestCase, TestSuite,
};
