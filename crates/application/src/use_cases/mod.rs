//! Application use cases (business logic orchestration).

mod combat_suite;
mod run_suite;

pub use combat_suite::{CombatSuiteOptions, combat_suite, groups};
pub use run_suite::RunSuite;
