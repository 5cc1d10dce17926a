//! Response testing infrastructure.
//!
//! This module provides the evaluator that checks assertions against HTTP responses.

mod json_path;
mod runner;

pub use runner::TestRunner;
