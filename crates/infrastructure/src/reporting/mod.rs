//! Reporters for suite runs.

mod console;
mod json;
mod multi;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use multi::MultiReporter;
