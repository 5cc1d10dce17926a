//! File-based persistence.

mod suite_file;

pub use suite_file::{SuiteFile, SuiteFileError, SuiteFormat};
