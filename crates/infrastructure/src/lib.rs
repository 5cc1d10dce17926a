//! Combat Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings and suite file I/O.

pub mod adapters;
pub mod persistence;
pub mod reporting;
pub mod serialization;
pub mod settings;
pub mod testing;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use persistence::{SuiteFile, SuiteFileError, SuiteFormat};
pub use reporting::{ConsoleReporter, JsonReporter, MultiReporter};
pub use serialization::{SerializationError, from_json, from_yaml, to_json_stable, to_yaml};
pub use settings::{ENV_PREFIX, SettingsError, load_settings};
pub use testing::TestRunner;
