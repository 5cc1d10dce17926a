//! Serialization helpers for reports and suite files.
//!
//! JSON output is deterministic so reports diff cleanly:
//! - 2-space indentation
//! - Trailing newline
//! - Keys in declaration order (struct fields) or sorted (`BTreeMap`)

mod json;
mod yaml;

pub use json::{from_json, to_json_stable};
pub use yaml::{from_yaml, to_yaml};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// YAML serialization or deserialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
