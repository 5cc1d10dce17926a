//! Suite files.
//!
//! Suites can be kept on disk as YAML (`.yaml`, `.yml`) or JSON (`.json`).
//! The format is chosen from the file extension.

use std::path::{Path, PathBuf};

use combat_probe_domain::TestSuite;
use tokio::fs;
use tracing::debug;

use crate::serialization::{SerializationError, from_json, from_yaml, to_json_stable, to_yaml};

/// Error type for suite file operations.
#[derive(Debug, thiserror::Error)]
pub enum SuiteFileError {
    /// IO error during file operations.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The extension is not one we know how to read.
    #[error("Unsupported suite format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// On-disk suite formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl SuiteFormat {
    /// Picks the format from a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Reads and writes suite files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteFile;

impl SuiteFile {
    /// Loads a suite from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unknown, the file cannot be
    /// read, or its content is not a valid suite.
    pub async fn load(path: &Path) -> Result<TestSuite, SuiteFileError> {
        let format = Self::format_of(path)?;
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| SuiteFileError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let suite: TestSuite = match format {
            SuiteFormat::Yaml => from_yaml(&content)?,
            SuiteFormat::Json => from_json(&content)?,
        };
        debug!(path = %path.display(), cases = suite.len(), "loaded suite file");
        Ok(suite)
    }

    /// Writes a suite to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unknown or the file cannot be
    /// written.
    pub async fn save(path: &Path, suite: &TestSuite) -> Result<(), SuiteFileError> {
        let content = match Self::format_of(path)? {
            SuiteFormat::Yaml => to_yaml(suite)?,
            SuiteFormat::Json => to_json_stable(suite)?,
        };

        let io_error = |source: std::io::Error| SuiteFileError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        fs::write(path, content).await.map_err(io_error)?;
        debug!(path = %path.display(), cases = suite.len(), "saved suite file");
        Ok(())
    }

    fn format_of(path: &Path) -> Result<SuiteFormat, SuiteFileError> {
        SuiteFormat::from_path(path).ok_or_else(|| SuiteFileError::UnsupportedFormat(path.to_path_buf()))
    }
}
