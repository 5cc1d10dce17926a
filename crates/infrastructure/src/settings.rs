//! Settings loading.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults
//! 2. An optional settings file (TOML, YAML or JSON, by extension)
//! 3. `COMBAT_PROBE_*` environment variables (e.g. `COMBAT_PROBE_BASE_URL`)
//!
//! CLI flags are applied on top by the binary, which then validates the
//! merged result with [`ProbeSettings::validate`].

use std::path::Path;

use combat_probe_domain::ProbeSettings;
use config::{Config, Environment, File};
use tracing::debug;

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "COMBAT_PROBE";

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or did not deserialize.
    #[error("could not load settings")]
    Load(#[from] config::ConfigError),
}

/// Loads settings from defaults, `file` and the process environment.
///
/// The result is not validated, so later layers can still correct it.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or a value has the
/// wrong type.
pub fn load_settings(file: Option<&Path>) -> Result<ProbeSettings, SettingsError> {
    load_settings_from(file, None)
}

/// Same as [`load_settings`], reading variables from `env` instead of the
/// process environment when given.
fn load_settings_from(
    file: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<ProbeSettings, SettingsError> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        debug!(path = %path.display(), "reading settings file");
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(env));

    Ok(builder.build()?.try_deserialize()?)
}
