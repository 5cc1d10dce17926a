//! Run settings
//!
//! Everything a run of the probe can be tuned with. The infrastructure layer
//! fills this from defaults, an optional file, the environment and CLI flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combat::FieldCasing;
use crate::error::{DomainError, DomainResult};
use crate::testing::StatusExpectation;

/// Public deployment of the D&D Combat API.
pub const DEFAULT_BASE_URL: &str = "https://dnd-combat-api-7f3660dcecb1.herokuapp.com";

/// Per-request timeout applied when a case does not override it.
pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;

/// Status the API is expected to answer with for a monster it does not know.
///
/// Observed behaviour has been 404 at one point and 500 at another, so the
/// default accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownMonsterStatus {
    /// 404 Not Found
    #[serde(alias = "404")]
    NotFound,
    /// 500 Internal Server Error
    #[serde(alias = "500")]
    ServerError,
    /// Either 404 or 500
    #[default]
    Either,
}

impl UnknownMonsterStatus {
    /// Status expectation matching this policy.
    #[must_use]
    pub fn expectation(self) -> StatusExpectation {
        match self {
            Self::NotFound => StatusExpectation::exact(404),
            Self::ServerError => StatusExpectation::exact(500),
            Self::Either => StatusExpectation::OneOf(vec![404, 500]),
        }
    }

    /// Returns the policy as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::ServerError => "server-error",
            Self::Either => "either",
        }
    }
}

impl fmt::Display for UnknownMonsterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnknownMonsterStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not-found" | "not_found" | "404" => Ok(Self::NotFound),
            "server-error" | "server_error" | "500" => Ok(Self::ServerError),
            "either" | "any" => Ok(Self::Either),
            other => Err(DomainError::UnknownStatusPolicy(other.to_string())),
        }
    }
}

/// Settings for one run of the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Default per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Wire spelling of multi-word fields.
    pub field_casing: FieldCasing,
    /// Expected status for unknown monsters.
    pub unknown_monster_status: UnknownMonsterStatus,
    /// Page requested from the monster name listing.
    pub monster_page: u32,
    /// A monster the API is known to have.
    pub known_monster: String,
    /// A monster the API must not have.
    pub unknown_monster: String,
    /// Skip the remaining cases after the first failure.
    pub stop_on_failure: bool,
    /// Where to write the JSON report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!("combat-probe/", env!("CARGO_PKG_VERSION")).to_string(),
            field_casing: FieldCasing::default(),
            unknown_monster_status: UnknownMonsterStatus::default(),
            monster_page: 1,
            known_monster: "Goblin".to_string(),
            unknown_monster: "UnknownMonster".to_string(),
            stop_on_failure: false,
            report_path: None,
        }
    }
}

impl ProbeSettings {
    /// Checks that the settings describe a runnable configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or non-HTTP base URL, a zero timeout,
    /// or an empty monster name.
    pub fn validate(&self) -> DomainResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(DomainError::InvalidSetting {
                field: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(DomainError::InvalidSetting {
                field: "base_url",
                reason: format!("'{base}' must start with http:// or https://"),
            });
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                field: "timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.known_monster.trim().is_empty() {
            return Err(DomainError::InvalidSetting {
                field: "known_monster",
                reason: "must not be empty".to_string(),
            });
        }
        if self.unknown_monster.trim().is_empty() {
            return Err(DomainError::InvalidSetting {
                field: "unknown_monster",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
