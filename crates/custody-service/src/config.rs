//! Engine configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration:
//!
//! ```toml
//! [storage]
//! data_dir = "custody-data"
//! # content_dir defaults to "<data_dir>/content"
//!
//! [clearance]
//! # no policy_file: every identity is denied
//! policy_file = "clearance.toml"
//! authority_timeout_ms = 5000
//!
//! [verification]
//! content_read_timeout_ms = 30000
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use custody_contracts::error::{CustodyError, CustodyResult};
use custody_core::{clearance::DEFAULT_AUTHORITY_TIMEOUT, verifier::DEFAULT_CONTENT_READ_TIMEOUT};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustodyConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub clearance: ClearanceConfig,

    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Where the registry, the ledger and document bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding `registry.json` and `ledger.jsonl`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for stored document bytes. Defaults to `<data_dir>/content`.
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClearanceConfig {
    /// TOML rule file for the clearance authority. When unset, every
    /// identity is denied.
    #[serde(default)]
    pub policy_file: Option<PathBuf>,

    #[serde(default = "default_authority_timeout_ms")]
    pub authority_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationConfig {
    #[serde(default = "default_content_read_timeout_ms")]
    pub content_read_timeout_ms: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("custody-data")
}

fn default_authority_timeout_ms() -> u64 {
    DEFAULT_AUTHORITY_TIMEOUT.as_millis() as u64
}

fn default_content_read_timeout_ms() -> u64 {
    DEFAULT_CONTENT_READ_TIMEOUT.as_millis() as u64
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_dir: None,
        }
    }
}

impl Default for ClearanceConfig {
    fn default() -> Self {
        Self {
            policy_file: None,
            authority_timeout_ms: default_authority_timeout_ms(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            content_read_timeout_ms: default_content_read_timeout_ms(),
        }
    }
}

impl CustodyConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the TOML is invalid, names an unknown key, or sets a
    /// timeout of zero.
    pub fn from_toml_str(s: &str) -> CustodyResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| CustodyError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CustodyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CustodyError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// A configuration rooted at `data_dir`, everything else defaulted.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig {
                data_dir: data_dir.into(),
                content_dir: None,
            },
            ..Self::default()
        }
    }

    fn validate(&self) -> CustodyResult<()> {
        if self.clearance.authority_timeout_ms == 0 {
            return Err(CustodyError::ConfigError {
                reason: "clearance.authority_timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.verification.content_read_timeout_ms == 0 {
            return Err(CustodyError::ConfigError {
                reason: "verification.content_read_timeout_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn registry_path(&self) -> PathBuf {
        self.storage.data_dir.join("registry.json")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.storage.data_dir.join("ledger.jsonl")
    }

    pub fn content_dir(&self) -> PathBuf {
        self.storage
            .content_dir
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("content"))
    }

    pub fn authority_timeout(&self) -> Duration {
        Duration::from_millis(self.clearance.authority_timeout_ms)
    }

    pub fn content_read_timeout(&self) -> Duration {
        Duration::from_millis(self.verification.content_read_timeout_ms)
    }
}
