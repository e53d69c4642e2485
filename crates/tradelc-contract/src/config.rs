//! Contract configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty document (or no
//! file at all) yields the standard deployment: four seed accounts, the
//! two-document upload threshold, strict status updates, and redacted login
//! results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tradelc_state::StatusFieldPolicy;

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV: &str = "TRADELC_CONFIG";

/// An account created by bootstrap if it does not already exist.
///
/// Custom `Debug` implementation redacts the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl SeedAccount {
    fn new(username: &str, password: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Contract behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Accounts seeded by `init`.
    pub seed_accounts: Vec<SeedAccount>,
    /// Document count at which `ExporterDocsUploaded` is set.
    pub docs_uploaded_threshold: usize,
    /// Handling of unknown status fields and bad boolean literals.
    pub status_field_policy: StatusFieldPolicy,
    /// Whether `login` returns the stored record including the password.
    pub login_returns_secret: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            seed_accounts: vec![
                SeedAccount::new("importerBank", "importerBank", "Importer Bank"),
                SeedAccount::new("customs", "customs", "Customs"),
                SeedAccount::new("exporterBank", "exporterBank", "Exporter Bank"),
                SeedAccount::new("exporter", "exporter", "Exporter"),
            ],
            docs_uploaded_threshold: 2,
            status_field_policy: StatusFieldPolicy::Strict,
            login_returns_secret: false,
        }
    }
}

impl ContractConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from `path`, else from the file named by [`CONFIG_ENV`], else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(env_path) if !env_path.is_empty() => Self::from_file(Path::new(&env_path)),
            _ => Ok(Self::default()),
        }
    }

    /// Reject configurations the contract cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs_uploaded_threshold == 0 {
            return Err(ConfigError::Invalid(
                "docs_uploaded_threshold must be at least 1".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for account in &self.seed_accounts {
            if account.username.is_empty() {
                return Err(ConfigError::Invalid(
                    "seed account with empty username".to_string(),
                ));
            }
            if !seen.insert(account.username.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate seed account {}",
                    account.username
                )));
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
