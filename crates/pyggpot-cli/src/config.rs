//! CLI configuration
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `PYGGPOT_*`
//! environment variables, command-line flags.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `ledger.path`
pub const ENV_LEDGER_PATH: &str = "PYGGPOT_LEDGER_PATH";
/// Environment variable overriding `random.seed`
pub const ENV_SEED: &str = "PYGGPOT_SEED";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyggpotConfig {
    /// Ledger store settings
    pub ledger: LedgerConfig,
    /// Randomness settings
    pub random: RandomConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Which store handler backs the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// JSON file at `ledger.path`
    #[default]
    File,
    /// Process memory; nothing outlives the command
    Memory,
}

/// Ledger store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Store handler
    pub backend: LedgerBackend,
    /// Ledger file for the file backend
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::File,
            path: PathBuf::from("pyggpot-ledger.json"),
        }
    }
}

/// Randomness settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Fixed seed; absent means seed from the clock
    pub seed: Option<u64>,
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log at debug level
    pub verbose: bool,
}

impl PyggpotConfig {
    /// Load configuration from a TOML file; a missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PYGGPOT_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(|key| std::env::var(key).ok())
    }

    /// Apply `PYGGPOT_*` overrides from an arbitrary variable lookup.
    pub fn merge_with_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup(ENV_LEDGER_PATH) {
            self.ledger.path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SEED} must be an unsigned integer, got {seed:?}"))?;
            self.random.seed = Some(seed);
        }
        Ok(())
    }

    /// Apply command-line overrides, the highest-precedence layer.
    pub fn apply_flags(&mut self, ledger: Option<PathBuf>, seed: Option<u64>, verbose: bool) {
        if let Some(path) = ledger {
            self.ledger.path = path;
        }
        if let Some(seed) = seed {
            self.random.seed = Some(seed);
        }
        if verbose {
            self.logging.verbose = true;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ledger.backend == LedgerBackend::File && self.ledger.path.as_os_str().is_empty() {
            bail!("ledger.path must not be empty for the file backend");
        }
        Ok(())
    }
}
