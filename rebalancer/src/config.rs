//! TOML configuration loading and validation.
//!
//! Every field has a default, so running without a config file behaves like
//! a config file with all sections omitted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub account: AccountConfig,
    pub connection: ConnectionConfig,
    pub portfolio: PortfolioConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OAuth login server (use the practice server for paper accounts).
    pub login_url: String,
    /// File holding the single-use refresh token; rewritten every run.
    pub token_file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: "https://login.questrade.com".into(),
            token_file: PathBuf::from("token"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Currency whose buying power is invested.
    pub currency: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            currency: "CAD".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub file: PathBuf,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("portfolio.json"),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if self.auth.login_url.trim().is_empty() {
            return Err(Error::Config("auth.login_url must not be empty".into()));
        }
        if self.auth.token_file.as_os_str().is_empty() {
            return Err(Error::Config("auth.token_file must not be empty".into()));
        }
        let currency = &self.account.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::Config(format!(
                "account.currency must be a 3-letter ISO code, got '{currency}'"
            )));
        }
        if self.connection.timeout_secs == 0 {
            return Err(Error::Config("connection.timeout_secs must be > 0".into()));
        }
        if self.portfolio.file.as_os_str().is_empty() {
            return Err(Error::Config("portfolio.file must not be empty".into()));
        }
        Ok(())
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout_secs)
    }
}
