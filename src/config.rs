//! Configuration loading
//!
//! Settings come from an optional TOML file. Every section falls back to
//! built-in defaults, so an absent file yields the stock behavior. SMTP
//! credentials are never read from the file, only from the environment.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::FundWatchError;
use crate::filter::Thresholds;
use crate::funds::{default_registry, Fund};

const CONFIG_DIR_NAME: &str = "fundwatch";
const CONFIG_FILENAME: &str = "config.toml";

pub const EMAIL_NAME_VAR: &str = "EMAIL_NAME";
pub const EMAIL_PASSWORD_VAR: &str = "EMAIL_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourceConfig,
    pub thresholds: Thresholds,
    pub mail: MailConfig,
    pub funds: Vec<Fund>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            thresholds: Thresholds::default(),
            mail: MailConfig::default(),
            funds: default_registry(),
        }
    }
}

/// Endpoints for the valuation snapshot and the fund detail page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub valuation_base_url: String,
    pub detail_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            valuation_base_url: "http://fundgz.1234567.com.cn/js".to_string(),
            detail_base_url: "http://fund.eastmoney.com".to_string(),
            timeout_secs: 10,
            user_agent: format!("fundwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject_prefix: String,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.qq.com".to_string(),
            smtp_port: 587,
            subject_prefix: "TaoTalk-基金涨跌监控".to_string(),
            timeout_secs: 30,
        }
    }
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load from `path` when given, otherwise from the default location if a
    /// file exists there, otherwise use defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using built-in defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.valuation_base_url.trim().is_empty() {
            return Err(config_error("sources.valuation_base_url must not be empty"));
        }
        if self.sources.detail_base_url.trim().is_empty() {
            return Err(config_error("sources.detail_base_url must not be empty"));
        }
        if self.sources.timeout_secs == 0 {
            return Err(config_error("sources.timeout_secs must be positive"));
        }
        if self.thresholds.rise <= Decimal::ZERO {
            return Err(config_error(format!(
                "thresholds.rise must be positive, got {}",
                self.thresholds.rise
            )));
        }
        if self.thresholds.fall >= Decimal::ZERO {
            return Err(config_error(format!(
                "thresholds.fall must be negative, got {}",
                self.thresholds.fall
            )));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(config_error("mail.smtp_host must not be empty"));
        }
        if self.mail.timeout_secs == 0 {
            return Err(config_error("mail.timeout_secs must be positive"));
        }
        if let Some(fund) = self.funds.iter().find(|f| f.code().trim().is_empty()) {
            return Err(config_error(format!(
                "fund entry with memo '{}' has an empty code",
                fund.memo()
            )));
        }
        Ok(())
    }
}

fn config_error(msg: impl Into<String>) -> anyhow::Error {
    FundWatchError::Config(msg.into()).into()
}

/// `$XDG_CONFIG_HOME/fundwatch/config.toml`, or the platform config dir
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// SMTP login, also used as sender and recipient address
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            username: require_env(EMAIL_NAME_VAR)?,
            password: require_env(EMAIL_PASSWORD_VAR)?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| config_error(format!("environment variable {} is not set", name)))
}
