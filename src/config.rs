use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{gateway::CredentialRef, orchestrator::RerunPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_gateway_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gateway_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from("./sessions")
}

fn default_email_min_words() -> u32 {
    100
}

fn default_email_max_words() -> u32 {
    150
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/outreach")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_model")]
    pub model: String,
    #[serde(default = "default_gateway_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub credential: CredentialRef,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_gateway_model(),
            endpoint: default_gateway_endpoint(),
            credential: CredentialRef::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,
    #[serde(default)]
    pub rerun_policy: RerunPolicy,
    #[serde(default = "default_email_min_words")]
    pub email_min_words: u32,
    #[serde(default = "default_email_max_words")]
    pub email_max_words: u32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sessions_dir: default_sessions_dir(),
            rerun_policy: RerunPolicy::default(),
            email_min_words: default_email_min_words(),
            email_max_words: default_email_max_words(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults for every section; used when no config file exists.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.gateway.model.trim().is_empty() {
            return Err(anyhow!("gateway.model cannot be empty"));
        }
        if self.gateway.endpoint.trim().is_empty() {
            return Err(anyhow!("gateway.endpoint cannot be empty"));
        }
        if self.gateway.request_timeout_ms == 0 {
            return Err(anyhow!("gateway.request_timeout_ms must be positive"));
        }
        if self.campaign.email_min_words == 0
            || self.campaign.email_min_words > self.campaign.email_max_words
        {
            return Err(anyhow!(
                "campaign email word bounds must satisfy 0 < min <= max (got {}..{})",
                self.campaign.email_min_words,
                self.campaign.email_max_words
            ));
        }
        if self.logging.retention_days == 0 {
            return Err(anyhow!("logging.retention_days must be at least 1"));
        }
        Ok(())
    }
}
