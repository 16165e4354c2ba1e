pub mod env;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use tracing::debug;

use crate::error::{ConfigError, Result, SonggenError};
use self::env::{EnvParser, EnvVars};
use self::validation::ConfigValidator;

const MIN_JOB_TIMEOUT_SECONDS: u64 = 30;
const MAX_JOB_TIMEOUT_SECONDS: u64 = 3600;
const MIN_POLL_INTERVAL_SECONDS: u64 = 1;
const MAX_POLL_INTERVAL_SECONDS: u64 = 60;

fn default_generate_url() -> String {
    "https://notegpt.io/api/v2/music/generate".to_string()
}

fn default_status_url() -> String {
    "https://notegpt.io/api/v2/music/status".to_string()
}

fn default_job_timeout_seconds() -> u64 {
    240
}

fn default_poll_interval_seconds() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Telegram bot API token (environment only, never written to disk)
    #[serde(skip)]
    pub telegram_token: String,

    /// Opaque NoteGPT session cookie string (environment only, never written
    /// to disk); passed through to the service verbatim
    #[serde(skip)]
    pub notegpt_cookie: Option<String>,

    /// Music generation submission endpoint
    #[serde(default = "default_generate_url")]
    pub generate_url: String,

    /// Job status polling endpoint
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Wall-clock budget for one generation job (seconds)
    #[serde(default = "default_job_timeout_seconds")]
    pub job_timeout_seconds: u64,

    /// Pause between consecutive status polls (seconds)
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            notegpt_cookie: None,
            generate_url: default_generate_url(),
            status_url: default_status_url(),
            job_timeout_seconds: default_job_timeout_seconds(),
            poll_interval_seconds: default_poll_interval_seconds(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Try to load .env file if it exists (for Docker and development)
        dotenvy::dotenv().ok();

        // Start with default configuration
        let mut config = Self::default();

        // Override with file configuration if available
        let config_file = if let Some(path) = config_path {
            PathBuf::from(path)
        } else {
            Self::default_config_path()?
        };

        if config_file.exists() {
            let content = fs::read_to_string(&config_file)?;
            let file_config: Config = toml::from_str(&content)?;
            config = file_config;
            debug!("Loaded configuration from {}", config_file.display());
        }

        // Override with environment variables (highest priority)
        config.load_from_env()?;

        if config.telegram_token.is_empty() {
            return Err(ConfigError::MissingVar {
                var: EnvVars::TELEGRAM_BOT_TOKEN.to_string(),
            }
            .into());
        }

        config.validate()?;

        // Save config file if it doesn't exist; secrets are serde-skipped
        // and stay out of the file
        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&config_file)?;
            debug!("Wrote default configuration to {}", config_file.display());
        }

        Ok(config)
    }

    /// Load configuration from environment variables
    fn load_from_env(&mut self) -> Result<()> {
        if let Some(token) = EnvParser::parse_string(EnvVars::TELEGRAM_BOT_TOKEN)? {
            self.telegram_token = token;
        }

        if let Some(cookie) = EnvParser::parse_string(EnvVars::NOTEGPT_COOKIES)? {
            self.notegpt_cookie = Some(cookie);
        }

        if let Some(url) = EnvParser::parse_string(EnvVars::GENERATE_URL)? {
            self.generate_url = url;
        }

        if let Some(url) = EnvParser::parse_string(EnvVars::STATUS_URL)? {
            self.status_url = url;
        }

        if let Some(timeout) = EnvParser::parse_u64(
            EnvVars::JOB_TIMEOUT_SECONDS,
            MIN_JOB_TIMEOUT_SECONDS,
            MAX_JOB_TIMEOUT_SECONDS,
        )? {
            self.job_timeout_seconds = timeout;
        }

        if let Some(interval) = EnvParser::parse_u64(
            EnvVars::POLL_INTERVAL_SECONDS,
            MIN_POLL_INTERVAL_SECONDS,
            MAX_POLL_INTERVAL_SECONDS,
        )? {
            self.poll_interval_seconds = interval;
        }

        Ok(())
    }

    /// Validate the assembled configuration regardless of where values came from
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.generate_url, "generate endpoint")?;
        ConfigValidator::validate_url(&self.status_url, "status endpoint")?;
        ConfigValidator::validate_range(
            self.job_timeout_seconds,
            MIN_JOB_TIMEOUT_SECONDS,
            MAX_JOB_TIMEOUT_SECONDS,
            "job timeout seconds",
        )?;
        ConfigValidator::validate_range(
            self.poll_interval_seconds,
            MIN_POLL_INTERVAL_SECONDS,
            MAX_POLL_INTERVAL_SECONDS,
            "poll interval seconds",
        )?;

        if let Some(ref cookie) = self.notegpt_cookie {
            ConfigValidator::validate_header_value(cookie, EnvVars::NOTEGPT_COOKIES)?;
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SonggenError::Internal(e.into()))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("io", "songgen", "songgen-bot")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Wall-clock budget for one generation job
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds)
    }

    /// Pause between consecutive status polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn create_client(&self) -> Result<crate::core::notegpt::NotegptClient> {
        crate::core::notegpt::NotegptClient::from_config(self)
    }
}
