use std::env;
use crate::error::{ConfigError, Result};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    pub const GENERATE_URL: &'static str = "SONGGEN_GENERATE_URL";
    pub const STATUS_URL: &'static str = "SONGGEN_STATUS_URL";
    pub const JOB_TIMEOUT_SECONDS: &'static str = "SONGGEN_JOB_TIMEOUT_SECONDS";
    pub const POLL_INTERVAL_SECONDS: &'static str = "SONGGEN_POLL_INTERVAL_SECONDS";

    // Secrets, read from the environment only and never written to disk
    pub const TELEGRAM_BOT_TOKEN: &'static str = "TELEGRAM_BOT_TOKEN";
    pub const NOTEGPT_COOKIES: &'static str = "NOTEGPT_COOKIES";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string
    pub fn parse_string(var_name: &str) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                field: var_name.to_string(),
                reason: "contains invalid UTF-8".to_string(),
            }
            .into()),
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        if let Some(value_str) = Self::parse_string(var_name)? {
            let value = value_str.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                field: var_name.to_string(),
                reason: format!("'{}' is not a positive integer", value_str),
            })?;

            if value < min || value > max {
                return Err(ConfigError::InvalidValue {
                    field: var_name.to_string(),
                    reason: format!("must be between {} and {}, got {}", min, max, value),
                }
                .into());
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }
}
