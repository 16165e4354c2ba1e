//! Error handling for the songgen-bot application
//!
//! This module provides a hierarchical error system with proper error handling
//! and user-friendly error messages. Fatal errors (configuration, Telegram
//! session) abort startup; generation failures are per-command and render as
//! chat replies instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SonggenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Missing required environment variable: {var}")]
    MissingVar { var: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Why a single generation job produced no track.
///
/// The `Display` text of each variant is sent verbatim to the chat (prefixed
/// with `Error: `), so the wording here is part of the bot's user interface.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Auth Failed. Cookies expired or invalid.")]
    AuthFailed,

    #[error("Failed to start generation.")]
    StartFailed,

    #[error("Server did not return a Task ID.")]
    MissingJobId,

    #[error("Generation Failed.")]
    GenerationFailed,

    #[error("Timeout: The AI took too long.")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, SonggenError>;

impl From<toml::de::Error> for SonggenError {
    fn from(err: toml::de::Error) -> Self {
        SonggenError::Config(ConfigError::InvalidFormat(err))
    }
}
