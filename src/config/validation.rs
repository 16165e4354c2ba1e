use url::Url;
use crate::error::{ConfigError, Result};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a URL string
    pub fn validate_url(url: &str, field_name: &str) -> Result<()> {
        Url::parse(url).map_err(|e| ConfigError::InvalidValue {
            field: field_name.to_string(),
            reason: format!("invalid URL '{}': {}", url, e),
        })?;
        Ok(())
    }

    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(ConfigError::InvalidValue {
                field: field_name.to_string(),
                reason: format!("must be between {} and {}, got {}", min, max, value),
            }
            .into());
        }
        Ok(())
    }

    /// Validate that a string can travel as a single HTTP header value
    pub fn validate_header_value(value: &str, field_name: &str) -> Result<()> {
        if value.chars().any(|c| c == '\r' || c == '\n' || c == '\0') {
            return Err(ConfigError::InvalidValue {
                field: field_name.to_string(),
                reason: "contains line breaks or NUL bytes".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("https://notegpt.io", "endpoint").is_ok());
        assert!(ConfigValidator::validate_url("not-a-url", "endpoint").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(ConfigValidator::validate_range(5u64, 1u64, 10u64, "test").is_ok());
        assert!(ConfigValidator::validate_range(15u64, 1u64, 10u64, "test").is_err());
        assert!(ConfigValidator::validate_range(0u64, 1u64, 10u64, "test").is_err());
    }

    #[test]
    fn test_validate_header_value() {
        assert!(ConfigValidator::validate_header_value("sid=abc123; theme=dark", "cookie").is_ok());
        assert!(ConfigValidator::validate_header_value("sid=abc\r\nHost: evil", "cookie").is_err());
        assert!(ConfigValidator::validate_header_value("sid=\0", "cookie").is_err());
    }
}
