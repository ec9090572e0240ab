//! Configuration validation

use std::time::Duration;

use super::SessionConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidTimeout` - if timeout values are zero or exceed limits
    /// - `InvalidParameter` - if parameters are outside valid ranges
    /// - `Conflict` - if configuration settings conflict with each other
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a timeout against an upper bound
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the duration is zero or
    /// exceeds `max`.
    pub fn validate_timeout(timeout: Duration, max: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout > max {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed {}s",
                max.as_secs()
            )));
        }

        Ok(())
    }

    /// Validate numeric range
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if the value is outside
    /// the specified range [min, max] (inclusive).
    pub fn validate_range<T>(value: T, min: T, max: T, name: &str) -> ConfigResult<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} must be between {min} and {max}, got {value}"
            )));
        }

        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);
    pub const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(300);
    pub const MAX_REDIRECTS: u32 = 50;
    pub const MAX_USER_AGENT_LEN: usize = 1000;
    pub const DEFAULT_USER_AGENT: &'static str = concat!("xfer/", env!("CARGO_PKG_VERSION"));
}

impl Validator for SessionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(timeout) = self.timeout {
            ConfigValidator::validate_timeout(timeout, ConfigDefaults::MAX_TIMEOUT, "timeout")?;
        }

        if let Some(timeout) = self.connect_timeout {
            ConfigValidator::validate_timeout(
                timeout,
                ConfigDefaults::MAX_CONNECT_TIMEOUT,
                "connect_timeout",
            )?;
        }

        if let (Some(connect), Some(total)) = (self.connect_timeout, self.timeout)
            && connect > total
        {
            return Err(ConfigurationError::Conflict(
                "connect_timeout cannot exceed timeout".to_string(),
            ));
        }

        if let Some(agent) = &self.user_agent {
            ConfigValidator::validate_range(
                agent.len(),
                1,
                ConfigDefaults::MAX_USER_AGENT_LEN,
                "user_agent length",
            )?;
            if agent.contains(['\r', '\n', '\0']) {
                return Err(ConfigurationError::InvalidParameter(
                    "user_agent cannot contain control characters".to_string(),
                ));
            }
        }

        if let Some(max) = self.max_redirects {
            ConfigValidator::validate_range(max, 0, ConfigDefaults::MAX_REDIRECTS, "max_redirects")?;
            if !self.follow_location {
                return Err(ConfigurationError::Conflict(
                    "max_redirects requires follow_location".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl SessionConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub fn validate(&self) -> ConfigResult<()> {
        Validator::validate(self)
    }
}
