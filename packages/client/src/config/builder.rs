//! Fluent construction of [`SessionConfig`]

use std::time::Duration;

use super::{ConfigResult, SessionConfig};

/// Builder for [`SessionConfig`]; `build` validates the result.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use xfer_client::config::SessionConfig;
///
/// let config = SessionConfig::builder()
///     .verbose(false)
///     .timeout(Duration::from_secs(5))
///     .follow_redirects(3)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.max_redirects, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "builders do nothing until `build` is called"]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. a preset.
    pub fn from_config(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn no_signal(mut self, no_signal: bool) -> Self {
        self.config.no_signal = no_signal;
        self
    }

    pub fn expect_100_timeout(mut self, timeout: Duration) -> Self {
        self.config.expect_100_timeout = timeout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Follow `Location` headers, at most `max` times.
    pub fn follow_redirects(mut self, max: u32) -> Self {
        self.config.follow_location = true;
        self.config.max_redirects = Some(max);
        self
    }

    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found by
    /// [`SessionConfig::validate`].
    pub fn build(self) -> ConfigResult<SessionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
