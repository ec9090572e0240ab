//! Session configuration presets

use std::time::Duration;

use super::{ConfigDefaults, SessionConfig};

impl SessionConfig {
    /// Defaults without verbose diagnostics.
    ///
    /// # Examples
    /// ```
    /// use xfer_client::config::SessionConfig;
    ///
    /// let config = SessionConfig::quiet();
    /// assert!(!config.verbose);
    /// assert!(config.no_signal);
    /// ```
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            ..Self::default()
        }
    }

    /// Settings for talking to HTTP APIs: bounded timeouts, redirects followed
    /// up to a limit, and an identifying user agent.
    ///
    /// # Examples
    /// ```
    /// use xfer_client::config::SessionConfig;
    ///
    /// let config = SessionConfig::api_client();
    /// assert!(config.follow_location);
    /// assert_eq!(config.max_redirects, Some(10));
    /// assert!(config.validate().is_ok());
    /// ```
    #[must_use]
    pub fn api_client() -> Self {
        Self {
            verbose: false,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(ConfigDefaults::DEFAULT_USER_AGENT.to_string()),
            follow_location: true,
            max_redirects: Some(10),
            ..Self::default()
        }
    }

    /// Large uploads and downloads: no overall timeout, only a connect bound.
    #[must_use]
    pub fn bulk_transfer() -> Self {
        Self {
            verbose: false,
            timeout: None,
            connect_timeout: Some(Duration::from_secs(30)),
            ..Self::default()
        }
    }
}
