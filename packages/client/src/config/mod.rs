//! Session configuration
//!
//! [`SessionConfig`] holds the handle-level settings a session re-applies
//! before every transfer. The fixed options every transfer carries
//! (`NoSignal`, `Expect100TimeoutMs`, `Verbose`) are part of it so callers can
//! see exactly what the engine receives.

use std::time::Duration;

pub mod builder;
pub mod presets;
pub mod validation;

pub use builder::SessionConfigBuilder;
pub use validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};

use crate::engine::{Opt, OptValue};

/// Handle-level settings applied by `Session::configure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Emit verbose diagnostics through the debug role (logged at trace level)
    pub verbose: bool,
    /// Keep the engine from installing signal handlers
    pub no_signal: bool,
    /// How long to wait for `100 Continue`; zero disables the wait
    pub expect_100_timeout: Duration,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub follow_location: bool,
    pub max_redirects: Option<u32>,
    /// Verify the peer certificate and host name on TLS connections
    pub verify_tls: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            no_signal: true,
            expect_100_timeout: Duration::ZERO,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            follow_location: false,
            max_redirects: None,
            verify_tls: true,
        }
    }
}

impl SessionConfig {
    /// Start a [`SessionConfigBuilder`] from the defaults.
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }

    /// Options a session installs before every transfer, in installation order.
    ///
    /// The fixed options always come first; the rest only appear when set.
    #[must_use]
    pub fn standard_options(&self) -> Vec<(Opt, OptValue)> {
        let mut options = vec![
            (Opt::NoSignal, OptValue::Long(i64::from(self.no_signal))),
            (Opt::Expect100TimeoutMs, OptValue::Long(millis(self.expect_100_timeout))),
            (Opt::Verbose, OptValue::Long(i64::from(self.verbose))),
        ];

        if let Some(timeout) = self.timeout {
            options.push((Opt::TimeoutMs, OptValue::Long(millis(timeout))));
        }
        if let Some(timeout) = self.connect_timeout {
            options.push((Opt::ConnectTimeoutMs, OptValue::Long(millis(timeout))));
        }
        if let Some(agent) = &self.user_agent {
            options.push((Opt::UserAgent, OptValue::Str(agent.clone())));
        }
        if self.follow_location {
            options.push((Opt::FollowLocation, OptValue::Long(1)));
            if let Some(max) = self.max_redirects {
                options.push((Opt::MaxRedirs, OptValue::Long(i64::from(max))));
            }
        }
        if !self.verify_tls {
            options.push((Opt::SslVerifyPeer, OptValue::Long(0)));
            options.push((Opt::SslVerifyHost, OptValue::Long(0)));
        }
        options
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_installs_only_fixed_options() {
        let options = SessionConfig::default().standard_options();
        assert_eq!(
            options,
            vec![
                (Opt::NoSignal, OptValue::Long(1)),
                (Opt::Expect100TimeoutMs, OptValue::Long(0)),
                (Opt::Verbose, OptValue::Long(1)),
            ]
        );
    }

    #[test]
    fn redirect_limit_requires_follow_location() {
        let config = SessionConfig {
            max_redirects: Some(3),
            ..SessionConfig::default()
        };
        assert!(
            !config
                .standard_options()
                .iter()
                .any(|(opt, _)| *opt == Opt::MaxRedirs)
        );
    }
}
