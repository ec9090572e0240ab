//! Authentication methods for HTTP requests
//!
//! Provides convenient methods for setting authentication headers including
//! API keys, basic authentication, and bearer token authentication.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::builder::core::XferBuilder;
use crate::builder::headers::header;

impl<S> XferBuilder<S> {
    /// Set API key authentication header
    ///
    /// Adds an `X-API-Key` header with the provided API key value.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::json()
    ///     .api_key("your-api-key-here")
    ///     .get("https://api.example.com/protected");
    /// ```
    #[must_use]
    pub fn api_key(self, key: &str) -> Self {
        self.header_str(header::X_API_KEY, key)
    }

    /// Set basic authentication header
    ///
    /// The `user:password` pair is base64 encoded into an `Authorization:
    /// Basic` header.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::json()
    ///     .basic_auth("username", "password")
    ///     .get("https://api.example.com/protected");
    /// ```
    #[must_use]
    pub fn basic_auth(self, user: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{user}:{password}"));
        self.header_str(header::AUTHORIZATION.as_str(), &format!("Basic {encoded}"))
    }

    /// Set bearer token authentication header
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::json()
    ///     .bearer_auth("your-oauth-token-here")
    ///     .get("https://api.example.com/protected");
    /// ```
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header_str(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }
}
