//! Header management and manipulation functionality
//!
//! Provides methods for setting request headers, including common ones like
//! Accept and User-Agent. A value that is not a valid header is remembered
//! and reported when the request is sent.

use http::{HeaderName, HeaderValue};
use xfer_client::error;

use crate::builder::core::{ContentType, XferBuilder};

/// Helper type for accept method that can handle both strings and ContentType enums
pub enum AcceptValue {
    /// String representation of content type
    String(String),
    /// ContentType enum variant
    ContentType(ContentType),
}

impl AcceptValue {
    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            AcceptValue::String(s) => s,
            AcceptValue::ContentType(ct) => ct.as_str(),
        }
    }
}

impl From<&str> for AcceptValue {
    fn from(s: &str) -> Self {
        AcceptValue::String(s.to_string())
    }
}

impl From<String> for AcceptValue {
    fn from(s: String) -> Self {
        AcceptValue::String(s)
    }
}

impl From<ContentType> for AcceptValue {
    fn from(ct: ContentType) -> Self {
        AcceptValue::ContentType(ct)
    }
}

/// Header constants for common HTTP headers
pub mod header {
    pub use http::header::*;

    /// Custom X-API-Key header for API authentication
    pub const X_API_KEY: &str = "x-api-key";
}

impl<S> XferBuilder<S> {
    /// Add a header to the request, replacing any earlier value for `key`.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    /// use http::{HeaderName, HeaderValue};
    ///
    /// let response = Xfer::json()
    ///     .header(
    ///         HeaderName::from_static("x-custom-header"),
    ///         HeaderValue::from_static("custom-value")
    ///     )
    ///     .get("https://api.example.com/data");
    /// ```
    #[must_use]
    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Add several headers from `(name, value)` pairs.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::json()
    ///     .headers([("user-agent", "MyApp/1.0"), ("x-api-version", "v1")])
    ///     .get("https://api.example.com/data");
    /// ```
    #[must_use]
    pub fn headers<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (name, value) in pairs {
            self = self.header_str(name, value);
        }
        self
    }

    /// Set User-Agent header
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        self.header_str(header::USER_AGENT.as_str(), user_agent)
    }

    /// Set Accept header - supports both string and ContentType enum
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::{ContentType, Xfer};
    ///
    /// let response = Xfer::json()
    ///     .accept(ContentType::ApplicationJson)
    ///     .get("https://api.example.com/data");
    /// ```
    #[must_use]
    pub fn accept<T: Into<AcceptValue>>(self, accept: T) -> Self {
        let accept_value = accept.into();
        self.header_str(header::ACCEPT.as_str(), accept_value.as_str())
    }

    pub(crate) fn header_str(mut self, name: &str, value: &str) -> Self {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                log::warn!("Skipping header with invalid name {name:?}");
                self.defer(error::invalid_header(e));
                return self;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => self.header(name, value),
            Err(e) => {
                log::warn!("Skipping header {name} with invalid value");
                self.defer(error::invalid_header(e));
                self
            }
        }
    }
}
