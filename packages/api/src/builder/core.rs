//! Core `XferBuilder` structures and base functionality
//!
//! Contains the main `XferBuilder` struct, its body-state markers, and the
//! methods that shape the session configuration a request runs with.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, header};
use xfer_client::Error;
use xfer_client::config::SessionConfig;

/// Content type enumeration for elegant API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
    /// text/html content type
    TextHtml,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
            ContentType::TextHtml => "text/html",
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        let essence = s.split(';').next().unwrap_or_default().trim();
        match essence {
            "application/x-www-form-urlencoded" => ContentType::ApplicationFormUrlEncoded,
            "application/octet-stream" => ContentType::ApplicationOctetStream,
            "text/plain" => ContentType::TextPlain,
            "text/html" => ContentType::TextHtml,
            _ => ContentType::ApplicationJson,
        }
    }
}

/// State marker indicating no body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodyNotSet;

/// State marker indicating a body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodySet;

/// Outgoing payload collected by the body setters.
pub(crate) enum Payload {
    Empty,
    Bytes(Bytes),
    Reader {
        reader: Box<dyn Read + Send>,
        length: u64,
    },
}

impl Payload {
    pub(crate) fn describe(&self) -> String {
        match self {
            Payload::Empty => "none".to_string(),
            Payload::Bytes(bytes) => format!("{} bytes", bytes.len()),
            Payload::Reader { length, .. } => format!("stream of {length} bytes"),
        }
    }
}

/// Fluent builder for one request.
///
/// Type parameter `S` tracks the body state:
/// - `BodyNotSet`: Default state, body setters and `get`/`delete`/`head` available
/// - `BodySet`: Body has been set, `post`/`put`/`patch` available
pub struct XferBuilder<S = BodyNotSet> {
    /// Configuration for the session a terminal method creates
    pub(crate) config: SessionConfig,
    /// Request headers, applied in insertion order
    pub(crate) headers: HeaderMap,
    pub(crate) payload: Payload,
    /// First error raised while building; reported by the terminal method
    pub(crate) deferred: Option<Error>,
    /// Type state marker
    pub(crate) state: S,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
}

impl XferBuilder<BodyNotSet> {
    /// Start building a request that runs with `config`.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            headers: HeaderMap::new(),
            payload: Payload::Empty,
            deferred: None,
            state: BodyNotSet,
            debug_enabled: false,
        }
    }

    /// Shorthand for setting Content-Type to application/json
    #[must_use]
    pub fn json() -> Self {
        Self::new(SessionConfig::default()).content_type(ContentType::ApplicationJson)
    }

    /// Shorthand for setting Content-Type to application/x-www-form-urlencoded
    #[must_use]
    pub fn form_urlencoded() -> Self {
        Self::new(SessionConfig::default()).content_type(ContentType::ApplicationFormUrlEncoded)
    }
}

impl Default for XferBuilder<BodyNotSet> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<S> XferBuilder<S> {
    /// Enable debug logging for this request
    ///
    /// Logs the request line, the body summary and the response status via
    /// the `log` facade at debug level.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::json()
    ///     .debug()
    ///     .get("https://api.example.com/data");
    /// ```
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Set content type using the `ContentType` enum
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type.as_str()),
        )
    }

    /// Abort the transfer when it takes longer than `timeout` overall.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Give up connecting after `timeout`.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Follow `Location` redirects, at most `max` of them.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// let response = Xfer::new()
    ///     .follow_redirects(5)
    ///     .get("https://example.com/moved");
    /// ```
    #[must_use]
    pub fn follow_redirects(mut self, max: u32) -> Self {
        self.config.follow_location = true;
        self.config.max_redirects = Some(max);
        self
    }

    /// Content type declared by the headers, if any.
    pub(crate) fn declared_content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Keep the first building error; later ones are usually its consequence.
    pub(crate) fn defer(&mut self, error: Error) {
        if self.deferred.is_none() {
            self.deferred = Some(error);
        }
    }

    pub(crate) fn with_state<T>(self, payload: Payload, state: T) -> XferBuilder<T> {
        XferBuilder {
            config: self.config,
            headers: self.headers,
            payload,
            deferred: self.deferred,
            state,
            debug_enabled: self.debug_enabled,
        }
    }
}

impl<S> fmt::Debug for XferBuilder<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XferBuilder")
            .field("config", &self.config)
            .field("headers", &self.headers)
            .field("payload", &self.payload.describe())
            .field("deferred", &self.deferred)
            .field("state", &self.state)
            .field("debug_enabled", &self.debug_enabled)
            .finish()
    }
}
