use std::error::Error as StdError;
use std::fmt;

use crate::engine::TransferCode;

/// A Result alias where the Err case is `xfer_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors raised by a transfer session or the fluent layer above it.
///
/// Transfer failures reported by the engine (DNS, connect, TLS, timeout) are
/// not errors at the session level; they come back as a non-success
/// [`TransferCode`] inside the outcome. Only the fluent API turns them into
/// [`Kind::Transfer`].
#[derive(Clone)]
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub url: Option<String>,
}

impl Clone for Inner {
    fn clone(&self) -> Self {
        Inner {
            kind: self.kind.clone(),
            source: None, // Cannot clone trait objects, so we lose the source
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Kind {
    /// The engine handle could not be created
    Init,
    /// Operation attempted after `close()`
    Closed,
    /// The engine rejected an option, or the value kind did not match the key
    Option,
    /// An info query failed
    Info,
    /// Invalid URL, header or configuration supplied by the caller
    Builder,
    /// The request body could not be prepared
    Body,
    /// Response body could not be decoded
    Decode,
    /// Non-success transfer code surfaced by the fluent layer
    Transfer(TransferCode),
    /// Response status rejected by `error_for_status`
    Status(http::StatusCode),
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.inner.url.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("xfer::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Init => f.write_str("transfer handle could not be created")?,
            Kind::Closed => f.write_str("transfer session is closed")?,
            Kind::Option => f.write_str("transfer option rejected")?,
            Kind::Info => f.write_str("transfer info unavailable")?,
            Kind::Builder => f.write_str("builder error")?,
            Kind::Body => f.write_str("request body error")?,
            Kind::Decode => f.write_str("error decoding response body")?,
            Kind::Transfer(code) => write!(f, "transfer failed ({code})")?,
            Kind::Status(code) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else {
                    "HTTP status server error"
                };
                write!(f, "{prefix} ({code})")?;
            }
        }

        if let Some(ref url) = self.inner.url {
            write!(f, " for url ({url})")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
