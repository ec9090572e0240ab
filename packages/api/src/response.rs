//! Decoded response of one fluent request

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use xfer_client::{Result, Timeline, TransferOutcome, error};

/// Status, headers, body and timing of a completed request.
///
/// Headers come from the final header block, so after followed redirects
/// they describe the last response only.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Option<Version>,
    headers: HeaderMap,
    body: Bytes,
    timeline: Timeline,
    effective_url: Option<String>,
}

impl Response {
    /// Build a response from a successful transfer. `reported_status` is the
    /// status the engine reported, used when the header bytes carry no
    /// parseable status line.
    pub(crate) fn from_outcome(
        outcome: TransferOutcome,
        effective_url: Option<String>,
        reported_status: Option<u32>,
    ) -> Result<Self> {
        let head = outcome.head();
        let status = match head.status {
            Some(status) => status,
            None => reported_status
                .and_then(|code| u16::try_from(code).ok())
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| error::decode("response carried no status line"))?,
        };

        Ok(Self {
            status,
            version: head.version,
            headers: head.headers,
            body: Bytes::from(outcome.body),
            timeline: outcome.timeline,
            effective_url,
        })
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of header `name` that is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Waterfall timing of the transfer in milliseconds.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// URL of the last request made, after any followed redirects.
    #[must_use]
    pub fn effective_url(&self) -> Option<&str> {
        self.effective_url.as_deref()
    }

    /// `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(error::decode)
    }

    /// The body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the body is not valid UTF-8.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(error::decode)
    }

    /// Turn a 4xx or 5xx status into an error.
    ///
    /// # Errors
    ///
    /// Returns a [`Status`](xfer_client::Kind::Status) error carrying the
    /// status and the effective URL.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Err(error::status_code(self.effective_url.as_deref(), self.status))
        } else {
            Ok(self)
        }
    }

    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}
