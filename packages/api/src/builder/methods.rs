//! HTTP method implementations
//!
//! Terminal methods run the request to completion on the calling thread and
//! return the decoded [`Response`]. `get`, `delete` and `head` take no body;
//! `post`, `put` and `patch` need one. [`XferBuilder::send_on`] runs the
//! request on a caller-owned session so its connection can be reused.

use http::{Method, header};
use xfer_client::config::SessionConfig;
use xfer_client::engine::{Opt, TransferEngine};
use xfer_client::{Result, Session, error};

use crate::builder::core::{BodyNotSet, BodySet, Payload, XferBuilder};
use crate::response::Response;

impl XferBuilder<BodyNotSet> {
    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// # fn main() -> xfer::Result<()> {
    /// let response = Xfer::json().get("https://api.example.com/users")?;
    /// println!("{} in {} ms", response.status(), response.timeline().total_cost);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(self, url: &str) -> Result<Response> {
        self.send(Method::GET, url)
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    pub fn delete(self, url: &str) -> Result<Response> {
        self.send(Method::DELETE, url)
    }

    /// Execute a HEAD request; the response body is always empty.
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    pub fn head(self, url: &str) -> Result<Response> {
        self.send(Method::HEAD, url)
    }
}

impl XferBuilder<BodySet> {
    /// Execute a POST request
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    ///
    /// # fn main() -> xfer::Result<()> {
    /// let created: serde_json::Value = Xfer::json()
    ///     .body(&serde_json::json!({"name": "xfer"}))
    ///     .post("https://api.example.com/projects")?
    ///     .error_for_status()?
    ///     .json()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn post(self, url: &str) -> Result<Response> {
        self.send(Method::POST, url)
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    pub fn put(self, url: &str) -> Result<Response> {
        self.send(Method::PUT, url)
    }

    /// Execute a PATCH request
    ///
    /// # Errors
    ///
    /// See [`XferBuilder::send`].
    pub fn patch(self, url: &str) -> Result<Response> {
        self.send(Method::PATCH, url)
    }
}

impl<S> XferBuilder<S> {
    /// Run the request on a fresh libcurl session built from this builder's
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a builder error for an invalid configuration, URL, header or
    /// body; a [`Transfer`](xfer_client::Kind::Transfer) error when the
    /// transfer itself fails; an [`Init`](xfer_client::Kind::Init) error when
    /// no handle could be created.
    pub fn send(mut self, method: Method, url: &str) -> Result<Response> {
        if let Some(error) = self.deferred.take() {
            return Err(error);
        }
        let mut session = Session::with_config(self.config.clone())?;
        self.send_on(method, url, &mut session)
    }

    /// Run the request on `session`.
    ///
    /// The session's own configuration applies; the builder's timeouts and
    /// redirect policy only shape sessions created by [`send`](Self::send).
    /// The session is reset afterwards whatever the outcome, and remains
    /// usable.
    ///
    /// # Errors
    ///
    /// As for [`send`](Self::send), plus the session's own errors when it is
    /// closed.
    pub fn send_on<E: TransferEngine>(
        mut self,
        method: Method,
        url: &str,
        session: &mut Session<E>,
    ) -> Result<Response> {
        if let Some(error) = self.deferred.take() {
            return Err(error);
        }
        if self.debug_enabled {
            log::debug!("Xfer: {method} {url} (body: {})", self.payload.describe());
        }

        if let Err(error) = self.prepare(&method, url, session) {
            session.reset();
            return Err(error);
        }

        let outcome = session.perform_fully()?;
        if !outcome.is_success() {
            let message = E::describe(outcome.code);
            if self.debug_enabled {
                log::debug!("Xfer: {method} {url} failed: {message}");
            }
            return Err(error::transfer(outcome.code, message).with_url(url));
        }

        let effective_url = session.effective_url().ok().flatten();
        let reported_status = session.response_code().ok();
        let response = Response::from_outcome(outcome, effective_url, reported_status)?;

        if self.debug_enabled {
            log::debug!(
                "Xfer: {method} {url} -> {} ({} bytes, {} ms)",
                response.status(),
                response.body().len(),
                response.timeline().total_cost
            );
        }
        Ok(response)
    }

    fn prepare<E: TransferEngine>(
        &mut self,
        method: &Method,
        url: &str,
        session: &mut Session<E>,
    ) -> Result<()> {
        session.set_url(url)?;

        let bodyless = matches!(self.payload, Payload::Empty);
        for (name, value) in &self.headers {
            // the body's type is passed with the body itself
            if bodyless && *name == header::CONTENT_TYPE {
                continue;
            }
            let value = value.to_str().map_err(error::invalid_header)?;
            session.set_header(name.as_str(), value)?;
        }

        if *method == Method::HEAD {
            session.set_verb(method.as_str())?;
            session.set_option_long(Opt::Nobody, 1)?;
        } else if *method != Method::GET {
            session.set_verb(method.as_str())?;
        }

        let content_type = self.declared_content_type().unwrap_or_default().to_owned();
        match std::mem::replace(&mut self.payload, Payload::Empty) {
            Payload::Empty => Ok(()),
            Payload::Bytes(bytes) => session.set_request_body(bytes, &content_type),
            Payload::Reader { reader, length } => {
                session.set_request_stream(reader, &content_type, length)
            }
        }
    }

    /// Configuration a session created by [`send`](Self::send) would use.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
