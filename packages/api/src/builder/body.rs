//! Request body handling functionality
//!
//! Provides methods for setting request bodies with automatic serialization
//! for JSON, form-urlencoded, and other content types.

use std::io::Read;

use bytes::Bytes;
use serde::Serialize;
use xfer_client::error;

use crate::builder::core::{BodyNotSet, BodySet, ContentType, Payload, XferBuilder};

impl XferBuilder<BodyNotSet> {
    /// Set the request body with automatic serialization
    ///
    /// Serializes according to the Content-Type header:
    /// - `application/x-www-form-urlencoded`: form serialization
    /// - anything else: JSON serialization, declaring `application/json`
    ///   when no content type was set
    ///
    /// A serialization failure is reported when the request is sent.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::Xfer;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User {
    ///     name: String,
    ///     email: String,
    /// }
    ///
    /// let user = User {
    ///     name: "John Doe".to_string(),
    ///     email: "john@example.com".to_string(),
    /// };
    ///
    /// let response = Xfer::json()
    ///     .body(&user)
    ///     .post("https://api.example.com/users");
    /// ```
    #[must_use]
    pub fn body<T: Serialize + ?Sized>(self, body: &T) -> XferBuilder<BodySet> {
        let declared = self.declared_content_type().map(ContentType::from);
        let mut builder = match declared {
            Some(_) => self,
            None => self.content_type(ContentType::ApplicationJson),
        };

        let serialized = if declared == Some(ContentType::ApplicationFormUrlEncoded) {
            serde_urlencoded::to_string(body)
                .map(String::into_bytes)
                .map_err(error::body)
        } else {
            serde_json::to_vec(body).map_err(error::body)
        };

        let bytes = serialized.unwrap_or_else(|e| {
            log::warn!("Request body could not be serialized: {e}");
            builder.defer(e);
            Vec::new()
        });

        if builder.debug_enabled {
            log::debug!(
                "Xfer: set request body ({} bytes, content-type: {})",
                bytes.len(),
                builder.declared_content_type().unwrap_or_default()
            );
        }

        builder.with_state(Payload::Bytes(Bytes::from(bytes)), BodySet)
    }

    /// Set raw bytes as request body
    ///
    /// No serialization happens and no content type is implied.
    ///
    /// # Examples
    /// ```no_run
    /// use xfer::{ContentType, Xfer};
    ///
    /// let response = Xfer::new()
    ///     .content_type(ContentType::ApplicationOctetStream)
    ///     .raw_body(b"custom binary data".to_vec())
    ///     .post("https://api.example.com/upload");
    /// ```
    #[must_use]
    pub fn raw_body(self, bytes: impl Into<Bytes>) -> XferBuilder<BodySet> {
        let bytes = bytes.into();
        if self.debug_enabled {
            log::debug!("Xfer: set raw request body ({} bytes)", bytes.len());
        }
        self.with_state(Payload::Bytes(bytes), BodySet)
    }

    /// Set text content as request body
    ///
    /// Sets Content-Type to text/plain if not already set.
    #[must_use]
    pub fn text_body(self, text: &str) -> XferBuilder<BodySet> {
        if self.debug_enabled {
            log::debug!("Xfer: set text request body ({} chars)", text.len());
        }

        let builder = if self.declared_content_type().is_none() {
            self.content_type(ContentType::TextPlain)
        } else {
            self
        };
        let bytes = Bytes::copy_from_slice(text.as_bytes());
        builder.with_state(Payload::Bytes(bytes), BodySet)
    }

    /// Stream exactly `length` bytes from `reader` as the request body.
    ///
    /// The reader is pulled on the transfer thread while the request is sent.
    ///
    /// # Examples
    /// ```no_run
    /// use std::fs::File;
    /// use xfer::{ContentType, Xfer};
    ///
    /// # fn main() -> std::io::Result<()> {
    /// let file = File::open("upload.bin")?;
    /// let length = file.metadata()?.len();
    /// let response = Xfer::new()
    ///     .content_type(ContentType::ApplicationOctetStream)
    ///     .stream_body(file, length)
    ///     .put("https://api.example.com/blobs/1");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn stream_body<R>(self, reader: R, length: u64) -> XferBuilder<BodySet>
    where
        R: Read + Send + 'static,
    {
        if self.debug_enabled {
            log::debug!("Xfer: set streamed request body ({length} bytes)");
        }
        let payload = Payload::Reader {
            reader: Box::new(reader),
            length,
        };
        self.with_state(payload, BodySet)
    }
}
