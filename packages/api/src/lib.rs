//! Fluent request API over blocking libcurl transfer sessions
//!
//! Every terminal method runs one transfer to completion on the calling
//! thread and returns a [`Response`] carrying the status, headers, body and
//! the waterfall [`Timeline`] of the transfer.
//!
//! ```no_run
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # fn main() -> xfer::Result<()> {
//! let user: User = xfer::Xfer::json()
//!     .bearer_auth("token")
//!     .get("https://api.example.com/users/1")?
//!     .error_for_status()?
//!     .json()?;
//! println!("{}", user.name);
//! # Ok(())
//! # }
//! ```
//!
//! A caller-owned [`Session`] keeps its connection alive between requests:
//!
//! ```no_run
//! use http::Method;
//! use xfer::{Session, Xfer};
//!
//! # fn main() -> xfer::Result<()> {
//! let mut session = Session::new();
//! for id in 1..=3 {
//!     let url = format!("https://api.example.com/items/{id}");
//!     let response = Xfer::new().send_on(Method::GET, &url, &mut session)?;
//!     println!("{id}: {}", response.status());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
pub mod response;

pub use builder::{AcceptValue, BodyNotSet, BodySet, ContentType, XferBuilder, header};
pub use response::Response;

pub use xfer_client::config::SessionConfig;
pub use xfer_client::{Error, Kind, Result, Session, Timeline, TransferCode};

/// Main entry point providing static builder methods
pub struct Xfer;

impl Xfer {
    /// Create a builder with the default session configuration
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> XferBuilder {
        XferBuilder::default()
    }

    /// Create a new JSON builder
    ///
    /// Shorthand for `XferBuilder::json()`
    #[must_use]
    pub fn json() -> XferBuilder {
        XferBuilder::json()
    }

    /// Create a new form-urlencoded builder
    ///
    /// Shorthand for `XferBuilder::form_urlencoded()`
    #[must_use]
    pub fn form_urlencoded() -> XferBuilder {
        XferBuilder::form_urlencoded()
    }

    /// Create a builder whose sessions use `config`
    #[must_use]
    pub fn with_config(config: SessionConfig) -> XferBuilder {
        XferBuilder::new(config)
    }
}

/// Create a new JSON builder
///
/// Shorthand for `XferBuilder::json()`
#[must_use]
pub fn json() -> XferBuilder {
    XferBuilder::json()
}

/// Create a new form-urlencoded builder
///
/// Shorthand for `XferBuilder::form_urlencoded()`
#[must_use]
pub fn form() -> XferBuilder {
    XferBuilder::form_urlencoded()
}
