//! # xfer client
//!
//! Blocking transfer sessions over libcurl.
//!
//! A [`Session`] owns one native handle and the state around a transfer:
//! request headers, an optional outgoing body, and the buffers the engine's
//! callbacks fill. [`Session::perform_fully`] runs one transfer and returns
//! the result code, the raw response headers and body, and a [`Timeline`]
//! breaking the elapsed time into phases.
//!
//! ## Features
//!
//! - **Typed option and info keys** with libcurl's numeric identifiers
//! - **Scoped callbacks**: header, body and read roles borrow the session only
//!   for the duration of one transfer
//! - **Guaranteed cleanup**: header lists released and the handle reset on
//!   every exit path
//! - **Timing waterfall** derived from the engine's cumulative samples
//! - **Scripted engine** for exercising sessions without a network
//!
//! ## Usage
//!
//! ```no_run
//! use xfer_client::Session;
//!
//! # fn main() -> xfer_client::Result<()> {
//! let mut session = Session::with_url("https://example.com/upload")?;
//! session.set_verb("POST")?;
//! session.set_request_body(&b"{\"name\":\"xfer\"}"[..], "application/json")?;
//!
//! let (code, headers, body, timeline) = session.perform_fully()?.into_parts();
//! if code.is_success() {
//!     println!("{} header bytes, {} body bytes", headers.len(), body.len());
//!     println!("dns {} ms, waiting {} ms", timeline.dns_cost, timeline.waiting_cost);
//! } else {
//!     eprintln!("failed: {}", session.str_error(code));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod session;
pub mod telemetry;
pub mod timeline;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
