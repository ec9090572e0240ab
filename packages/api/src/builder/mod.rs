//! Xfer builder API modules
//!
//! Provides the fluent API for building and executing requests on top of a
//! transfer session.

pub mod auth;
pub mod body;
pub mod core;
pub mod headers;
pub mod methods;

pub use self::core::*;
pub use self::headers::*;
