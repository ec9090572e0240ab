//! HTTP helpers for captured transfer data

pub mod headers;

pub use headers::{ResponseHead, parse_header_block};
