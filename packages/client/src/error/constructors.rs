use super::helpers::{HandleUnavailable, InfoKindMismatch, OptionKindMismatch, SessionClosed};
use super::types::{Error, Kind};
use crate::engine::{Info, Opt, TransferCode, ValueKind};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for an engine handle that could not be created.
pub fn init<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Init).with(e.into())
}

/// Creates an `Error` for an operation on a session whose handle never existed.
pub fn unavailable() -> Error {
    Error::new(Kind::Init).with(HandleUnavailable)
}

/// Creates an `Error` for an operation on a closed session.
pub fn closed() -> Error {
    Error::new(Kind::Closed).with(SessionClosed)
}

/// Creates an `Error` for an option the engine rejected.
pub fn option<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Option).with(e.into())
}

pub fn option_kind(opt: Opt, expected: ValueKind, given: ValueKind) -> Error {
    Error::new(Kind::Option).with(OptionKindMismatch {
        opt,
        expected,
        given,
    })
}

/// Creates an `Error` for a failed info query.
pub fn info<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Info).with(e.into())
}

pub fn info_kind(info: Info, expected: ValueKind, given: ValueKind) -> Error {
    Error::new(Kind::Info).with(InfoKindMismatch {
        info,
        expected,
        given,
    })
}

/// Creates an `Error` for a builder error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

pub fn invalid_url<E: Into<BoxError>>(e: E, url: &str) -> Error {
    Error::new(Kind::Builder).with(e.into()).with_url(url)
}

pub fn invalid_header<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

pub fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a body error.
pub fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e.into())
}

/// Creates an `Error` for a decode error.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e.into())
}

/// Creates an `Error` for a transfer that finished with a non-success code.
pub fn transfer(code: TransferCode, message: String) -> Error {
    Error::new(Kind::Transfer(code)).with(message)
}

pub fn status_code(url: Option<&str>, status: http::StatusCode) -> Error {
    let err = Error::new(Kind::Status(status));
    match url {
        Some(url) => err.with_url(url),
        None => err,
    }
}
