//! Transfer engine seam
//!
//! A [`TransferEngine`] is one native transfer handle: configured through typed
//! option keys, executed with a blocking `perform`, and queried afterwards
//! through typed info keys. During `perform` the engine drives the three
//! callback roles of a [`TransferHandler`] on the calling thread.

pub mod libcurl;
pub mod opt;
pub mod scripted;

use std::fmt;

pub use libcurl::CurlEngine;
pub use opt::{HeaderList, Info, Opt, OptValue, ValueKind};
pub use scripted::{ScriptedEngine, ScriptedResponse, TransferRecord};

use crate::error::Result;

/// Result code of one transfer, as reported by the engine.
///
/// Zero means success; every other value is an engine-specific failure that
/// callers interpret themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransferCode(pub i32);

impl TransferCode {
    pub const OK: TransferCode = TransferCode(0);
    pub const UNSUPPORTED_PROTOCOL: TransferCode = TransferCode(1);
    pub const URL_MALFORMAT: TransferCode = TransferCode(3);
    pub const COULDNT_RESOLVE_HOST: TransferCode = TransferCode(6);
    pub const COULDNT_CONNECT: TransferCode = TransferCode(7);
    pub const HTTP_RETURNED_ERROR: TransferCode = TransferCode(22);
    pub const WRITE_ERROR: TransferCode = TransferCode(23);
    pub const READ_ERROR: TransferCode = TransferCode(26);
    pub const OPERATION_TIMEDOUT: TransferCode = TransferCode(28);
    pub const SSL_CONNECT_ERROR: TransferCode = TransferCode(35);
    pub const ABORTED_BY_CALLBACK: TransferCode = TransferCode(42);
    pub const TOO_MANY_REDIRECTS: TransferCode = TransferCode(47);
    pub const GOT_NOTHING: TransferCode = TransferCode(52);
    pub const SEND_ERROR: TransferCode = TransferCode(55);
    pub const RECV_ERROR: TransferCode = TransferCode(56);

    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self == TransferCode::OK
    }

    #[inline]
    #[must_use]
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TransferCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}", self.0)
    }
}

/// Answer of the body-to-send role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Number of bytes written into the buffer; fewer than requested ends the body
    Data(usize),
    /// Abort the transfer; no body may be sent
    Abort,
}

/// Category of a verbose diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    Text,
    HeaderIn,
    HeaderOut,
    DataIn,
    DataOut,
    SslDataIn,
    SslDataOut,
}

/// The callback roles an engine invokes while a transfer runs.
///
/// `header` and `write` must return the number of bytes consumed; anything
/// other than `chunk.len()` makes the engine fail the transfer.
pub trait TransferHandler {
    /// A chunk of response header bytes arrived.
    fn header(&mut self, chunk: &[u8]) -> usize;

    /// A chunk of response body bytes arrived.
    fn write(&mut self, chunk: &[u8]) -> usize;

    /// The engine wants up to `buf.len()` bytes of request body.
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome;

    /// Verbose diagnostics, only emitted when `Opt::Verbose` is on.
    fn debug(&mut self, _kind: DebugKind, _data: &[u8]) {}
}

/// One native transfer handle.
pub trait TransferEngine: Send + Sized {
    /// Create a fresh handle.
    fn init() -> Result<Self>;

    /// Create a new handle carrying this handle's transport configuration.
    fn duplicate(&self) -> Result<Self>;

    /// Set one option. The value kind must match [`Opt::kind`].
    fn set(&mut self, opt: Opt, value: OptValue) -> Result<()>;

    fn get_long(&mut self, info: Info) -> Result<i64>;

    fn get_double(&mut self, info: Info) -> Result<f64>;

    /// `Ok(None)` when the engine has no value for the key.
    fn get_string(&mut self, info: Info) -> Result<Option<String>>;

    /// Run one transfer to completion, blocking the calling thread.
    fn perform(&mut self, handler: &mut dyn TransferHandler) -> TransferCode;

    /// Restore every option to its default. Connection caches may survive.
    fn reset(&mut self);

    /// Human-readable message for a result code.
    fn describe(code: TransferCode) -> String;
}

/// Checks that `value` fits `opt` before it reaches an engine.
pub(crate) fn check_kind(opt: Opt, value: &OptValue) -> Result<()> {
    let expected = opt.kind();
    let given = value.kind();
    // A long is accepted where a 64-bit value is expected
    if expected == given || (expected == ValueKind::Large && given == ValueKind::Long) {
        Ok(())
    } else {
        Err(crate::error::option_kind(opt, expected, given))
    }
}
