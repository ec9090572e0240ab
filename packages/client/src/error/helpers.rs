use std::fmt;

use crate::engine::{Info, Opt, ValueKind};

/// A marker type to indicate that the session handle was already destroyed.
#[derive(Debug)]
pub struct SessionClosed;

impl fmt::Display for SessionClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session closed")
    }
}

impl std::error::Error for SessionClosed {}

/// A marker type to indicate that the engine never produced a handle.
#[derive(Debug)]
pub struct HandleUnavailable;

impl fmt::Display for HandleUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("engine handle unavailable")
    }
}

impl std::error::Error for HandleUnavailable {}

/// An option was given a value of the wrong kind.
#[derive(Debug)]
pub struct OptionKindMismatch {
    pub opt: Opt,
    pub expected: ValueKind,
    pub given: ValueKind,
}

impl fmt::Display for OptionKindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "option {:?} ({}) takes a {} value, got {}",
            self.opt,
            self.opt.id(),
            self.expected,
            self.given
        )
    }
}

impl std::error::Error for OptionKindMismatch {}

/// An info key was queried through the wrong typed getter.
#[derive(Debug)]
pub struct InfoKindMismatch {
    pub info: Info,
    pub expected: ValueKind,
    pub given: ValueKind,
}

impl fmt::Display for InfoKindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info {:?} ({:#x}) yields a {} value, requested {}",
            self.info,
            self.info.id(),
            self.expected,
            self.given
        )
    }
}

impl std::error::Error for InfoKindMismatch {}
