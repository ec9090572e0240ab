pub mod classification;
pub mod constructors;
pub mod helpers;
pub mod types;

pub use constructors::*;
pub use helpers::{HandleUnavailable, InfoKindMismatch, OptionKindMismatch, SessionClosed};
pub use types::{Error, Inner, Kind, Result};
