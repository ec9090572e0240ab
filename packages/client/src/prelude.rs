//! The types most users of a session need.

// Sessions and what they produce
pub use crate::session::{BodyStream, RequestBody, Session, TransferOutcome};
pub use crate::timeline::{Timeline, TimingSamples};

// Engine seam
pub use crate::engine::{
    CurlEngine, HeaderList, Info, Opt, OptValue, ScriptedEngine, ScriptedResponse, TransferCode,
    TransferEngine, TransferHandler, TransferRecord, ValueKind,
};

// Error types
pub use crate::error::{Error, Kind, Result};

// Configuration
pub use crate::config::{ConfigurationError, SessionConfig, SessionConfigBuilder};

// Telemetry types
pub use crate::telemetry::{TransferStats, TransferStatsSnapshot};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
