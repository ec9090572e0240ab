//! Transfer statistics

pub mod transfer_stats;

pub use transfer_stats::{TransferStats, TransferStatsSnapshot};
