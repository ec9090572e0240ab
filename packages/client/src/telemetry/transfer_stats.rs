//! Lock-free transfer counters with cache-padded atomics
//!
//! A session records one entry per `perform_fully`. The counters sit behind an
//! `Arc` so several sessions (for example duplicates of one another) can share
//! them across threads.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::engine::TransferCode;
use crate::timeline::Timeline;

/// Thread-safe transfer statistics. Each counter is cache-padded to prevent
/// false sharing.
#[derive(Debug, Default)]
pub struct TransferStats {
    /// Transfers performed, successful or not
    pub transfers: CachePadded<AtomicUsize>,
    /// Transfers that ended with a non-success code
    pub failed_transfers: CachePadded<AtomicUsize>,
    /// Request body bytes handed to the engine
    pub bytes_sent: CachePadded<AtomicU64>,
    /// Response header and body bytes received
    pub bytes_received: CachePadded<AtomicU64>,
    /// Sum of `Timeline::total_cost` in milliseconds
    pub total_time_ms: CachePadded<AtomicU64>,
    /// New connections opened, as reported by the engine
    pub connections_opened: CachePadded<AtomicU64>,
}

/// Immutable snapshot of transfer statistics at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStatsSnapshot {
    pub transfers: usize,
    pub failed_transfers: usize,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub total_time_ms: u64,
    pub connections_opened: u64,
}

impl TransferStatsSnapshot {
    /// Transfers that ended with code 0.
    #[must_use]
    pub fn successful_transfers(&self) -> usize {
        self.transfers.saturating_sub(self.failed_transfers)
    }

    /// Mean total time per transfer in milliseconds, `None` before the first transfer.
    #[must_use]
    pub fn average_time_ms(&self) -> Option<u64> {
        (self.transfers > 0).then(|| self.total_time_ms / self.transfers as u64)
    }
}

impl TransferStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished transfer.
    pub fn record(
        &self,
        code: TransferCode,
        bytes_sent: u64,
        bytes_received: u64,
        timeline: &Timeline,
        connections: u64,
    ) {
        self.transfers.fetch_add(1, Ordering::Relaxed);
        if !code.is_success() {
            self.failed_transfers.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes_sent.fetch_add(bytes_sent, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes_received, Ordering::Relaxed);
        self.total_time_ms
            .fetch_add(timeline.total_cost, Ordering::Relaxed);
        self.connections_opened
            .fetch_add(connections, Ordering::Relaxed);
    }

    /// Read every counter with relaxed ordering.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> TransferStatsSnapshot {
        TransferStatsSnapshot {
            transfers: self.transfers.load(Ordering::Relaxed),
            failed_transfers: self.failed_transfers.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            total_time_ms: self.total_time_ms.load(Ordering::Relaxed),
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
        }
    }
}
