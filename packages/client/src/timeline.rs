//! Waterfall breakdown of a transfer's elapsed time
//!
//! Engines report timing as cumulative offsets from the start of the transfer.
//! [`Timeline::from_samples`] turns those offsets into sequential phase
//! durations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Five cumulative timing samples in fractional seconds, as an engine reports
/// them after a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingSamples {
    pub total: f64,
    pub name_lookup: f64,
    pub connect: f64,
    pub pre_transfer: f64,
    pub start_transfer: f64,
}

impl TimingSamples {
    /// Samples given as cumulative milliseconds, in the order the phases happen.
    #[must_use]
    pub fn from_millis(
        name_lookup: u64,
        connect: u64,
        pre_transfer: u64,
        start_transfer: u64,
        total: u64,
    ) -> Self {
        let secs = |ms: u64| ms as f64 / 1000.0;
        Self {
            total: secs(total),
            name_lookup: secs(name_lookup),
            connect: secs(connect),
            pre_transfer: secs(pre_transfer),
            start_transfer: secs(start_transfer),
        }
    }
}

/// Phase durations of one transfer, in whole milliseconds.
///
/// ```
/// use xfer_client::{Timeline, TimingSamples};
///
/// let timeline = Timeline::from_samples(TimingSamples::from_millis(20, 55, 56, 120, 300));
/// assert_eq!(timeline.dns_cost, 20);
/// assert_eq!(timeline.connect_cost, 35);
/// assert_eq!(timeline.download_cost, 180);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeline {
    pub total_cost: u64,
    pub dns_cost: u64,
    pub connect_cost: u64,
    /// Time between connect and the start of the transfer proper
    pub upload_cost: u64,
    pub download_cost: u64,
    /// Time to first byte after the request was sent
    pub waiting_cost: u64,
}

impl Timeline {
    /// Derives the breakdown. Each sample is truncated to whole milliseconds
    /// before subtracting; a phase that would be negative is reported as 0.
    #[must_use]
    pub fn from_samples(samples: TimingSamples) -> Self {
        let total = millis(samples.total);
        let name_lookup = millis(samples.name_lookup);
        let connect = millis(samples.connect);
        let pre_transfer = millis(samples.pre_transfer);
        let start_transfer = millis(samples.start_transfer);

        Self {
            total_cost: non_negative(total),
            dns_cost: non_negative(name_lookup),
            connect_cost: non_negative(connect.saturating_sub(name_lookup)),
            upload_cost: non_negative(pre_transfer.saturating_sub(connect)),
            download_cost: non_negative(total.saturating_sub(start_transfer)),
            waiting_cost: non_negative(start_transfer.saturating_sub(pre_transfer)),
        }
    }

    /// Sum of the five phases. Equals `total_cost` whenever the samples were
    /// non-decreasing.
    #[must_use]
    pub fn phases_sum(&self) -> u64 {
        [self.connect_cost, self.upload_cost, self.waiting_cost, self.download_cost]
            .into_iter()
            .fold(self.dns_cost, u64::saturating_add)
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_cost)
    }

    #[must_use]
    pub fn dns(&self) -> Duration {
        Duration::from_millis(self.dns_cost)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_cost)
    }

    #[must_use]
    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_cost)
    }

    #[must_use]
    pub fn waiting(&self) -> Duration {
        Duration::from_millis(self.waiting_cost)
    }

    #[must_use]
    pub fn download(&self) -> Duration {
        Duration::from_millis(self.download_cost)
    }
}

// `as` truncates toward zero and maps NaN to 0
fn millis(secs: f64) -> i64 {
    (secs * 1000.0) as i64
}

fn non_negative(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}
