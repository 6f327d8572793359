//! Throughput snapshot and final report types.

use serde::{Deserialize, Serialize};

/// 2^30 bytes.
pub const BYTES_PER_GIB: u64 = 1 << 30;

/// A single throughput reading taken on a reporting tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThroughputSnapshot {
    /// Records received since the sink started
    pub received: u64,
    /// Whole seconds since the first record
    pub elapsed_secs: u64,
    /// `received / elapsed_secs`, floored
    pub elements_per_sec: u64,
    /// `received * record_size_bytes / elapsed_secs`, floored
    pub bytes_per_sec: u64,
    /// `received * record_size_bytes / 2^30`, floored
    pub gib_received: u64,
}

impl ThroughputSnapshot {
    /// Compute a snapshot, or `None` when less than a second has elapsed.
    pub fn compute(received: u64, elapsed_secs: u64, record_size_bytes: u64) -> Option<Self> {
        if elapsed_secs == 0 {
            return None;
        }
        let bytes = total_bytes(received, record_size_bytes);
        Some(Self {
            received,
            elapsed_secs,
            elements_per_sec: received / elapsed_secs,
            bytes_per_sec: bytes / elapsed_secs,
            gib_received: bytes / BYTES_PER_GIB,
        })
    }
}

/// Summary of one sink instance, produced when it is cleaned up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReport {
    /// Sink instance index
    pub sink_id: usize,
    /// Records received
    pub received: u64,
    /// Whole seconds since the first record (0 if none arrived)
    pub elapsed_secs: u64,
    /// Floored element rate, 0 when no full second has elapsed
    pub elements_per_sec: u64,
    /// Bytes received, overhead included
    pub bytes_received: u64,
    /// Floored GiB received
    pub gib_received: u64,
}

impl SinkReport {
    pub fn new(sink_id: usize, received: u64, elapsed_secs: u64, record_size_bytes: u64) -> Self {
        let bytes_received = total_bytes(received, record_size_bytes);
        Self {
            sink_id,
            received,
            elapsed_secs,
            elements_per_sec: received.checked_div(elapsed_secs).unwrap_or(0),
            bytes_received,
            gib_received: bytes_received / BYTES_PER_GIB,
        }
    }

    /// Floored byte rate, 0 when no full second has elapsed.
    pub fn bytes_per_sec(&self) -> u64 {
        self.bytes_received.checked_div(self.elapsed_secs).unwrap_or(0)
    }
}

/// `received * record_size_bytes`, saturating instead of wrapping.
fn total_bytes(received: u64, record_size_bytes: u64) -> u64 {
    let bytes = received as u128 * record_size_bytes as u128;
    u64::try_from(bytes).unwrap_or(u64::MAX)
}
