//! Benchmark configuration.

use crate::error::BenchError;
use crate::record::RECORD_OVERHEAD_BYTES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw, unvalidated settings as they arrive from the command line.
///
/// Numeric fields are signed so that a negative value survives parsing and is
/// rejected by [`BenchConfig::new`] with a proper error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchSettings {
    /// Bytes per record payload.
    pub payload_size_bytes: i64,
    /// Artificial per-record delay in milliseconds (0 = disabled).
    pub artificial_delay_millis: i64,
    /// Whether the runtime keeps a ledger of acknowledged batches.
    pub fault_tolerance_enabled: bool,
    /// Records per batch.
    pub batch_size: i64,
    /// Records between throughput reports.
    pub log_every_n_records: i64,
    /// Number of generator and sink instances.
    pub parallelism: i64,
    /// Run in-process for a fixed duration instead of as a long-lived worker.
    pub run_local: bool,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            payload_size_bytes: 1000,
            artificial_delay_millis: 0,
            fault_tolerance_enabled: false,
            batch_size: 1000,
            log_every_n_records: 1_000_000,
            parallelism: 1,
            run_local: false,
        }
    }
}

/// Validated, immutable benchmark configuration.
///
/// Built once at startup and passed explicitly into every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    payload_size_bytes: usize,
    artificial_delay_millis: u64,
    fault_tolerance_enabled: bool,
    batch_size: usize,
    log_every_n_records: u64,
    parallelism: usize,
    run_local: bool,
}

impl BenchConfig {
    /// Validate raw settings.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for a negative payload size or
    /// delay, and for a batch size, log frequency, or parallelism below 1.
    pub fn new(settings: BenchSettings) -> Result<Self, BenchError> {
        let payload_size_bytes = non_negative("payload", settings.payload_size_bytes)?;
        let artificial_delay_millis = non_negative("delay", settings.artificial_delay_millis)?;
        let batch_size = positive("batchSize", settings.batch_size)?;
        let log_every_n_records = positive("logfreq", settings.log_every_n_records)?;
        let parallelism = positive("para", settings.parallelism)?;

        Ok(Self {
            payload_size_bytes: payload_size_bytes as usize,
            artificial_delay_millis,
            fault_tolerance_enabled: settings.fault_tolerance_enabled,
            batch_size: batch_size as usize,
            log_every_n_records,
            parallelism: parallelism as usize,
            run_local: settings.run_local,
        })
    }

    pub fn payload_size_bytes(&self) -> usize {
        self.payload_size_bytes
    }

    pub fn artificial_delay_millis(&self) -> u64 {
        self.artificial_delay_millis
    }

    /// Per-record throttle, `None` when disabled.
    pub fn artificial_delay(&self) -> Option<Duration> {
        (self.artificial_delay_millis > 0).then(|| Duration::from_millis(self.artificial_delay_millis))
    }

    pub fn fault_tolerance_enabled(&self) -> bool {
        self.fault_tolerance_enabled
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn log_every_n_records(&self) -> u64 {
        self.log_every_n_records
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn run_local(&self) -> bool {
        self.run_local
    }

    /// Serialized bytes per record: fixed overhead plus the configured payload.
    pub fn record_size_bytes(&self) -> u64 {
        RECORD_OVERHEAD_BYTES + self.payload_size_bytes as u64
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        // Default settings always validate.
        Self {
            payload_size_bytes: 1000,
            artificial_delay_millis: 0,
            fault_tolerance_enabled: false,
            batch_size: 1000,
            log_every_n_records: 1_000_000,
            parallelism: 1,
            run_local: false,
        }
    }
}

fn non_negative(name: &str, value: i64) -> Result<u64, BenchError> {
    u64::try_from(value)
        .map_err(|_| BenchError::invalid_config(format!("{name} must not be negative, got {value}")))
}

fn positive(name: &str, value: i64) -> Result<u64, BenchError> {
    if value < 1 {
        return Err(BenchError::invalid_config(format!(
            "{name} must be at least 1, got {value}"
        )));
    }
    Ok(value as u64)
}
