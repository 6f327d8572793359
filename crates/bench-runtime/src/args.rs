//! CLI argument definitions for the benchmark.

use bench_core::BenchSettings;
use clap::{Args, ValueEnum};

/// Output format for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Benchmark arguments.
///
/// Numeric options are parsed as signed integers so negative values reach
/// configuration validation instead of failing in the parser.
#[derive(Args, Clone, Debug)]
pub struct BenchArgs {
    /// Payload bytes per record
    #[arg(long, default_value = "1000", env = "BENCH_PAYLOAD", allow_hyphen_values = true)]
    pub payload: i64,

    /// Artificial per-record delay in milliseconds (0 = disabled)
    #[arg(long, default_value = "0", env = "BENCH_DELAY", allow_hyphen_values = true)]
    pub delay: i64,

    /// Enable fault-tolerance mode (track acknowledged batches per partition)
    #[arg(long)]
    pub ft: bool,

    /// Records per batch
    #[arg(
        long = "batch-size",
        alias = "batchSize",
        default_value = "1000",
        env = "BENCH_BATCH_SIZE",
        allow_hyphen_values = true
    )]
    pub batch_size: i64,

    /// Records between throughput reports, per sink
    #[arg(long, default_value = "1000000", env = "BENCH_LOGFREQ", allow_hyphen_values = true)]
    pub logfreq: i64,

    /// Number of generator and sink instances
    #[arg(long, default_value = "1", env = "BENCH_PARA", allow_hyphen_values = true)]
    pub para: i64,

    /// Run in-process for a fixed duration, then shut down
    #[arg(long)]
    pub local: bool,

    /// Run time in local mode (e.g. "30", "30s", "5m", "1h")
    #[arg(long, default_value = "30s")]
    pub duration: String,

    /// Queue depth, in batch chunks, between generators and each sink
    #[arg(long, default_value = "1024")]
    pub channel_capacity: usize,

    /// Format of the final report
    #[arg(long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

impl BenchArgs {
    /// Raw settings for validation by [`bench_core::BenchConfig::new`].
    pub fn to_settings(&self) -> BenchSettings {
        BenchSettings {
            payload_size_bytes: self.payload,
            artificial_delay_millis: self.delay,
            fault_tolerance_enabled: self.ft,
            batch_size: self.batch_size,
            log_every_n_records: self.logfreq,
            parallelism: self.para,
            run_local: self.local,
        }
    }
}
