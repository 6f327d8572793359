//! batch-throughput library
//!
//! A throughput benchmark for a batch-stream pipeline. A source deterministically
//! generates fixed-size batches of synthetic records; sinks consume them and log
//! steady-state elements/second and bytes/second.
//!
//! # Components
//!
//! - [`batch_generator::BatchGenerator`] - Replayable batches keyed by batch id
//! - [`throughput_sink::ThroughputSink`] - Windowed rate measurement
//! - [`bench_runtime::LocalTopology`] - In-process driver wiring both together
//!
//! # CLI Usage
//!
//! ```bash
//! # 30 seconds in-process with 4 generators and 4 sinks
//! batch-throughput --local --para 4 --payload 1000 --batch-size 1000 --logfreq 1000000
//!
//! # Long-lived worker, stopped with Ctrl+C, with the batch ledger enabled
//! batch-throughput --para 8 --payload 100 --ft
//! ```

use anyhow::Context;
use bench_core::BenchConfig;
use bench_runtime::{aggregate_reports, AggregatedReport, BenchArgs, LocalTopology};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub mod config;

/// How long the benchmark runs before shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// In-process for a fixed duration.
    Local(Duration),
    /// Until the process is interrupted.
    Worker,
}

/// Validate CLI arguments into a configuration and run mode.
pub fn build_config(args: &BenchArgs) -> anyhow::Result<(BenchConfig, RunMode)> {
    let config = BenchConfig::new(args.to_settings()).context("Invalid benchmark configuration")?;
    let mode = if config.run_local() {
        let duration = config::parse_duration(&args.duration)
            .with_context(|| format!("Invalid --duration: {}", args.duration))?;
        RunMode::Local(duration)
    } else {
        RunMode::Worker
    };
    Ok((config, mode))
}

/// Cancel `shutdown` when the run mode says the benchmark is over, or on Ctrl+C.
pub fn spawn_shutdown_trigger(mode: RunMode, shutdown: CancellationToken) {
    tokio::spawn(async move {
        match mode {
            RunMode::Local(duration) => {
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {
                        tracing::info!("Local run of {:?} complete, shutting down", duration);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted, shutting down");
                    }
                    _ = shutdown.cancelled() => {}
                }
            }
            RunMode::Worker => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted, shutting down");
                    }
                    _ = shutdown.cancelled() => {}
                }
            }
        }
        shutdown.cancel();
    });
}

/// Run the benchmark until `shutdown` is cancelled and aggregate the results.
pub async fn run_benchmark(
    config: BenchConfig,
    channel_capacity: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<AggregatedReport> {
    tracing::info!(
        "Effective configuration: {}",
        serde_json::to_string(&config)?
    );

    let report = LocalTopology::new(config)
        .with_channel_capacity(channel_capacity)
        .run(shutdown)
        .await
        .context("Benchmark run failed")?;

    Ok(aggregate_reports(report))
}
