//! Local topology integration test.
//!
//! Runs the full in-process benchmark for a short time and checks the
//! aggregated report against the per-instance reports.

use batch_throughput::run_benchmark;
use bench_core::{BenchConfig, BenchSettings};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn test_config(parallelism: i64, ft: bool) -> BenchConfig {
    BenchConfig::new(BenchSettings {
        payload_size_bytes: 100,
        batch_size: 200,
        log_every_n_records: 50_000,
        parallelism,
        fault_tolerance_enabled: ft,
        run_local: true,
        ..BenchSettings::default()
    })
    .expect("valid config")
}

fn cancel_after(millis: u64) -> CancellationToken {
    let shutdown = CancellationToken::new();
    let stopper = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        stopper.cancel();
    });
    shutdown
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_local_run_delivers_every_record() {
    tracing_subscriber::fmt()
        .with_env_filter("batch_throughput=info,bench_runtime=info")
        .try_init()
        .ok();

    let report = tokio_test::assert_ok!(
        run_benchmark(test_config(4, false), 64, cancel_after(300)).await
    );

    assert_eq!(report.total_sinks, 4);
    assert_eq!(report.total_generators, 4);
    assert!(report.total_emitted > 0);
    assert_eq!(report.total_emitted, report.total_received);
    assert_eq!(report.total_emitted, report.total_batches * 200);
    assert_eq!(report.total_bytes, report.total_received * 112);

    let per_sink: u64 = report.sinks.iter().map(|s| s.received).sum();
    assert_eq!(per_sink, report.total_received);
    assert!(report.committed_batches.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_local_run_with_fault_tolerance_commits_every_batch() {
    let report = tokio_test::assert_ok!(
        run_benchmark(test_config(2, true), 64, cancel_after(200)).await
    );

    let committed = report.committed_batches.expect("ledger kept in ft mode");
    for generator in &report.generators {
        // Batch ids start at 1 and are acknowledged in order
        assert_eq!(
            committed.get(&generator.partition_id).copied(),
            generator.last_batch_id
        );
        if let Some(last) = generator.last_batch_id {
            assert_eq!(last as u64, generator.batches_emitted);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_aggregate_rate_is_sum_of_sinks() {
    // Sinks measure wall-clock seconds, so the run must outlast one second.
    let report = tokio_test::assert_ok!(
        run_benchmark(test_config(3, false), 16, cancel_after(1_500)).await
    );

    assert!(
        report
            .sinks
            .iter()
            .any(|s| s.elapsed_secs > 0 && s.elements_per_sec > 0),
        "no sink measured a full second: {:?}",
        report.sinks
    );
    let summed: u64 = report.sinks.iter().map(|s| s.elements_per_sec).sum();
    assert_eq!(report.aggregate_elements_per_sec, summed);
}
